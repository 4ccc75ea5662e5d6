use super::AuthGate;

/// Environment variable naming the signed-in admin for local use.
pub const ADMIN_ENV: &str = "TOOLNEST_ADMIN_EMAIL";

/// An authenticated admin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminUser {
    pub email: String,
}

impl AdminUser {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}

/// A fixed session, signed in or not.
#[derive(Debug, Clone, Default)]
pub struct StaticAuth(pub Option<AdminUser>);

impl StaticAuth {
    pub fn signed_in(email: impl Into<String>) -> Self {
        Self(Some(AdminUser::new(email)))
    }

    pub const fn signed_out() -> Self {
        Self(None)
    }
}

impl AuthGate for StaticAuth {
    fn current_user(&self) -> Option<AdminUser> {
        self.0.clone()
    }
}

/// Session taken from [`ADMIN_ENV`], used by the command-line tool.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvAuth;

impl AuthGate for EnvAuth {
    fn current_user(&self) -> Option<AdminUser> {
        std::env::var(ADMIN_ENV)
            .ok()
            .map(|email| email.trim().to_string())
            .filter(|email| !email.is_empty())
            .map(AdminUser::new)
    }
}
