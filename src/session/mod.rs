//! Editing sessions.
//!
//! This module follows The Elm Architecture (TEA):
//! - [`Model`]: The complete session state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`EditorSession`]: Host-side driver that owns the model and talks to the
//!   backend collaborators
//!
//! [`update`] never touches the host's widgets. Restoring focus, selection
//! and scroll after a toolbar action is queued as [`Effect`]s, which the host
//! drains with [`EditorSession::take_effects`] once it has committed the
//! render for the new state.

mod edits;
mod model;
mod update;

pub use edits::PostEdits;
pub use model::{Effect, Model, NoticeLevel, SessionStatus};
pub use update::{DASHBOARD_PATH, Message, update};

use thiserror::Error;

use crate::post::PostRecord;
use crate::preview::PreviewRenderer;
use crate::store::{
    AdminUser, AuthGate, ImageStore, PostStore, StoreError, UploadError, object_name,
    validate_upload,
};

/// Where an unauthenticated visitor is sent.
pub const LOGIN_PATH: &str = "/admin/login";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("not signed in")]
    Unauthenticated,
    #[error("post {0} not found")]
    NotFound(String),
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Upload(#[from] UploadError),
}

impl SessionError {
    /// Page the host should navigate to, if the error means leaving the editor.
    pub const fn redirect(&self) -> Option<&'static str> {
        match self {
            Self::Unauthenticated => Some(LOGIN_PATH),
            _ => None,
        }
    }
}

/// Host-side driver for one editing session.
///
/// Collaborators are borrowed for the session's lifetime; nothing is global.
pub struct EditorSession<'a> {
    model: Model,
    user: AdminUser,
    auth: &'a dyn AuthGate,
    posts: &'a dyn PostStore,
    images: &'a dyn ImageStore,
}

impl std::fmt::Debug for EditorSession<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("user", &self.user)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl<'a> EditorSession<'a> {
    /// Start a new post in `topic`.
    ///
    /// # Errors
    /// Returns [`SessionError::Unauthenticated`] without a signed-in admin.
    pub fn open_new(
        auth: &'a dyn AuthGate,
        posts: &'a dyn PostStore,
        images: &'a dyn ImageStore,
        topic: &str,
    ) -> Result<Self, SessionError> {
        let user = auth.current_user().ok_or(SessionError::Unauthenticated)?;
        let model = Model::new(PostRecord::draft(topic), PreviewRenderer::new());
        Ok(Self {
            model,
            user,
            auth,
            posts,
            images,
        })
    }

    /// Load a stored post for editing.
    ///
    /// # Errors
    /// Returns [`SessionError::Unauthenticated`], [`SessionError::NotFound`],
    /// or a backend error.
    pub fn open_existing(
        auth: &'a dyn AuthGate,
        posts: &'a dyn PostStore,
        images: &'a dyn ImageStore,
        id: &str,
    ) -> Result<Self, SessionError> {
        let user = auth.current_user().ok_or(SessionError::Unauthenticated)?;
        let mut post = posts
            .get(id)?
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;
        post.id = Some(id.to_string());
        tracing::debug!(%id, slug = %post.slug, "opened post for editing");
        Ok(Self {
            model: Model::new(post, PreviewRenderer::new()),
            user,
            auth,
            posts,
            images,
        })
    }

    pub const fn model(&self) -> &Model {
        &self.model
    }

    pub const fn user(&self) -> &AdminUser {
        &self.user
    }

    /// Apply one message.
    pub fn dispatch(&mut self, msg: Message) {
        let model = std::mem::take(&mut self.model);
        self.model = update(model, msg);
    }

    /// Apply a batch of field edits. Fields left `None` keep their value.
    pub fn apply(&mut self, edits: PostEdits) {
        for msg in edits.into_messages() {
            self.dispatch(msg);
        }
    }

    /// Drain the effects queued since the last call. Call after the render
    /// for the current state has been committed.
    pub fn take_effects(&mut self) -> Vec<Effect> {
        self.model.take_effects()
    }

    /// Insert or update the post. The outcome is also queued as a notice.
    ///
    /// # Errors
    /// Fails if the session has expired, a required field is empty, or the
    /// backend rejects the record.
    pub fn save(&mut self) -> Result<String, SessionError> {
        let result = self.try_save();
        let outcome = match &result {
            Ok(id) => Ok(id.clone()),
            Err(err) => Err(err.to_string()),
        };
        self.dispatch(Message::SaveFinished(outcome));
        result
    }

    fn try_save(&self) -> Result<String, SessionError> {
        self.ensure_signed_in()?;
        let record = self.model.record();
        if record.title.trim().is_empty() {
            return Err(SessionError::MissingField("title"));
        }
        if record.slug.trim().is_empty() {
            return Err(SessionError::MissingField("slug"));
        }
        if record.topic.trim().is_empty() {
            return Err(SessionError::MissingField("topic"));
        }

        if let Some(id) = self.model.post_id.clone() {
            self.posts.update(&id, record)?;
            tracing::debug!(%id, user = %self.user.email, "post updated");
            Ok(id)
        } else {
            let id = self.posts.insert(record)?;
            tracing::debug!(%id, user = %self.user.email, "post created");
            Ok(id)
        }
    }

    /// Validate and upload a featured image, then point the post at it.
    ///
    /// On failure the previous `image_url` is left untouched.
    ///
    /// # Errors
    /// Fails if the session has expired, the file is not an acceptable image,
    /// or storage rejects it.
    pub fn upload_image(
        &mut self,
        file_name: &str,
        mime: &str,
        bytes: &[u8],
    ) -> Result<String, SessionError> {
        let result = self.try_upload(file_name, mime, bytes);
        let outcome = match &result {
            Ok(url) => Ok(url.clone()),
            Err(err) => Err(err.to_string()),
        };
        self.dispatch(Message::UploadFinished(outcome));
        result
    }

    fn try_upload(
        &self,
        file_name: &str,
        mime: &str,
        bytes: &[u8],
    ) -> Result<String, SessionError> {
        self.ensure_signed_in()?;
        let format = validate_upload(mime, bytes)?;
        let name = object_name(file_name, format);
        let url = self.images.upload(&name, bytes).map_err(UploadError::from)?;
        tracing::debug!(object = %name, %url, "uploaded featured image");
        Ok(url)
    }

    /// Clear the featured image.
    pub fn remove_image(&mut self) {
        self.dispatch(Message::SetImageUrl(None));
    }

    fn ensure_signed_in(&self) -> Result<(), SessionError> {
        if self.auth.current_user().is_some() {
            Ok(())
        } else {
            Err(SessionError::Unauthenticated)
        }
    }
}

#[cfg(test)]
mod tests;
