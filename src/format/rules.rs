use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Markers inserted by one toolbar action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatRule {
    pub prefix: Cow<'static, str>,
    pub suffix: Cow<'static, str>,
    /// Inserted between the markers when nothing is selected.
    pub placeholder: Cow<'static, str>,
}

impl FormatRule {
    /// Build a custom rule.
    pub fn new(
        prefix: impl Into<Cow<'static, str>>,
        suffix: impl Into<Cow<'static, str>>,
        placeholder: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
            placeholder: placeholder.into(),
        }
    }

    const fn fixed(prefix: &'static str, suffix: &'static str, placeholder: &'static str) -> Self {
        Self {
            prefix: Cow::Borrowed(prefix),
            suffix: Cow::Borrowed(suffix),
            placeholder: Cow::Borrowed(placeholder),
        }
    }

    /// The rule bound to a toolbar button.
    pub const fn for_action(action: ToolbarAction) -> Self {
        match action {
            ToolbarAction::Bold => Self::fixed("**", "**", "bold text"),
            ToolbarAction::Italic => Self::fixed("*", "*", "italic text"),
            ToolbarAction::Heading1 => Self::fixed("# ", "", ""),
            ToolbarAction::Heading2 => Self::fixed("## ", "", ""),
            ToolbarAction::BulletList => Self::fixed("- ", "", ""),
            ToolbarAction::NumberedList => Self::fixed("1. ", "", ""),
            ToolbarAction::Link => Self::fixed("[", "](url)", "link text"),
            ToolbarAction::Image => Self::fixed("![", "](image-url)", "alt text"),
            ToolbarAction::Code => Self::fixed("`", "`", "code"),
            ToolbarAction::Quote => Self::fixed("> ", "", "quote"),
        }
    }

    /// Prefix length in chars.
    pub fn prefix_len(&self) -> usize {
        self.prefix.chars().count()
    }

    /// Suffix length in chars.
    pub fn suffix_len(&self) -> usize {
        self.suffix.chars().count()
    }

    /// Placeholder length in chars.
    pub fn placeholder_len(&self) -> usize {
        self.placeholder.chars().count()
    }
}

impl From<ToolbarAction> for FormatRule {
    fn from(action: ToolbarAction) -> Self {
        Self::for_action(action)
    }
}

/// Buttons on the editor toolbar.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolbarAction {
    Bold,
    Italic,
    Heading1,
    Heading2,
    BulletList,
    NumberedList,
    Link,
    Image,
    Code,
    Quote,
}

impl ToolbarAction {
    /// Toolbar order, left to right.
    pub const ALL: [Self; 10] = [
        Self::Bold,
        Self::Italic,
        Self::Heading1,
        Self::Heading2,
        Self::BulletList,
        Self::NumberedList,
        Self::Link,
        Self::Image,
        Self::Code,
        Self::Quote,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Heading1 => "heading1",
            Self::Heading2 => "heading2",
            Self::BulletList => "bullet-list",
            Self::NumberedList => "numbered-list",
            Self::Link => "link",
            Self::Image => "image",
            Self::Code => "code",
            Self::Quote => "quote",
        }
    }

    pub fn rule(self) -> FormatRule {
        FormatRule::for_action(self)
    }
}

impl fmt::Display for ToolbarAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToolbarAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.name() == s)
            .ok_or_else(|| format!("unknown toolbar action: {s}"))
    }
}
