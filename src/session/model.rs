use crate::editor::{EditorBuffer, Selection};
use crate::post::PostRecord;
use crate::preview::PreviewRenderer;
use crate::scroll::{Pane, ViewMode};

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Work the host must perform after it has committed the render for the
/// state that produced it.
///
/// Focus, selection and scroll are reset by the host's re-render of the text
/// widget, so they can only be reapplied once that render is on screen.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Give the editor input focus.
    RestoreFocus,
    /// Select this char range in the editor.
    RestoreSelection(Selection),
    /// Scroll the editor to this fraction of its range.
    RestoreScroll(f64),
    /// Scroll the preview pane to this offset.
    ScrollPreview(f64),
    /// Show a message to the user.
    Notify(NoticeLevel, String),
    /// Leave the editor for another admin page.
    Navigate(&'static str),
}

/// Outcome of the most recent save or upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionStatus {
    #[default]
    Editing,
    Saved,
    SaveFailed(String),
    Uploaded,
    UploadFailed(String),
}

/// State of one editing session.
///
/// All state lives here; the host draws it and feeds back
/// [`Message`](super::Message)s.
#[derive(Debug, Default)]
pub struct Model {
    /// Markdown source with selection and scroll fraction
    pub buffer: EditorBuffer,
    /// Post metadata; `content` is taken from `buffer` on save
    pub post: PostRecord,
    /// Set when editing a stored post
    pub post_id: Option<String>,
    /// Which panes are on screen
    pub view_mode: ViewMode,
    /// Last metrics reported for the editor pane, if shown
    pub editor_pane: Option<Pane>,
    /// Last metrics reported for the preview pane, if shown
    pub preview_pane: Option<Pane>,
    /// Rendered preview of `buffer`
    pub preview_html: String,
    /// The preview is out of date because it was hidden during edits
    pub(super) preview_stale: bool,
    pub renderer: PreviewRenderer,
    pub status: SessionStatus,
    effects: Vec<Effect>,
}

impl Model {
    /// Start a session on `post`, loading its content verbatim.
    pub fn new(post: PostRecord, renderer: PreviewRenderer) -> Self {
        let buffer = EditorBuffer::from_text(&post.content);
        let preview_html = renderer.render(&post.content);
        Self {
            buffer,
            post_id: post.id.clone(),
            post,
            renderer,
            preview_html,
            ..Self::default()
        }
    }

    /// Whether this session edits an existing post.
    pub const fn is_editing(&self) -> bool {
        self.post_id.is_some()
    }

    /// Whether there are unsaved content changes.
    pub const fn is_dirty(&self) -> bool {
        self.buffer.is_dirty()
    }

    /// The record to persist: metadata plus the current source.
    pub fn record(&self) -> PostRecord {
        let mut record = self.post.clone();
        record.id.clone_from(&self.post_id);
        record.content = self.buffer.text();
        record.excerpt = record.effective_excerpt();
        record
    }

    /// Drain queued effects. Call only after committing the render for the
    /// current state.
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    /// Effects waiting for the host.
    pub fn pending_effects(&self) -> &[Effect] {
        &self.effects
    }

    pub(super) fn push_effect(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub(super) fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.effects.push(Effect::Notify(level, message.into()));
    }

    /// Re-render the preview if it is visible, otherwise mark it stale.
    pub(super) fn refresh_preview(&mut self) {
        if self.view_mode.shows_preview() {
            self.preview_html = self.renderer.render(&self.buffer.text());
            self.preview_stale = false;
        } else {
            self.preview_stale = true;
        }
    }
}
