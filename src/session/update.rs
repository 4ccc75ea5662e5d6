use crate::editor::Selection;
use crate::format::ToolbarAction;
use crate::post::generate_slug;
use crate::scroll::{Pane, ViewMode, sync_preview};

use super::model::{Effect, Model, NoticeLevel, SessionStatus};

/// Admin page shown after a successful save.
pub const DASHBOARD_PATH: &str = "/admin/dashboard";

/// Everything that can happen to an editing session.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // Source editing
    /// Replace the selection with typed or pasted text
    Input(String),
    /// Replace the whole source, e.g. after loading it from a file
    Replace(String),
    /// Backspace
    DeleteBack,
    /// Delete
    DeleteForward,
    /// Selection changed in the text widget
    Select(Selection),
    SelectAll,
    /// Toolbar button pressed
    Format(ToolbarAction),

    // Panes
    /// Editor pane scrolled; carries its current metrics
    EditorScrolled(Pane),
    /// Preview pane scrolled by the user
    PreviewScrolled(Pane),
    /// Preview pane re-laid out (content or viewport height changed)
    PreviewLayout(Pane),
    SetViewMode(ViewMode),

    // Metadata
    SetTitle(String),
    SetSlug(String),
    SetTopic(String),
    SetExcerpt(String),
    SetCategory(Option<String>),
    SetExternalLink(Option<String>),
    SetPublished(bool),
    SetImageUrl(Option<String>),

    // Collaborator results
    /// Save finished with the post id or an error message
    SaveFinished(Result<String, String>),
    /// Image upload finished with the public URL or an error message
    UploadFinished(Result<String, String>),
}

/// Pure state transition for one message.
///
/// Anything that needs the host's rendered widgets is queued on the model as
/// an [`Effect`] instead of happening here.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        Message::Input(text) => {
            model.buffer.insert_str(&text);
            model.refresh_preview();
        }
        Message::Replace(text) => {
            model.buffer.replace_all(&text);
            model.refresh_preview();
        }
        Message::DeleteBack => {
            if model.buffer.delete_back() {
                model.refresh_preview();
            }
        }
        Message::DeleteForward => {
            if model.buffer.delete_forward() {
                model.refresh_preview();
            }
        }
        Message::Select(selection) => {
            model.buffer.set_selection(selection);
        }
        Message::SelectAll => {
            model.buffer.select_all();
        }
        Message::Format(action) => {
            // The widget's scroll position is lost on re-render; capture it
            // before the content changes.
            if let Some(pane) = &model.editor_pane {
                model.buffer.set_scroll_offset(pane.scroll_ratio());
            }
            let scroll = model.buffer.scroll_offset();
            let selection = model.buffer.apply_format(&action.rule());
            model.refresh_preview();
            if model.view_mode.shows_editor() {
                model.push_effect(Effect::RestoreFocus);
                model.push_effect(Effect::RestoreSelection(selection));
                model.push_effect(Effect::RestoreScroll(scroll));
            }
        }

        Message::EditorScrolled(pane) => {
            if !model.view_mode.shows_editor() {
                return model;
            }
            model.buffer.set_scroll_offset(pane.scroll_ratio());
            model.editor_pane = Some(pane);
            let mode = model.view_mode;
            let synced =
                sync_preview(mode, model.editor_pane.as_ref(), model.preview_pane.as_mut());
            if synced.is_some()
                && let Some(preview) = &model.preview_pane
            {
                let top = preview.scroll_top();
                model.push_effect(Effect::ScrollPreview(top));
            }
        }
        Message::PreviewScrolled(pane) | Message::PreviewLayout(pane) => {
            if model.view_mode.shows_preview() {
                model.preview_pane = Some(pane);
            }
        }
        Message::SetViewMode(mode) => {
            let editor_was_hidden = !model.view_mode.shows_editor();
            model.view_mode = mode;
            if !mode.shows_editor() {
                model.editor_pane = None;
            }
            if !mode.shows_preview() {
                model.preview_pane = None;
            }
            if mode.shows_preview() && model.preview_stale {
                model.refresh_preview();
            }
            if mode.shows_editor() && editor_was_hidden {
                let scroll = model.buffer.scroll_offset();
                model.push_effect(Effect::RestoreScroll(scroll));
            }
        }

        Message::SetTitle(title) => {
            if !model.is_editing() {
                model.post.slug = generate_slug(&title);
            }
            model.post.title = title;
        }
        Message::SetSlug(slug) => model.post.slug = slug,
        Message::SetTopic(topic) => model.post.topic = topic,
        Message::SetExcerpt(excerpt) => model.post.excerpt = excerpt,
        Message::SetCategory(category) => model.post.category = non_blank(category),
        Message::SetExternalLink(link) => model.post.external_link = non_blank(link),
        Message::SetPublished(published) => model.post.published = published,
        Message::SetImageUrl(url) => model.post.image_url = non_blank(url),

        Message::SaveFinished(Ok(id)) => {
            model.post.id = Some(id.clone());
            model.post_id = Some(id);
            model.buffer.mark_clean();
            model.status = SessionStatus::Saved;
            model.notify(NoticeLevel::Info, "Post saved");
            model.push_effect(Effect::Navigate(DASHBOARD_PATH));
        }
        Message::SaveFinished(Err(err)) => {
            model.notify(NoticeLevel::Error, format!("Error saving post: {err}"));
            model.status = SessionStatus::SaveFailed(err);
        }
        Message::UploadFinished(Ok(url)) => {
            model.post.image_url = Some(url);
            model.status = SessionStatus::Uploaded;
            model.notify(NoticeLevel::Info, "Image uploaded");
        }
        Message::UploadFinished(Err(err)) => {
            model.notify(NoticeLevel::Error, format!("Failed to upload image: {err}"));
            model.status = SessionStatus::UploadFailed(err);
        }
    }
    model
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
