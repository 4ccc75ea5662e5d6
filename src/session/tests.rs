use crate::editor::Selection;
use crate::format::ToolbarAction;
use crate::post::PostRecord;
use crate::preview::PreviewRenderer;
use crate::scroll::{Pane, ViewMode};
use crate::store::{MemoryStore, PostStore, StaticAuth};

use super::{
    DASHBOARD_PATH, Effect, EditorSession, LOGIN_PATH, Message, Model, NoticeLevel, SessionError,
    SessionStatus, update,
};

const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

fn create_test_model() -> Model {
    let mut post = PostRecord::draft("hubplate");
    post.content = "hello world".to_string();
    Model::new(post, PreviewRenderer::new())
}

fn create_editing_model() -> Model {
    let mut post = PostRecord::draft("hubplate");
    post.id = Some("7".to_string());
    post.title = "Old Title".to_string();
    post.slug = "custom-slug".to_string();
    post.content = "body".to_string();
    Model::new(post, PreviewRenderer::new())
}

fn stored_post(store: &MemoryStore) -> String {
    let mut post = PostRecord::draft("baybolt");
    post.set_title_with_slug("Brake Pads 101");
    post.content = "Check the *rotors* first.".to_string();
    store.insert(post).unwrap()
}

// --- Source editing ---

#[test]
fn test_new_model_renders_preview() {
    let model = create_test_model();
    assert_eq!(model.preview_html, "<p>hello world</p>\n");
    assert!(!model.is_dirty());
    assert!(model.pending_effects().is_empty());
}

#[test]
fn test_input_updates_buffer_and_preview() {
    let model = create_test_model();
    let model = update(model, Message::Select(Selection::caret(11)));
    let model = update(model, Message::Input("!".to_string()));
    assert_eq!(model.buffer.text(), "hello world!");
    assert_eq!(model.preview_html, "<p>hello world!</p>\n");
    assert!(model.is_dirty());
}

#[test]
fn test_delete_back_at_start_leaves_model_clean() {
    let model = update(create_test_model(), Message::DeleteBack);
    assert_eq!(model.buffer.text(), "hello world");
    assert!(!model.is_dirty());
}

#[test]
fn test_select_clamps_out_of_range_selection() {
    let model = update(create_test_model(), Message::Select(Selection::new(6, 400)));
    assert_eq!(model.buffer.selection(), Selection::new(6, 11));
}

#[test]
fn test_replace_swaps_whole_source() {
    let model = update(create_test_model(), Message::Select(Selection::new(6, 11)));
    let model = update(model, Message::Replace("# New body".to_string()));
    assert_eq!(model.buffer.text(), "# New body");
    assert_eq!(model.buffer.selection(), Selection::new(6, 10));
    assert_eq!(model.preview_html, "<h1>New body</h1>\n");
    assert!(model.is_dirty());
}

// --- Formatting ---

#[test]
fn test_format_wraps_selection_and_rerenders() {
    let model = update(create_test_model(), Message::Select(Selection::new(6, 11)));
    let model = update(model, Message::Format(ToolbarAction::Bold));
    assert_eq!(model.buffer.text(), "hello **world**");
    assert_eq!(model.buffer.selection(), Selection::new(8, 13));
    assert_eq!(model.preview_html, "<p>hello <strong>world</strong></p>\n");
}

#[test]
fn test_format_queues_focus_selection_and_scroll_in_order() {
    let model = create_test_model();
    let model = update(
        model,
        Message::EditorScrolled(Pane::with_metrics(150.0, 500.0, 200.0)),
    );
    let mut model = model;
    model.take_effects();

    let model = update(model, Message::Select(Selection::new(0, 5)));
    let mut model = update(model, Message::Format(ToolbarAction::Italic));
    assert_eq!(
        model.take_effects(),
        vec![
            Effect::RestoreFocus,
            Effect::RestoreSelection(Selection::new(1, 6)),
            Effect::RestoreScroll(0.5),
        ]
    );
    assert!(model.pending_effects().is_empty());
}

#[test]
fn test_format_twice_restores_original_text() {
    let model = update(create_test_model(), Message::Select(Selection::new(6, 11)));
    let model = update(model, Message::Format(ToolbarAction::Code));
    let model = update(model, Message::Format(ToolbarAction::Code));
    assert_eq!(model.buffer.text(), "hello world");
    assert_eq!(model.buffer.selection(), Selection::new(6, 11));
}

#[test]
fn test_format_in_preview_mode_queues_no_restore() {
    let model = update(create_test_model(), Message::SetViewMode(ViewMode::Preview));
    let mut model = update(model, Message::Format(ToolbarAction::Heading1));
    assert_eq!(model.buffer.text(), "# hello world");
    assert!(model.take_effects().is_empty());
    assert!(model.preview_html.contains("<h1>"));
}

#[test]
fn test_editor_keeps_working_when_preview_fails() {
    let renderer = PreviewRenderer::new().with_max_bytes(4);
    let model = Model::new(PostRecord::draft("hubplate"), renderer);
    let model = update(model, Message::Input("hello world".to_string()));
    assert_eq!(model.buffer.text(), "hello world");
    assert!(model.preview_html.starts_with("<div class=\"preview-error\""));

    let model = update(model, Message::Select(Selection::new(6, 11)));
    let mut model = update(model, Message::Format(ToolbarAction::Bold));
    assert_eq!(model.buffer.text(), "hello **world**");
    assert_eq!(
        model.take_effects(),
        vec![
            Effect::RestoreFocus,
            Effect::RestoreSelection(Selection::new(8, 13)),
            Effect::RestoreScroll(0.0),
        ]
    );
    assert!(model.preview_html.starts_with("<div class=\"preview-error\""));
    assert!(model.preview_html.contains("15 bytes"), "got: {}", model.preview_html);
}

// --- Panes and scroll sync ---

#[test]
fn test_editor_scroll_syncs_preview_in_split_view() {
    let model = update(
        create_test_model(),
        Message::PreviewLayout(Pane::new(1200.0, 200.0)),
    );
    let mut model = update(
        model,
        Message::EditorScrolled(Pane::with_metrics(150.0, 500.0, 200.0)),
    );
    let preview = model.preview_pane.unwrap();
    assert!((preview.scroll_top() - 500.0).abs() < 1e-9);
    assert_eq!(model.take_effects(), vec![Effect::ScrollPreview(500.0)]);
}

#[test]
fn test_unscrollable_editor_pins_preview_to_top() {
    let model = update(
        create_test_model(),
        Message::PreviewLayout(Pane::with_metrics(300.0, 1200.0, 200.0)),
    );
    let model = update(model, Message::EditorScrolled(Pane::new(200.0, 200.0)));
    let preview = model.preview_pane.unwrap();
    assert!(preview.scroll_top().abs() < f64::EPSILON);
    assert!(model.buffer.scroll_offset().abs() < f64::EPSILON);
}

#[test]
fn test_editor_scroll_without_preview_pane_only_records_offset() {
    let mut model = update(
        create_test_model(),
        Message::EditorScrolled(Pane::with_metrics(75.0, 500.0, 200.0)),
    );
    assert!((model.buffer.scroll_offset() - 0.25).abs() < 1e-9);
    assert!(model.preview_pane.is_none());
    assert!(model.take_effects().is_empty());
}

#[test]
fn test_editor_scroll_ignored_when_editor_hidden() {
    let model = update(create_test_model(), Message::SetViewMode(ViewMode::Preview));
    let model = update(
        model,
        Message::EditorScrolled(Pane::with_metrics(300.0, 500.0, 200.0)),
    );
    assert!(model.editor_pane.is_none());
    assert!(model.buffer.scroll_offset().abs() < f64::EPSILON);
}

#[test]
fn test_editor_only_mode_does_not_move_preview() {
    let model = update(
        create_test_model(),
        Message::PreviewLayout(Pane::new(1200.0, 200.0)),
    );
    let model = update(model, Message::SetViewMode(ViewMode::Editor));
    assert!(model.preview_pane.is_none());
    let mut model = update(
        model,
        Message::EditorScrolled(Pane::with_metrics(300.0, 500.0, 200.0)),
    );
    assert!(model.take_effects().is_empty());
}

#[test]
fn test_hidden_preview_is_refreshed_when_shown() {
    let model = update(create_test_model(), Message::SetViewMode(ViewMode::Editor));
    let model = update(model, Message::SelectAll);
    let model = update(model, Message::Input("changed".to_string()));
    assert_eq!(model.preview_html, "<p>hello world</p>\n");

    let model = update(model, Message::SetViewMode(ViewMode::Split));
    assert_eq!(model.preview_html, "<p>changed</p>\n");
}

#[test]
fn test_returning_to_editor_restores_scroll() {
    let model = update(
        create_test_model(),
        Message::EditorScrolled(Pane::with_metrics(300.0, 500.0, 200.0)),
    );
    let model = update(model, Message::SetViewMode(ViewMode::Preview));
    let mut model = update(model, Message::SetViewMode(ViewMode::Split));
    assert_eq!(model.take_effects(), vec![Effect::RestoreScroll(1.0)]);
}

// --- Metadata ---

#[test]
fn test_title_derives_slug_for_new_post() {
    let model = update(
        create_test_model(),
        Message::SetTitle("Top 10 Tips & Tricks!".to_string()),
    );
    assert_eq!(model.post.slug, "top-10-tips-tricks");
}

#[test]
fn test_title_keeps_slug_when_editing() {
    let model = update(
        create_editing_model(),
        Message::SetTitle("A Whole New Title".to_string()),
    );
    assert_eq!(model.post.title, "A Whole New Title");
    assert_eq!(model.post.slug, "custom-slug");
}

#[test]
fn test_blank_optional_fields_are_cleared() {
    let model = update(
        create_test_model(),
        Message::SetCategory(Some("   ".to_string())),
    );
    let model = update(model, Message::SetExternalLink(Some(String::new())));
    assert_eq!(model.post.category, None);
    assert_eq!(model.post.external_link, None);
}

#[test]
fn test_record_carries_buffer_and_derived_excerpt() {
    let model = update(create_test_model(), Message::SelectAll);
    let model = update(model, Message::Input("Fresh **body** text".to_string()));
    let record = model.record();
    assert_eq!(record.content, "Fresh **body** text");
    assert_eq!(record.excerpt, "Fresh body text");
}

// --- Collaborator results ---

#[test]
fn test_save_success_notifies_and_navigates() {
    let model = update(create_test_model(), Message::Input("x".to_string()));
    let mut model = update(model, Message::SaveFinished(Ok("3".to_string())));
    assert_eq!(model.post_id.as_deref(), Some("3"));
    assert!(!model.is_dirty());
    assert_eq!(model.status, SessionStatus::Saved);
    assert_eq!(
        model.take_effects(),
        vec![
            Effect::Notify(NoticeLevel::Info, "Post saved".to_string()),
            Effect::Navigate(DASHBOARD_PATH),
        ]
    );
}

#[test]
fn test_upload_failure_keeps_previous_image() {
    let model = update(
        create_test_model(),
        Message::SetImageUrl(Some("https://cdn/old.png".to_string())),
    );
    let mut model = update(model, Message::UploadFinished(Err("too big".to_string())));
    assert_eq!(model.post.image_url.as_deref(), Some("https://cdn/old.png"));
    assert_eq!(model.status, SessionStatus::UploadFailed("too big".to_string()));
    assert_eq!(
        model.take_effects(),
        vec![Effect::Notify(
            NoticeLevel::Error,
            "Failed to upload image: too big".to_string()
        )]
    );
}

// --- EditorSession ---

#[test]
fn test_open_requires_sign_in() {
    let store = MemoryStore::new();
    let auth = StaticAuth::signed_out();
    let err = EditorSession::open_new(&auth, &store, &store, "hubplate").unwrap_err();
    assert!(matches!(err, SessionError::Unauthenticated));
    assert_eq!(err.redirect(), Some(LOGIN_PATH));
}

#[test]
fn test_open_existing_missing_post() {
    let store = MemoryStore::new();
    let auth = StaticAuth::signed_in("admin@example.com");
    let err = EditorSession::open_existing(&auth, &store, &store, "404").unwrap_err();
    assert!(matches!(err, SessionError::NotFound(id) if id == "404"));
}

#[test]
fn test_session_creates_post() {
    let store = MemoryStore::new();
    let auth = StaticAuth::signed_in("admin@example.com");
    let mut session = EditorSession::open_new(&auth, &store, &store, "hangroom").unwrap();
    session.dispatch(Message::SetTitle("Game Night".to_string()));
    session.dispatch(Message::Input("Bring **snacks**.".to_string()));

    let id = session.save().unwrap();
    let saved = store.get(&id).unwrap().unwrap();
    assert_eq!(saved.slug, "game-night");
    assert_eq!(saved.topic, "hangroom");
    assert_eq!(saved.content, "Bring **snacks**.");
    assert!(!saved.published);
    assert!(session.model().is_editing());
    assert!(session
        .take_effects()
        .contains(&Effect::Navigate(DASHBOARD_PATH)));
}

#[test]
fn test_session_updates_existing_post_in_place() {
    let store = MemoryStore::new();
    let id = stored_post(&store);
    let auth = StaticAuth::signed_in("admin@example.com");
    let mut session = EditorSession::open_existing(&auth, &store, &store, &id).unwrap();
    assert_eq!(session.model().buffer.text(), "Check the *rotors* first.");

    session.dispatch(Message::SetTitle("Brake Pads 102".to_string()));
    session.dispatch(Message::SetPublished(true));
    assert_eq!(session.save().unwrap(), id);

    let saved = store.get(&id).unwrap().unwrap();
    assert_eq!(saved.title, "Brake Pads 102");
    assert_eq!(saved.slug, "brake-pads-101");
    assert!(saved.published);
}

#[test]
fn test_save_without_title_is_rejected() {
    let store = MemoryStore::new();
    let auth = StaticAuth::signed_in("admin@example.com");
    let mut session = EditorSession::open_new(&auth, &store, &store, "hubplate").unwrap();
    let err = session.save().unwrap_err();
    assert!(matches!(err, SessionError::MissingField("title")));
    assert_eq!(
        session.model().status,
        SessionStatus::SaveFailed("title is required".to_string())
    );
    assert!(store.list(&crate::store::PostFilter::default()).unwrap().is_empty());
}

#[test]
fn test_duplicate_slug_surfaces_store_error() {
    let store = MemoryStore::new();
    stored_post(&store);
    let auth = StaticAuth::signed_in("admin@example.com");
    let mut session = EditorSession::open_new(&auth, &store, &store, "baybolt").unwrap();
    session.dispatch(Message::SetTitle("Brake Pads 101".to_string()));
    let err = session.save().unwrap_err();
    assert!(matches!(err, SessionError::Store(_)));
    let effects = session.take_effects();
    assert!(matches!(
        effects.as_slice(),
        [Effect::Notify(NoticeLevel::Error, msg)] if msg.starts_with("Error saving post:")
    ));
}

#[test]
fn test_upload_sets_image_url() {
    let store = MemoryStore::with_base_url("https://cdn.example.com/blog-images");
    let auth = StaticAuth::signed_in("admin@example.com");
    let mut session = EditorSession::open_new(&auth, &store, &store, "hubplate").unwrap();
    let url = session
        .upload_image("cover.png", "image/png", PNG_HEADER)
        .unwrap();
    assert!(url.starts_with("https://cdn.example.com/blog-images/"));
    assert!(url.ends_with(".png"));
    assert_eq!(session.model().post.image_url.as_deref(), Some(url.as_str()));
    assert_eq!(store.object_count(), 1);

    session.remove_image();
    assert_eq!(session.model().post.image_url, None);
}

#[test]
fn test_rejected_upload_stores_nothing() {
    let store = MemoryStore::new();
    let auth = StaticAuth::signed_in("admin@example.com");
    let mut session = EditorSession::open_new(&auth, &store, &store, "hubplate").unwrap();
    let err = session
        .upload_image("notes.txt", "text/plain", b"hello")
        .unwrap_err();
    assert!(matches!(err, SessionError::Upload(_)));
    assert_eq!(store.object_count(), 0);
    assert!(matches!(
        session.model().status,
        SessionStatus::UploadFailed(_)
    ));
}
