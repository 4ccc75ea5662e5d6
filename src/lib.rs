// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. store::StoreError)
    clippy::module_name_repetitions
)]

//! # Toolnest
//!
//! The Markdown authoring surface behind the MK Tool Nest topic blogs.
//!
//! Toolnest provides:
//! - Selection-aware toolbar formatting that toggles on a second press
//! - A live HTML preview that matches what readers see
//! - Split-view scroll synchronisation between source and preview
//! - Slugs, excerpts, upload checks, share links and sitemaps for posts
//!
//! ## Architecture
//!
//! An editing session uses The Elm Architecture (TEA) pattern:
//! - **Model**: Session state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **Effect**: Work the host runs after it has rendered the new state
//!
//! Persistence, image hosting and sign-in sit behind the traits in
//! [`store`], injected into each [`session::EditorSession`].
//!
//! ## Modules
//!
//! - [`editor`]: Source buffer and selection
//! - [`format`]: Toolbar rules and the formatting toggle
//! - [`preview`]: Markdown to HTML
//! - [`scroll`]: Pane metrics, view modes and scroll sync
//! - [`session`]: Editing session state machine
//! - [`post`]: Post records, slugs and excerpts
//! - [`topics`]: Topic branding
//! - [`store`]: Backend traits and implementations
//! - [`sitemap`]: Sitemap generation
//! - [`linkify`]: Raw URL linking
//! - [`share`]: Social share links
//! - [`watcher`]: File watching

pub mod config;
pub mod editor;
pub mod format;
pub mod linkify;
pub mod perf;
pub mod post;
pub mod preview;
pub mod scroll;
pub mod session;
pub mod share;
pub mod sitemap;
pub mod store;
pub mod topics;
pub mod watcher;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::editor::{EditorBuffer, Selection};
    pub use crate::format::{FormatRule, ToolbarAction, apply_format};
    pub use crate::post::{PostRecord, generate_slug};
    pub use crate::preview::PreviewRenderer;
    pub use crate::scroll::{Pane, ViewMode};
    pub use crate::session::{Effect, EditorSession, Message, Model, PostEdits, update};
}
