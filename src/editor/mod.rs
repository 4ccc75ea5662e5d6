//! Editing buffer for the Markdown authoring surface.
//!
//! Provides a rope-backed text buffer with a char-offset selection and the
//! editor's scroll fraction, designed to be driven by the session's
//! `update` function.

mod buffer;
mod selection;

pub use buffer::EditorBuffer;
pub use selection::Selection;
