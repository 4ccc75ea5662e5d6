//! Toolbar formatting for the Markdown editor.
//!
//! A [`FormatRule`] describes the markers one toolbar button wraps around the
//! selection. [`apply_format`] splices them in or out of the text with toggle
//! semantics and reports where the selection should land afterwards.

mod rules;
mod toggle;

pub use rules::{FormatRule, ToolbarAction};
pub use toggle::{FormatEdit, apply_format};
