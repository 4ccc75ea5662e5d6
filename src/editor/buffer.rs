use ropey::Rope;

use super::Selection;
use crate::format::{FormatRule, apply_format};

/// The Markdown source being edited, with its selection and scroll position.
///
/// Backed by a rope for cheap keystroke edits. Selection offsets are char
/// indices; every setter clamps them to the current text so a stale
/// selection from the host can never index past the end.
pub struct EditorBuffer {
    rope: Rope,
    selection: Selection,
    scroll_offset: f64,
    dirty: bool,
}

impl EditorBuffer {
    /// Create a new buffer from a string, caret at the start.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            selection: Selection::caret(0),
            scroll_offset: 0.0,
            dirty: false,
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// The current selection.
    pub const fn selection(&self) -> Selection {
        self.selection
    }

    /// Set the selection, clamped to the text.
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection.clamp_to(self.len_chars());
    }

    /// Select the whole text.
    pub fn select_all(&mut self) {
        self.selection = Selection::new(0, self.len_chars());
    }

    /// Editor scroll position as a fraction of its scrollable range.
    pub const fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    /// Record the editor scroll fraction, clamped to `0.0..=1.0`.
    pub fn set_scroll_offset(&mut self, offset: f64) {
        self.scroll_offset = if offset.is_nan() {
            0.0
        } else {
            offset.clamp(0.0, 1.0)
        };
    }

    /// Whether the buffer has been modified since creation or last save.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the buffer as clean (e.g., after saving).
    pub const fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Length of the text in chars.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Whether the buffer holds no text.
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Replace the selection with `s` and leave the caret after it.
    pub fn insert_str(&mut self, s: &str) {
        let sel = self.selection;
        if s.is_empty() && sel.is_caret() {
            return;
        }
        if !sel.is_caret() {
            self.rope.remove(sel.start..sel.end);
        }
        self.rope.insert(sel.start, s);
        self.selection = Selection::caret(sel.start + s.chars().count());
        self.dirty = true;
    }

    /// Delete the selection, or the char before the caret (Backspace).
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_back(&mut self) -> bool {
        let sel = self.selection;
        if !sel.is_caret() {
            return self.delete_selection();
        }
        if sel.start == 0 {
            return false;
        }
        self.rope.remove(sel.start - 1..sel.start);
        self.selection = Selection::caret(sel.start - 1);
        self.dirty = true;
        true
    }

    /// Delete the selection, or the char at the caret (Delete).
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_forward(&mut self) -> bool {
        let sel = self.selection;
        if !sel.is_caret() {
            return self.delete_selection();
        }
        if sel.start >= self.len_chars() {
            return false;
        }
        self.rope.remove(sel.start..=sel.start);
        self.dirty = true;
        true
    }

    /// Replace the whole text, keeping the selection where it still fits.
    pub fn replace_all(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.selection = self.selection.clamp_to(self.len_chars());
        self.dirty = true;
    }

    /// Apply a toolbar rule to the current selection.
    ///
    /// Returns the selection the host must restore after re-rendering.
    pub fn apply_format(&mut self, rule: &FormatRule) -> Selection {
        let edit = apply_format(&self.text(), self.selection, rule);
        self.rope = Rope::from_str(&edit.content);
        self.selection = edit.selection;
        self.dirty = true;
        edit.selection
    }

    fn delete_selection(&mut self) -> bool {
        let sel = self.selection;
        self.rope.remove(sel.start..sel.end);
        self.selection = Selection::caret(sel.start);
        self.dirty = true;
        true
    }
}

impl Default for EditorBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field(
                "rope",
                &format_args!("Rope({} chars)", self.rope.len_chars()),
            )
            .field("selection", &self.selection)
            .field("scroll_offset", &self.scroll_offset)
            .field("dirty", &self.dirty)
            .finish()
    }
}
