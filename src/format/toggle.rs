use crate::editor::Selection;

use super::FormatRule;

/// Result of applying a [`FormatRule`]: the new text and the selection the
/// host should restore once it has re-rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatEdit {
    pub content: String,
    pub selection: Selection,
}

/// Apply `rule` to `selection` within `content`.
///
/// A non-empty selection that is already wrapped by exactly the rule's
/// prefix and suffix is unwrapped; any other non-empty selection is wrapped.
/// A bare caret gets `prefix + placeholder + suffix` with the placeholder
/// selected. Offsets are char offsets and are clamped to the content, so this
/// never panics.
///
/// # Example
///
/// ```
/// use toolnest::editor::Selection;
/// use toolnest::format::{FormatRule, ToolbarAction, apply_format};
///
/// let bold = FormatRule::for_action(ToolbarAction::Bold);
/// let edit = apply_format("hello world", Selection::new(6, 11), &bold);
/// assert_eq!(edit.content, "hello **world**");
/// assert_eq!(edit.selection, Selection::new(8, 13));
/// ```
pub fn apply_format(content: &str, selection: Selection, rule: &FormatRule) -> FormatEdit {
    let total = content.chars().count();
    let sel = selection.clamp_to(total);
    let prefix_len = rule.prefix_len();

    let start_byte = byte_offset(content, sel.start);
    let end_byte = byte_offset(content, sel.end);

    if sel.is_caret() {
        let mut out = String::with_capacity(
            content.len() + rule.prefix.len() + rule.placeholder.len() + rule.suffix.len(),
        );
        out.push_str(&content[..start_byte]);
        out.push_str(&rule.prefix);
        out.push_str(&rule.placeholder);
        out.push_str(&rule.suffix);
        out.push_str(&content[start_byte..]);

        let inner_start = sel.start + prefix_len;
        return FormatEdit {
            content: out,
            selection: Selection::new(inner_start, inner_start + rule.placeholder_len()),
        };
    }

    let selected = &content[start_byte..end_byte];
    let before_byte = if sel.start >= prefix_len {
        byte_offset(content, sel.start - prefix_len)
    } else {
        start_byte
    };
    let after_byte = byte_offset(content, sel.end + rule.suffix_len());
    let before = &content[before_byte..start_byte];
    let after = &content[end_byte..after_byte];

    if sel.start >= prefix_len && before == rule.prefix && after == rule.suffix {
        let mut out = String::with_capacity(content.len());
        out.push_str(&content[..before_byte]);
        out.push_str(selected);
        out.push_str(&content[after_byte..]);
        return FormatEdit {
            content: out,
            selection: Selection::new(sel.start - prefix_len, sel.end - prefix_len),
        };
    }

    let mut out = String::with_capacity(content.len() + rule.prefix.len() + rule.suffix.len());
    out.push_str(&content[..start_byte]);
    out.push_str(&rule.prefix);
    out.push_str(selected);
    out.push_str(&rule.suffix);
    out.push_str(&content[end_byte..]);

    let inner_start = sel.start + prefix_len;
    FormatEdit {
        content: out,
        selection: Selection::new(inner_start, inner_start + sel.len()),
    }
}

/// Byte index of the `char_idx`th char, or `s.len()` past the end.
fn byte_offset(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}
