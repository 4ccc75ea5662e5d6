/// A selection in the editor, measured in char offsets.
///
/// `start == end` is a bare caret. Offsets count Unicode scalar values, the
/// same unit ropey uses for char indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub const fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub const fn is_caret(&self) -> bool {
        self.start == self.end
    }

    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Normalize so `start <= end`.
    #[must_use]
    pub const fn normalize(self) -> Self {
        if self.start <= self.end {
            self
        } else {
            Self {
                start: self.end,
                end: self.start,
            }
        }
    }

    /// Normalize and clamp both ends to `len`.
    #[must_use]
    pub fn clamp_to(self, len: usize) -> Self {
        let sel = self.normalize();
        Self {
            start: sel.start.min(len),
            end: sel.end.min(len),
        }
    }
}

impl From<std::ops::Range<usize>> for Selection {
    fn from(r: std::ops::Range<usize>) -> Self {
        Self::new(r.start, r.end)
    }
}

impl From<Selection> for std::ops::Range<usize> {
    fn from(sel: Selection) -> Self {
        sel.start..sel.end
    }
}
