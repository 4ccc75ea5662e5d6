//! Pane scroll state and editor → preview synchronisation.
//!
//! The [`Pane`] struct mirrors what a host widget reports about a scrollable
//! area. [`sync_preview`] keeps the preview proportionally aligned with the
//! editor while both are on screen. Sync runs one way only: scrolling the
//! preview never moves the editor.

use std::fmt;
use std::str::FromStr;

/// Scroll metrics of one pane, in host units (usually pixels).
///
/// # Example
///
/// ```
/// use toolnest::scroll::Pane;
///
/// let mut pane = Pane::new(1000.0, 200.0);
/// pane.scroll_to_ratio(0.5);
/// assert_eq!(pane.scroll_top(), 400.0);
/// assert_eq!(pane.scroll_ratio(), 0.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pane {
    scroll_top: f64,
    scroll_height: f64,
    client_height: f64,
}

impl Pane {
    /// Create a pane scrolled to the top.
    ///
    /// # Arguments
    ///
    /// * `scroll_height` - Full height of the pane's content
    /// * `client_height` - Visible height of the pane
    pub const fn new(scroll_height: f64, client_height: f64) -> Self {
        Self {
            scroll_top: 0.0,
            scroll_height,
            client_height,
        }
    }

    /// Create a pane from all three metrics as reported by the host.
    pub const fn with_metrics(scroll_top: f64, scroll_height: f64, client_height: f64) -> Self {
        Self {
            scroll_top,
            scroll_height,
            client_height,
        }
    }

    pub const fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    pub const fn scroll_height(&self) -> f64 {
        self.scroll_height
    }

    pub const fn client_height(&self) -> f64 {
        self.client_height
    }

    /// Largest valid `scroll_top`; zero when the content fits.
    pub fn max_scroll(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }

    /// Scroll position as a fraction of the scrollable range.
    ///
    /// Content that fits without scrolling has ratio 0.
    pub fn scroll_ratio(&self) -> f64 {
        let max = self.max_scroll();
        if max <= 0.0 || !max.is_finite() {
            return 0.0;
        }
        let ratio = self.scroll_top / max;
        if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) }
    }

    /// Whether the content is taller than the pane.
    pub fn can_scroll(&self) -> bool {
        self.max_scroll() > 0.0
    }

    /// Jump to a fraction of the scrollable range.
    pub fn scroll_to_ratio(&mut self, ratio: f64) {
        let ratio = if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) };
        self.scroll_top = ratio * self.max_scroll();
    }

    /// Scroll by `delta`, clamped to the valid range.
    pub fn scroll_by(&mut self, delta: f64) {
        self.scroll_top = (self.scroll_top + delta).clamp(0.0, self.max_scroll());
    }

    /// Update content and visible heights (e.g., after a re-render).
    pub fn resize(&mut self, scroll_height: f64, client_height: f64) {
        self.scroll_height = scroll_height;
        self.client_height = client_height;
        self.scroll_top = self.scroll_top.clamp(0.0, self.max_scroll());
    }
}

/// Which panes the editor shows.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Source only.
    Editor,
    /// Rendered output only.
    Preview,
    /// Source and rendered output side by side.
    #[default]
    Split,
}

impl ViewMode {
    pub const fn shows_editor(self) -> bool {
        matches!(self, Self::Editor | Self::Split)
    }

    pub const fn shows_preview(self) -> bool {
        matches!(self, Self::Preview | Self::Split)
    }

    pub const fn is_split(self) -> bool {
        matches!(self, Self::Split)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Editor => "editor",
            Self::Preview => "preview",
            Self::Split => "split",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "editor" => Ok(Self::Editor),
            "preview" => Ok(Self::Preview),
            "split" => Ok(Self::Split),
            other => Err(format!("unknown view mode: {other}")),
        }
    }
}

/// Align the preview with the editor's scroll ratio.
///
/// Only acts in split view with both panes present; otherwise does nothing
/// and returns `None`. Returns the ratio applied.
pub fn sync_preview(
    mode: ViewMode,
    editor: Option<&Pane>,
    preview: Option<&mut Pane>,
) -> Option<f64> {
    if !mode.is_split() {
        return None;
    }
    let (editor, preview) = (editor?, preview?);
    let ratio = editor.scroll_ratio();
    preview.scroll_to_ratio(ratio);
    Some(ratio)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_new_pane_starts_at_top() {
        let pane = Pane::new(1000.0, 200.0);
        assert!(approx(pane.scroll_top(), 0.0));
        assert!(approx(pane.scroll_ratio(), 0.0));
    }

    #[test]
    fn test_ratio_at_bottom_is_one() {
        let pane = Pane::with_metrics(800.0, 1000.0, 200.0);
        assert!(approx(pane.scroll_ratio(), 1.0));
    }

    #[test]
    fn test_ratio_is_zero_when_content_fits() {
        let pane = Pane::with_metrics(0.0, 200.0, 200.0);
        assert!(approx(pane.scroll_ratio(), 0.0));
        assert!(!pane.can_scroll());
    }

    #[test]
    fn test_ratio_is_zero_when_content_shorter_than_pane() {
        let pane = Pane::with_metrics(50.0, 100.0, 300.0);
        assert!(approx(pane.scroll_ratio(), 0.0));
    }

    #[test]
    fn test_scroll_by_clamps_to_range() {
        let mut pane = Pane::new(1000.0, 200.0);
        pane.scroll_by(5000.0);
        assert!(approx(pane.scroll_top(), 800.0));
        pane.scroll_by(-9000.0);
        assert!(approx(pane.scroll_top(), 0.0));
    }

    #[test]
    fn test_resize_clamps_offset() {
        let mut pane = Pane::with_metrics(800.0, 1000.0, 200.0);
        pane.resize(500.0, 200.0);
        assert!(approx(pane.scroll_top(), 300.0));
    }

    #[test]
    fn test_sync_sets_proportional_preview_offset() {
        let editor = Pane::with_metrics(200.0, 1000.0, 200.0);
        let mut preview = Pane::new(2200.0, 200.0);
        let ratio = sync_preview(ViewMode::Split, Some(&editor), Some(&mut preview));
        assert_eq!(ratio, Some(0.25));
        assert!(approx(preview.scroll_top(), 500.0));
    }

    #[test]
    fn test_sync_with_unscrollable_editor_leaves_preview_at_zero() {
        let editor = Pane::with_metrics(0.0, 300.0, 300.0);
        let mut preview = Pane::new(2000.0, 300.0);
        let ratio = sync_preview(ViewMode::Split, Some(&editor), Some(&mut preview));
        assert_eq!(ratio, Some(0.0));
        assert!(approx(preview.scroll_top(), 0.0));
    }

    #[test]
    fn test_sync_is_noop_outside_split_view() {
        let editor = Pane::with_metrics(400.0, 1000.0, 200.0);
        let mut preview = Pane::new(1000.0, 200.0);
        assert_eq!(sync_preview(ViewMode::Editor, Some(&editor), Some(&mut preview)), None);
        assert_eq!(sync_preview(ViewMode::Preview, Some(&editor), Some(&mut preview)), None);
        assert!(approx(preview.scroll_top(), 0.0));
    }

    #[test]
    fn test_sync_is_noop_with_missing_pane() {
        let editor = Pane::with_metrics(400.0, 1000.0, 200.0);
        let mut preview = Pane::new(1000.0, 200.0);
        assert_eq!(sync_preview(ViewMode::Split, None, Some(&mut preview)), None);
        assert_eq!(sync_preview(ViewMode::Split, Some(&editor), None), None);
    }

    #[test]
    fn test_view_mode_parsing() {
        assert_eq!("split".parse::<ViewMode>(), Ok(ViewMode::Split));
        assert!("both".parse::<ViewMode>().is_err());
        assert!(ViewMode::Split.shows_editor() && ViewMode::Split.shows_preview());
        assert!(!ViewMode::Preview.shows_editor());
        assert!(!ViewMode::Editor.shows_preview());
    }
}
