//! Live preview rendering.
//!
//! Converts the editor's Markdown into the HTML shown beside it. Published
//! posts go through the same [`PreviewRenderer`], so what the author sees in
//! the preview pane is byte-for-byte what readers get.
//!
//! Rendering is pure: the same input always yields the same HTML. Raw HTML
//! and unsafe link schemes in the source are suppressed.

use std::panic::{AssertUnwindSafe, catch_unwind};

use comrak::{Options, markdown_to_html};
use thiserror::Error;

/// Default upper bound on preview input size.
pub const DEFAULT_MAX_BYTES: usize = 2 * 1024 * 1024;

/// Why a preview could not be produced.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("document is {len} bytes; preview limit is {max} bytes")]
    TooLarge { len: usize, max: usize },
    #[error("markdown renderer failed: {0}")]
    Renderer(String),
}

/// Markdown → HTML renderer shared by the preview pane and published pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewRenderer {
    max_bytes: usize,
}

impl Default for PreviewRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewRenderer {
    pub const fn new() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }

    /// Set the largest document the renderer will accept.
    #[must_use]
    pub const fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub const fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Render `content`, reporting failures to the caller.
    ///
    /// # Errors
    /// Returns [`RenderError::TooLarge`] when the input exceeds the size limit
    /// and [`RenderError::Renderer`] if the Markdown engine panics.
    pub fn try_render(&self, content: &str) -> Result<String, RenderError> {
        if content.len() > self.max_bytes {
            return Err(RenderError::TooLarge {
                len: content.len(),
                max: self.max_bytes,
            });
        }

        let _scope = crate::perf::scope("preview.render");
        let html = catch_unwind(AssertUnwindSafe(|| {
            let mut options = Options::default();
            configure(&mut options);
            markdown_to_html(content, &options)
        }))
        .map_err(|payload| RenderError::Renderer(panic_message(payload.as_ref())))?;

        tracing::trace!(input = content.len(), output = html.len(), "rendered preview");
        Ok(html)
    }

    /// Render `content`, substituting an inline error notice on failure.
    ///
    /// Never fails; the editor stays usable whatever the preview does.
    pub fn render(&self, content: &str) -> String {
        match self.try_render(content) {
            Ok(html) => html,
            Err(err) => {
                tracing::warn!(%err, "preview render failed");
                crate::perf::log_event("preview.error", err.to_string());
                error_notice(&err)
            }
        }
    }
}

/// Render with the default renderer.
///
/// # Example
///
/// ```
/// let html = toolnest::preview::render_preview("line one\nline two");
/// assert!(html.contains("line one<br />"));
/// ```
pub fn render_preview(content: &str) -> String {
    PreviewRenderer::new().render(content)
}

/// The inline notice shown in place of a failed preview.
pub fn error_notice(err: &RenderError) -> String {
    format!(
        "<div class=\"preview-error\" role=\"alert\">Preview unavailable: {}</div>\n",
        escape_html(&err.to_string())
    )
}

fn configure(options: &mut Options) {
    // GFM
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;

    // A single newline inside a paragraph is a visible break.
    options.render.hardbreaks = true;
    options.render.unsafe_ = false;
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

/// Escape text for use in HTML content or a quoted attribute.
pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
