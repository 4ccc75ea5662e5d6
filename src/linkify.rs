//! Turn raw URLs in plain text into links.
//!
//! Used for short author-supplied fields (excerpts, bios) that are shown as
//! text rather than rendered as Markdown.

use std::sync::LazyLock;

use regex::Regex;

use crate::preview::escape_html;

static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(https?://[^\s]+|www\.[^\s]+)").expect("url pattern is valid"));

/// Punctuation that ends a sentence rather than a URL.
const TRAILING: [char; 5] = ['.', ',', '!', '?', ')'];

/// Escape `text` as HTML and wrap every raw URL in an anchor.
///
/// Bare `www.` hosts get an `https://` href. A single trailing `.`, `,`,
/// `!`, `?` or `)` is left outside the link. Links open in a new tab.
///
/// # Example
///
/// ```
/// let html = toolnest::linkify::linkify("see www.example.com.");
/// assert!(html.starts_with(r#"see <a href="https://www.example.com""#));
/// assert!(html.ends_with("</a>."));
/// ```
pub fn linkify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for m in URL.find_iter(text) {
        out.push_str(&escape_html(&text[last..m.start()]));

        let found = m.as_str();
        let (url, tail) = match found.char_indices().next_back() {
            Some((i, c)) if TRAILING.contains(&c) && i > 0 => found.split_at(i),
            _ => (found, ""),
        };
        let href = if url.starts_with("http") {
            url.to_string()
        } else {
            format!("https://{url}")
        };

        out.push_str(&anchor(&href, url));
        out.push_str(&escape_html(tail));
        last = m.end();
    }
    out.push_str(&escape_html(&text[last..]));
    out
}

fn anchor(href: &str, label: &str) -> String {
    format!(
        r#"<a href="{}" target="_blank" rel="noopener noreferrer" class="text-primary hover:underline">{}</a>"#,
        escape_html(href),
        escape_html(label)
    )
}
