//! Blog post records and the pure helpers derived from them.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("slug pattern is valid"));

/// Length of an excerpt derived from the post body.
pub const EXCERPT_CHARS: usize = 160;

/// A blog post as stored by the persistence backend.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PostRecord {
    /// Assigned by the store on insert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub slug: String,
    pub content: String,
    #[serde(default)]
    pub excerpt: String,
    pub topic: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub external_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl PostRecord {
    /// A new unpublished draft for `topic`.
    pub fn draft(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            ..Self::default()
        }
    }

    /// Set the title and re-derive the slug from it.
    pub fn set_title_with_slug(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.slug = generate_slug(&self.title);
    }

    /// The excerpt to show in listings, derived from the body when unset.
    pub fn effective_excerpt(&self) -> String {
        if self.excerpt.trim().is_empty() {
            derive_excerpt(&self.content, EXCERPT_CHARS)
        } else {
            self.excerpt.clone()
        }
    }

    /// Public path of the post page.
    pub fn path(&self) -> String {
        format!("/blog/{}", self.slug)
    }
}

/// Derive a URL slug from a title.
///
/// Lowercases, collapses every run of characters outside `[a-z0-9]` into a
/// single hyphen and trims hyphens from both ends.
///
/// # Example
///
/// ```
/// assert_eq!(toolnest::post::generate_slug("Top 10 Tips & Tricks!"), "top-10-tips-tricks");
/// ```
pub fn generate_slug(title: &str) -> String {
    let lower = title.to_lowercase();
    NON_SLUG_CHARS
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

/// First paragraph of `content` as plain text, cut at a word boundary.
pub fn derive_excerpt(content: &str, max_chars: usize) -> String {
    let paragraph = content
        .split("\n\n")
        .map(str::trim)
        .find(|block| {
            !block.is_empty() && !block.starts_with('#') && !block.starts_with("```")
        })
        .unwrap_or_default();

    let plain: String = paragraph
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .filter(|c| !matches!(c, '*' | '_' | '`' | '>'))
        .collect();

    if plain.chars().count() <= max_chars {
        return plain;
    }
    let cut: String = plain.chars().take(max_chars).collect();
    let trimmed = cut.rfind(' ').map_or(cut.as_str(), |i| &cut[..i]);
    format!("{}…", trimmed.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_collapses_punctuation_runs() {
        assert_eq!(generate_slug("Top 10 Tips & Tricks!"), "top-10-tips-tricks");
    }

    #[test]
    fn test_slug_trims_leading_and_trailing_hyphens() {
        assert_eq!(generate_slug("  --Hello, World--  "), "hello-world");
    }

    #[test]
    fn test_slug_replaces_non_ascii() {
        assert_eq!(generate_slug("Café Crème"), "caf-cr-me");
    }

    #[test]
    fn test_slug_of_symbols_is_empty() {
        assert_eq!(generate_slug("!!!"), "");
    }

    #[test]
    fn test_set_title_updates_slug() {
        let mut post = PostRecord::draft("baybolt");
        post.set_title_with_slug("Brake Pads 101");
        assert_eq!(post.slug, "brake-pads-101");
        assert_eq!(post.path(), "/blog/brake-pads-101");
    }

    #[test]
    fn test_excerpt_skips_headings_and_strips_markers() {
        let md = "# Title\n\nSome **bold** and `code` text.\n\nSecond paragraph.";
        assert_eq!(derive_excerpt(md, 160), "Some bold and code text.");
    }

    #[test]
    fn test_excerpt_cuts_at_word_boundary() {
        let md = "alpha beta gamma delta";
        assert_eq!(derive_excerpt(md, 13), "alpha beta…");
    }

    #[test]
    fn test_effective_excerpt_prefers_explicit_value() {
        let post = PostRecord {
            excerpt: "Hand written".to_string(),
            content: "Body text".to_string(),
            ..PostRecord::default()
        };
        assert_eq!(post.effective_excerpt(), "Hand written");
    }

    #[test]
    fn test_record_json_uses_backend_field_names() {
        let post = PostRecord {
            title: "T".to_string(),
            slug: "t".to_string(),
            topic: "hugloom".to_string(),
            image_url: Some("https://cdn/x.png".to_string()),
            ..PostRecord::default()
        };
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["image_url"], "https://cdn/x.png");
        assert_eq!(json["published"], false);
        assert!(json.get("id").is_none());
    }
}
