//! Search-engine sitemap for the public site.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use crate::post::PostRecord;
use crate::topics::TopicRegistry;

/// Production origin used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://mktoolnest.com";

/// How often a page is expected to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFrequency {
    Daily,
    Weekly,
}

impl ChangeFrequency {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }
}

/// One `<url>` element.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub url: String,
    pub last_modified: DateTime<Utc>,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}

/// Entries for the home page, every topic page, the admin login and each
/// published post.
///
/// Static pages are stamped with `now`; posts use their `updated_at` (or
/// `created_at`), falling back to `now`.
pub fn build_sitemap(
    base_url: &str,
    topics: &TopicRegistry,
    posts: &[PostRecord],
    now: DateTime<Utc>,
) -> Vec<SitemapEntry> {
    let base = base_url.trim_end_matches('/');
    let page = |path: &str, priority: f32| SitemapEntry {
        url: format!("{base}{path}"),
        last_modified: now,
        change_frequency: ChangeFrequency::Daily,
        priority,
    };

    let mut entries = vec![page("", 1.0)];
    entries.extend(topics.iter().map(|topic| page(&topic.path(), 0.8)));
    entries.push(page("/admin/login", 0.8));

    entries.extend(posts.iter().filter(|post| post.published).map(|post| {
        let stamp = post
            .updated_at
            .as_deref()
            .or(post.created_at.as_deref())
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map_or(now, |stamp| stamp.with_timezone(&Utc));
        SitemapEntry {
            url: format!("{base}{}", post.path()),
            last_modified: stamp,
            change_frequency: ChangeFrequency::Weekly,
            priority: 0.6,
        }
    }));
    entries
}

/// Serialise entries as a sitemap protocol document.
pub fn to_xml(entries: &[SitemapEntry]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for entry in entries {
        let _ = write!(
            xml,
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    \
             <changefreq>{}</changefreq>\n    <priority>{:.1}</priority>\n  </url>\n",
            escape_xml(&entry.url),
            entry.last_modified.format("%Y-%m-%d"),
            entry.change_frequency.as_str(),
            entry.priority,
        );
    }
    xml.push_str("</urlset>\n");
    xml
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
