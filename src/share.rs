//! Social share links for a published post.

use std::borrow::Cow;
use std::fmt;

use urlencoding::encode;

/// Longest title sent as tweet text; longer titles are cut and end in `...`.
pub const TWEET_TEXT_CHARS: usize = 245;

/// Sites a post can be shared to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharePlatform {
    Twitter,
    Facebook,
    LinkedIn,
    Reddit,
}

impl SharePlatform {
    /// Every platform, in the order the share dialog lists them.
    pub const ALL: [Self; 4] = [Self::Twitter, Self::Facebook, Self::LinkedIn, Self::Reddit];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Twitter => "twitter",
            Self::Facebook => "facebook",
            Self::LinkedIn => "linkedin",
            Self::Reddit => "reddit",
        }
    }

    /// The platform's share-intent URL for `page_url`.
    ///
    /// Facebook and LinkedIn take only the URL; the others also carry the
    /// post title.
    pub fn share_url(self, page_url: &str, title: &str) -> String {
        let url = encode(page_url);
        match self {
            Self::Twitter => format!(
                "https://twitter.com/intent/tweet?text={}&url={url}",
                encode(&tweet_text(title))
            ),
            Self::Facebook => format!("https://www.facebook.com/sharer/sharer.php?u={url}"),
            Self::LinkedIn => {
                format!("https://www.linkedin.com/sharing/share-offsite/?url={url}")
            }
            Self::Reddit => format!(
                "https://reddit.com/submit?url={url}&title={}",
                encode(title)
            ),
        }
    }
}

impl fmt::Display for SharePlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Share URLs for every platform.
///
/// # Example
///
/// ```
/// use toolnest::share::{SharePlatform, share_links};
///
/// let links = share_links("https://mktoolnest.com/blog/brake-pads", "Brake Pads");
/// assert_eq!(links[0].0, SharePlatform::Twitter);
/// assert!(links[0].1.contains("text=Brake%20Pads"));
/// ```
pub fn share_links(page_url: &str, title: &str) -> Vec<(SharePlatform, String)> {
    SharePlatform::ALL
        .iter()
        .map(|&platform| (platform, platform.share_url(page_url, title)))
        .collect()
}

fn tweet_text(title: &str) -> Cow<'_, str> {
    if title.chars().count() <= TWEET_TEXT_CHARS {
        return Cow::Borrowed(title);
    }
    let kept: String = title.chars().take(TWEET_TEXT_CHARS - 3).collect();
    Cow::Owned(kept + "...")
}
