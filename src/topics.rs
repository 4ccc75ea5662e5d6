//! Per-topic branding and copy.
//!
//! Each of the site's topic blogs shares one schema but has its own title,
//! subtitle and accent gradient. They live in a single [`TopicRegistry`] that
//! is built in or loaded from a JSON5 file and passed to whatever needs it.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settings key of the home page hero image.
pub const HOME_HERO_KEY: &str = "hero_home";

#[derive(Debug, Error)]
pub enum TopicError {
    #[error("failed to read topic config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid topic config: {0}")]
    Parse(#[from] json5::Error),
    #[error("topic `{0}` is defined more than once")]
    Duplicate(String),
    #[error("topic config defines no topics")]
    Empty,
    #[error("unknown topic `{id}` (expected one of: {known})")]
    Unknown { id: String, known: String },
}

/// Branding for one topic blog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    /// Audience shown in the admin topic picker.
    pub audience: String,
    /// Accent gradient classes used by badges and heroes.
    pub gradient: String,
}

impl Topic {
    /// Settings key of this topic's hero image.
    pub fn hero_key(&self) -> String {
        format!("hero_{}", self.id)
    }

    /// Public path of the topic landing page.
    pub fn path(&self) -> String {
        format!("/{}", self.id)
    }
}

#[derive(Debug, Deserialize)]
struct TopicFile {
    topics: Vec<Topic>,
}

/// All topics, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicRegistry {
    topics: Vec<Topic>,
}

impl Default for TopicRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TopicRegistry {
    /// Build a registry, rejecting duplicate ids.
    ///
    /// # Errors
    /// Returns [`TopicError::Empty`] or [`TopicError::Duplicate`].
    pub fn new(topics: Vec<Topic>) -> Result<Self, TopicError> {
        if topics.is_empty() {
            return Err(TopicError::Empty);
        }
        for (i, topic) in topics.iter().enumerate() {
            if topics[..i].iter().any(|t| t.id == topic.id) {
                return Err(TopicError::Duplicate(topic.id.clone()));
            }
        }
        Ok(Self { topics })
    }

    /// The six topics the site launched with.
    pub fn builtin() -> Self {
        let entry = |id: &str, title: &str, audience: &str, gradient: &str| Topic {
            id: id.to_string(),
            title: title.to_string(),
            subtitle: format!("Tips & Tools for {audience}"),
            audience: audience.to_string(),
            gradient: gradient.to_string(),
        };
        Self {
            topics: vec![
                entry("hubplate", "HubPlate", "Restaurateurs", "from-sky-500 to-blue-500"),
                entry("hangroom", "Hangroom", "Creators", "from-fuchsia-500 to-violet-500"),
                entry("baybolt", "Baybolt", "Mechanics", "from-red-500 to-orange-500"),
                entry("hugloom", "HugLoom", "Caretakers", "from-emerald-500 to-teal-500"),
                entry(
                    "daylabor",
                    "Day Labor on Demand",
                    "Contractors",
                    "from-amber-500 to-yellow-500",
                ),
                entry("raidmemegen", "Raid Generator", "Gamers", "from-purple-500 to-pink-500"),
            ],
        }
    }

    /// Parse a JSON5 document of the form `{ topics: [ { id, title, ... } ] }`.
    ///
    /// # Errors
    /// Returns an error if the text does not parse or the topics are invalid.
    pub fn from_json5(text: &str) -> Result<Self, TopicError> {
        let file: TopicFile = json5::from_str(text)?;
        Self::new(file.topics)
    }

    /// Load a registry from a JSON5 file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is invalid.
    pub fn load(path: &Path) -> Result<Self, TopicError> {
        let text = std::fs::read_to_string(path).map_err(|source| TopicError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json5(&text)
    }

    pub fn get(&self, id: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == id)
    }

    /// Look up a topic the caller named, listing the valid ids if it is unknown.
    ///
    /// # Errors
    /// Returns [`TopicError::Unknown`].
    pub fn require(&self, id: &str) -> Result<&Topic, TopicError> {
        self.get(id).ok_or_else(|| TopicError::Unknown {
            id: id.to_string(),
            known: self.ids().collect::<Vec<_>>().join(", "),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Topic> {
        self.topics.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.topics.iter().map(|t| t.id.as_str())
    }

    /// Hero image settings keys: the home page first, then one per topic.
    pub fn hero_keys(&self) -> Vec<String> {
        std::iter::once(HOME_HERO_KEY.to_string())
            .chain(self.topics.iter().map(Topic::hero_key))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}
