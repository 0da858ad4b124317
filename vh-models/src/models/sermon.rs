//! Sermon entity model.

use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::record::RecordId;
use super::Entity;

/// A recorded message with optional video/audio links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sermon {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub preacher: String,
    #[serde(default)]
    pub sermon_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scripture_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

impl Sermon {
    /// Case-insensitive match against title, preacher, and scripture reference.
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.preacher.to_lowercase().contains(&needle)
            || self
                .scripture_reference
                .as_deref()
                .is_some_and(|s| s.to_lowercase().contains(&needle))
    }
}

impl Entity for Sermon {
    const COLLECTION: Collection = Collection::Sermon;

    fn id(&self) -> Option<RecordId> {
        self.id
    }
}
