//! Gallery entity model.

use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::record::RecordId;
use super::{parse_day, Entity};

/// A photo or video attached to an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gallery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub media_type: MediaType,
    #[serde(default)]
    pub media_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub event_name: String,
    #[serde(default)]
    pub event_date: String,
    #[serde(default)]
    pub is_featured: bool,
}

/// Kind of media a gallery item points at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Photo,
    Video,
}

impl Gallery {
    /// Thumbnail to display; photos fall back to their own media url.
    pub fn thumbnail(&self) -> Option<&str> {
        match (self.thumbnail_url.as_deref(), self.media_type) {
            (Some(url), _) if !url.is_empty() => Some(url),
            (_, MediaType::Photo) if !self.media_url.is_empty() => Some(&self.media_url),
            _ => None,
        }
    }

    /// Parsed event date, if well-formed.
    pub fn date(&self) -> Option<chrono::NaiveDate> {
        parse_day(&self.event_date)
    }
}

impl Entity for Gallery {
    const COLLECTION: Collection = Collection::Gallery;

    fn id(&self) -> Option<RecordId> {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_photo_thumbnail_falls_back_to_media() {
        let g: Gallery = serde_json::from_value(json!({
            "title": "Louange", "media_type": "photo", "media_url": "/louange.jpg",
            "event_name": "Culte", "event_date": "2025-12-15"
        }))
        .unwrap();
        assert_eq!(g.thumbnail(), Some("/louange.jpg"));
    }

    #[test]
    fn test_video_without_thumbnail() {
        let g: Gallery = serde_json::from_value(json!({
            "title": "Clip", "media_type": "video", "media_url": "/clip.mp4", "thumbnail_url": ""
        }))
        .unwrap();
        assert_eq!(g.thumbnail(), None);
    }
}
