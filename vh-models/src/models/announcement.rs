//! Announcement entity model.

use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::record::RecordId;
use super::{parse_day, Entity};

/// A news item shown on the home page and the events page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub publish_date: String,
    #[serde(rename = "type", default)]
    pub kind: AnnouncementType,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Announcement category. Unrecognized values read as `General`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementType {
    Urgent,
    Event,
    Prayer,
    #[default]
    #[serde(other)]
    General,
}

impl AnnouncementType {
    /// Every category, in display order.
    pub const ALL: [AnnouncementType; 4] = [Self::General, Self::Urgent, Self::Event, Self::Prayer];

    /// Wire value of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Urgent => "urgent",
            Self::Event => "event",
            Self::Prayer => "prayer",
        }
    }

    /// Category from its wire value, falling back to `General`.
    pub fn from_str_lossy(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == value)
            .unwrap_or_default()
    }
}

impl Announcement {
    /// New, unsaved announcement.
    pub fn new(title: impl Into<String>, content: impl Into<String>, kind: AnnouncementType) -> Self {
        Self {
            id: None,
            title: title.into(),
            content: content.into(),
            publish_date: chrono::Utc::now().format("%Y-%m-%d").to_string(),
            kind,
            is_published: true,
            image_url: None,
        }
    }

    /// Parsed publish date, if well-formed.
    pub fn published_on(&self) -> Option<chrono::NaiveDate> {
        parse_day(&self.publish_date)
    }
}

impl Entity for Announcement {
    const COLLECTION: Collection = Collection::Announcement;

    fn id(&self) -> Option<RecordId> {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_type_reads_as_general() {
        let a: Announcement = serde_json::from_value(json!({
            "id": 4, "title": "T", "content": "C", "publish_date": "2024-12-20",
            "type": "festival", "is_published": true
        }))
        .unwrap();
        assert_eq!(a.kind, AnnouncementType::General);
        assert_eq!(a.id, Some(RecordId(4)));
    }

    #[test]
    fn test_to_fields_omits_id_and_unset_image() {
        let mut a = Announcement::new("Veillée", "Vendredi soir", AnnouncementType::Prayer);
        a.id = Some(RecordId(10));
        let fields = a.to_fields().unwrap();
        assert!(!fields.contains_key("id"));
        assert!(!fields.contains_key("image_url"));
        assert_eq!(fields["type"], json!("prayer"));
    }

    #[test]
    fn test_type_from_str_lossy() {
        assert_eq!(AnnouncementType::from_str_lossy("urgent"), AnnouncementType::Urgent);
        assert_eq!(AnnouncementType::from_str_lossy(""), AnnouncementType::General);
    }
}
