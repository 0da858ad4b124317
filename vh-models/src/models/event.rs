//! Event entity model.

use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::record::RecordId;
use super::{parse_day, Entity};

/// A dated church event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub event_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
}

impl Event {
    /// Parsed event date, if well-formed.
    pub fn date(&self) -> Option<chrono::NaiveDate> {
        parse_day(&self.event_date)
    }
}

impl Entity for Event {
    const COLLECTION: Collection = Collection::Event;

    fn id(&self) -> Option<RecordId> {
        self.id
    }
}
