//! Subscriber entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::record::RecordId;
use super::Entity;

/// Someone who signed up for notifications through a public form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscriber {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,
}

impl Subscriber {
    /// Whether a non-blank WhatsApp number was given.
    pub fn has_whatsapp(&self) -> bool {
        self.whatsapp.as_deref().is_some_and(|w| !w.trim().is_empty())
    }

    /// Parsed creation timestamp.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_date
            .as_deref()
            .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
            .map(|d| d.with_timezone(&Utc))
    }
}

impl Entity for Subscriber {
    const COLLECTION: Collection = Collection::Subscriber;

    fn id(&self) -> Option<RecordId> {
        self.id
    }
}
