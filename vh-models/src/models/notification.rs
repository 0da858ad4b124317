//! Notification entity model.

use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::record::RecordId;
use super::Entity;

/// A message prepared in the admin panel for subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub channel: Channel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<String>,
    #[serde(default)]
    pub is_sent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,
}

/// Delivery channel of a notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    #[default]
    All,
    Whatsapp,
    Email,
}

impl Entity for Notification {
    const COLLECTION: Collection = Collection::Notification;

    fn id(&self) -> Option<RecordId> {
        self.id
    }
}
