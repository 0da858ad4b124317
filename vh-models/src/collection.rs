//! The closed set of content collections.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use vh_core::error::{VhError, VhResult};

/// One of the seven content collections held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Collection {
    Announcement,
    Ministry,
    Subscriber,
    Event,
    Sermon,
    Gallery,
    Notification,
}

impl Collection {
    /// Every collection, in registration order.
    pub const ALL: [Collection; 7] = [
        Collection::Announcement,
        Collection::Ministry,
        Collection::Subscriber,
        Collection::Event,
        Collection::Sermon,
        Collection::Gallery,
        Collection::Notification,
    ];

    /// Entity name as pages address it ("Announcement").
    pub fn name(&self) -> &'static str {
        match self {
            Self::Announcement => "Announcement",
            Self::Ministry => "Ministry",
            Self::Subscriber => "Subscriber",
            Self::Event => "Event",
            Self::Sermon => "Sermon",
            Self::Gallery => "Gallery",
            Self::Notification => "Notification",
        }
    }

    /// Storage key of the collection ("announcements").
    pub fn storage_key(&self) -> &'static str {
        match self {
            Self::Announcement => "announcements",
            Self::Ministry => "ministries",
            Self::Subscriber => "subscribers",
            Self::Event => "events",
            Self::Sermon => "sermons",
            Self::Gallery => "gallery",
            Self::Notification => "notifications",
        }
    }

    /// Whether the schema carries a store-stamped `created_date`.
    pub fn has_created_date(&self) -> bool {
        matches!(self, Self::Subscriber | Self::Notification)
    }

    /// Resolve a collection by entity name or storage key.
    pub fn parse(name: &str) -> VhResult<Self> {
        let trimmed = name.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.name() == trimmed || c.storage_key() == trimmed)
            .ok_or_else(|| VhError::UnknownCollection(trimmed.to_string()))
    }
}

impl FromStr for Collection {
    type Err = VhError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
