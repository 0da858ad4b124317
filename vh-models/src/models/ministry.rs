//! Ministry entity model.

use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::record::RecordId;
use super::Entity;

/// A church ministry listed on the home page. Seed-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ministry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: MinistryIcon,
}

/// Key into the fixed icon set. Unknown keys fall back to `Heart`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MinistryIcon {
    Music,
    HandHeart,
    Users,
    Baby,
    #[default]
    #[serde(other)]
    Heart,
}

impl Entity for Ministry {
    const COLLECTION: Collection = Collection::Ministry;

    fn id(&self) -> Option<RecordId> {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_icon_keys() {
        let m: Ministry = serde_json::from_value(json!({
            "id": 2, "name": "Prière", "description": "", "icon": "HandHeart"
        }))
        .unwrap();
        assert_eq!(m.icon, MinistryIcon::HandHeart);

        let m: Ministry = serde_json::from_value(json!({"name": "X", "icon": "Star"})).unwrap();
        assert_eq!(m.icon, MinistryIcon::Heart);
    }
}
