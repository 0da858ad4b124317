//! Typed content models, one per collection.

pub mod announcement;
pub mod ministry;
pub mod subscriber;
pub mod event;
pub mod sermon;
pub mod gallery;
pub mod notification;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use vh_core::constants::fields;
use vh_core::error::{VhError, VhResult};

use crate::collection::Collection;
use crate::record::{Fields, RecordId};

/// A typed view of one collection's records.
pub trait Entity: Serialize + DeserializeOwned {
    /// Collection this model belongs to.
    const COLLECTION: Collection;

    /// Store-assigned id, `None` before the record is created.
    fn id(&self) -> Option<RecordId>;

    /// Serialize into a field map suitable for `create`/`update`.
    /// The id is left out; unset optional fields are omitted.
    fn to_fields(&self) -> VhResult<Fields> {
        match serde_json::to_value(self)? {
            Value::Object(mut map) => {
                map.remove(fields::ID);
                Ok(map)
            }
            other => Err(VhError::Serialization(format!(
                "{} did not serialize to an object: {other}",
                Self::COLLECTION
            ))),
        }
    }
}

/// Parse a `yyyy-mm-dd` date (a longer RFC 3339 timestamp is truncated to its date).
pub fn parse_day(value: &str) -> Option<chrono::NaiveDate> {
    let day = value.get(..10).unwrap_or(value);
    chrono::NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}
