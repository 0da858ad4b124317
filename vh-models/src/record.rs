//! Dynamic record representation.
//!
//! The store keeps every record as its id plus a JSON field map, so fields a
//! caller never supplied stay absent instead of picking up hidden defaults.

use std::borrow::Cow;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use vh_core::constants::fields;
use vh_core::error::VhResult;

/// Field name to JSON value mapping.
pub type Fields = serde_json::Map<String, Value>;

/// Store-assigned record identifier, unique within its collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl RecordId {
    /// Raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        RecordId(id)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored record: its id and every other field.
///
/// Serializes as a flat JSON object (`{"id": 1, "title": ...}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: Fields,
}

impl Record {
    /// Build a record; an `id` key inside `fields` is dropped.
    pub fn new(id: RecordId, mut fields: Fields) -> Self {
        fields.remove(fields::ID);
        Self { id, fields }
    }

    /// Look up a field by name. `id` resolves to the record id.
    pub fn value(&self, field: &str) -> Option<Cow<'_, Value>> {
        if field == fields::ID {
            Some(Cow::Owned(Value::from(self.id.0)))
        } else {
            self.fields.get(field).map(Cow::Borrowed)
        }
    }

    /// String value of a field, if present and a string.
    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    /// Boolean value of a field; absent or non-boolean reads as `false`.
    pub fn flag(&self, field: &str) -> bool {
        self.fields.get(field).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Shallow-merge `partial` over this record. `id` and any `protected`
    /// keys in `partial` are skipped; returns the names that were skipped.
    pub fn merge(&mut self, partial: &Fields, protected: &[&str]) -> Vec<String> {
        let mut skipped = Vec::new();
        for (key, value) in partial {
            if key == fields::ID || protected.contains(&key.as_str()) {
                skipped.push(key.clone());
                continue;
            }
            self.fields.insert(key.clone(), value.clone());
        }
        skipped
    }

    /// The record as a flat JSON object.
    pub fn to_json(&self) -> Value {
        let mut map = Fields::with_capacity(self.fields.len() + 1);
        map.insert(fields::ID.to_string(), Value::from(self.id.0));
        for (key, value) in &self.fields {
            map.insert(key.clone(), value.clone());
        }
        Value::Object(map)
    }

    /// Decode the record into a typed model.
    pub fn decode<T: DeserializeOwned>(&self) -> VhResult<T> {
        Ok(serde_json::from_value(self.to_json())?)
    }
}
