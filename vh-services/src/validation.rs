//! Per-collection validation hooks run by the facades on create and update.
//!
//! The default set mirrors what the admin forms and the newsletter sign-up
//! form require before submitting.

use std::collections::HashMap;
use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use vh_core::error::ValidationError;
use vh_models::{Collection, Fields};

lazy_static! {
    // Something@something.tld, no whitespace
    static ref EMAIL: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

/// A single check over the fields about to be stored.
pub trait Validator: Send + Sync {
    fn validate(&self, collection: Collection, fields: &Fields) -> Result<(), ValidationError>;
}

/// Fields that must be present, non-null, and not blank strings.
#[derive(Debug, Clone)]
pub struct RequiredFields(pub Vec<&'static str>);

impl Validator for RequiredFields {
    fn validate(&self, collection: Collection, fields: &Fields) -> Result<(), ValidationError> {
        for &field in &self.0 {
            let present = match fields.get(field) {
                None | Some(Value::Null) => false,
                Some(Value::String(s)) => !s.trim().is_empty(),
                Some(_) => true,
            };
            if !present {
                return Err(ValidationError::MissingField {
                    collection: collection.name().to_string(),
                    field: field.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// When present, the field must be a string.
#[derive(Debug, Clone, Copy)]
pub struct StringField(pub &'static str);

impl Validator for StringField {
    fn validate(&self, collection: Collection, fields: &Fields) -> Result<(), ValidationError> {
        match fields.get(self.0) {
            None | Some(Value::String(_)) => Ok(()),
            Some(other) => Err(ValidationError::InvalidField {
                collection: collection.name().to_string(),
                field: self.0.to_string(),
                reason: format!("expected a string, got {other}"),
            }),
        }
    }
}

/// When present, the field must look like an email address.
#[derive(Debug, Clone, Copy)]
pub struct EmailField(pub &'static str);

impl Validator for EmailField {
    fn validate(&self, collection: Collection, fields: &Fields) -> Result<(), ValidationError> {
        let Some(value) = fields.get(self.0) else {
            return Ok(());
        };
        let ok = value.as_str().map(|s| EMAIL.is_match(s.trim())).unwrap_or(false);
        if ok {
            Ok(())
        } else {
            Err(ValidationError::InvalidField {
                collection: collection.name().to_string(),
                field: self.0.to_string(),
                reason: "not an email address".to_string(),
            })
        }
    }
}

/// Validators registered per collection, run in registration order.
#[derive(Clone, Default)]
pub struct ValidatorSet {
    hooks: HashMap<Collection, Vec<Arc<dyn Validator>>>,
    disabled: bool,
}

impl ValidatorSet {
    /// A set with no hooks.
    pub fn new() -> Self {
        Self::default()
    }

    /// A set that accepts everything, regardless of registered hooks.
    pub fn disabled() -> Self {
        Self {
            hooks: HashMap::new(),
            disabled: true,
        }
    }

    /// The form rules used by the site.
    pub fn defaults() -> Self {
        let mut set = Self::new();
        set.register(Collection::Announcement, RequiredFields(vec!["title", "content"]));
        set.register(Collection::Announcement, StringField("type"));
        set.register(Collection::Event, RequiredFields(vec!["title", "event_date"]));
        set.register(
            Collection::Sermon,
            RequiredFields(vec!["title", "preacher", "sermon_date"]),
        );
        set.register(
            Collection::Gallery,
            RequiredFields(vec!["title", "media_url", "event_name", "event_date"]),
        );
        set.register(Collection::Gallery, StringField("media_type"));
        set.register(Collection::Notification, RequiredFields(vec!["title", "message"]));
        set.register(Collection::Notification, StringField("channel"));
        set.register(Collection::Subscriber, RequiredFields(vec!["full_name", "email"]));
        set.register(Collection::Subscriber, EmailField("email"));
        set
    }

    /// Add a hook for one collection.
    pub fn register(&mut self, collection: Collection, validator: impl Validator + 'static) {
        self.hooks
            .entry(collection)
            .or_default()
            .push(Arc::new(validator));
    }

    /// Number of hooks registered for a collection.
    pub fn hook_count(&self, collection: Collection) -> usize {
        self.hooks.get(&collection).map(Vec::len).unwrap_or(0)
    }

    /// Run every hook for `collection`; the first failure wins.
    pub fn validate(&self, collection: Collection, fields: &Fields) -> Result<(), ValidationError> {
        if self.disabled {
            return Ok(());
        }
        if let Some(hooks) = self.hooks.get(&collection) {
            for hook in hooks {
                hook.validate(collection, fields)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_required_fields() {
        let set = ValidatorSet::defaults();
        assert!(set
            .validate(Collection::Announcement, &fields(json!({"title": "X", "content": "Y"})))
            .is_ok());

        let err = set
            .validate(Collection::Announcement, &fields(json!({"title": "X"})))
            .unwrap_err();
        assert_eq!(err.field(), "content");

        let err = set
            .validate(Collection::Event, &fields(json!({"title": "  ", "event_date": "2025-01-01"})))
            .unwrap_err();
        assert!(matches!(err, ValidationError::MissingField { .. }));
        assert_eq!(err.field(), "title");
    }

    #[test]
    fn test_email_shape() {
        let set = ValidatorSet::defaults();
        let ok = fields(json!({"full_name": "Jean", "email": "j@x.com"}));
        assert!(set.validate(Collection::Subscriber, &ok).is_ok());

        let bad = fields(json!({"full_name": "Jean", "email": "not-an-email"}));
        let err = set.validate(Collection::Subscriber, &bad).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidField { .. }));
        assert_eq!(err.field(), "email");
    }

    #[test]
    fn test_enum_fields_must_be_strings() {
        let set = ValidatorSet::defaults();
        let bad = fields(json!({"title": "X", "content": "Y", "type": 3}));
        assert_eq!(
            set.validate(Collection::Announcement, &bad).unwrap_err().field(),
            "type"
        );
        let unknown_kind = fields(json!({"title": "X", "content": "Y", "type": "whatever"}));
        assert!(set.validate(Collection::Announcement, &unknown_kind).is_ok());
    }

    #[test]
    fn test_ministry_has_no_requirements() {
        let set = ValidatorSet::defaults();
        assert_eq!(set.hook_count(Collection::Ministry), 0);
        assert!(set.validate(Collection::Ministry, &Fields::new()).is_ok());
    }

    #[test]
    fn test_disabled_accepts_everything() {
        let set = ValidatorSet::disabled();
        assert!(set.validate(Collection::Subscriber, &Fields::new()).is_ok());
    }
}
