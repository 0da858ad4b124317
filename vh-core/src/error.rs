//! Global error types for the content store.
//!
//! All error categories across the workspace are unified into a single
//! `VhError` enum with conversions from underlying library errors.

use thiserror::Error;

/// Convenience type alias for Results using VhError.
pub type VhResult<T> = Result<T, VhError>;

/// Unified error type covering all error categories.
#[derive(Error, Debug)]
pub enum VhError {
    // -- Store errors --
    /// The collection name is not one of the registered collections.
    #[error("unknown collection: {0}")]
    UnknownCollection(String),

    /// No record with this id exists in the collection.
    #[error("{collection} record not found: {id}")]
    NotFound {
        /// Collection the lookup targeted.
        collection: String,
        /// Record id that was requested.
        id: u64,
    },

    /// A validation hook rejected the record.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The backing storage could not be accessed (e.g. a poisoned lock).
    #[error("storage error: {0}")]
    Storage(String),

    // -- Configuration errors --
    /// Failed to load or parse application configuration.
    #[error("configuration error: {0}")]
    Config(String),

    // -- File/IO errors --
    /// File system operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    // -- Service errors --
    /// A service failed to initialize.
    #[error("service init error: {0}")]
    ServiceInit(String),

    // -- Generic --
    /// An unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl VhError {
    /// Build a `NotFound` error for a collection name and record id.
    pub fn not_found(collection: impl Into<String>, id: u64) -> Self {
        VhError::NotFound {
            collection: collection.into(),
            id,
        }
    }

    /// Whether this error is a `NotFound`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, VhError::NotFound { .. })
    }
}

impl From<serde_json::Error> for VhError {
    fn from(e: serde_json::Error) -> Self {
        VhError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for VhError {
    fn from(e: toml::de::Error) -> Self {
        VhError::Config(e.to_string())
    }
}

/// Rejections raised by per-collection validation hooks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is absent, null, or an empty string.
    #[error("{collection}: missing required field `{field}`")]
    MissingField {
        /// Collection being written.
        collection: String,
        /// Name of the missing field.
        field: String,
    },

    /// A field is present but has the wrong shape.
    #[error("{collection}: invalid field `{field}`: {reason}")]
    InvalidField {
        /// Collection being written.
        collection: String,
        /// Name of the offending field.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ValidationError {
    /// Name of the field that failed validation.
    pub fn field(&self) -> &str {
        match self {
            Self::MissingField { field, .. } | Self::InvalidField { field, .. } => field,
        }
    }
}
