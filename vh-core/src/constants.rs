//! Application-wide constants.

/// Application name.
pub const APP_NAME: &str = "Vases d'Honneur";

/// Directory name used under the platform data/config directories.
pub const APP_DIR_NAME: &str = "VasesHonneur";

/// Application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Rolling log file name.
pub const LOG_FILE_NAME: &str = "vases.log";

/// Default broadcast capacity of the store event bus.
pub const DEFAULT_EVENT_BUS_CAPACITY: usize = 256;

/// Record field names with store-managed semantics.
pub mod fields {
    /// Store-assigned record identifier.
    pub const ID: &str = "id";
    /// Creation timestamp, stamped once for collections that carry it.
    pub const CREATED_DATE: &str = "created_date";
}

/// Number of published announcements shown on the home page.
pub const HOME_ANNOUNCEMENT_LIMIT: usize = 6;

/// Length of the signup history window on the stats page, in days.
pub const SIGNUP_WINDOW_DAYS: i64 = 7;
