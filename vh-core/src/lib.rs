//! Vases d'Honneur Core - Foundation types, error handling, configuration, and logging.
//!
//! This crate provides the shared foundation used by the other workspace crates:
//! - Application configuration (store policy, cache, logging, event bus)
//! - Global error types covering every failure the content store can report
//! - Structured logging with tracing
//! - Platform directories and common constants

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod platform;

// Re-export commonly used items at the crate root
pub use config::{AppConfig, ConfigHandle, DeletePolicy};
pub use error::{ValidationError, VhError, VhResult};
pub use logging::init_logging;
