//! Vases d'Honneur Models - Collections, records, typed models, and seed data.
//!
//! This crate owns the shape of the content: the closed set of collections,
//! the dynamic `Record` the store keeps, typed views of each collection for
//! pages to consume, and the fixed seed population loaded at startup.

pub mod collection;
pub mod record;
pub mod models;
pub mod seed;

// Re-export key types
pub use collection::Collection;
pub use record::{Fields, Record, RecordId};
pub use models::Entity;
pub use models::announcement::{Announcement, AnnouncementType};
pub use models::ministry::{Ministry, MinistryIcon};
pub use models::subscriber::Subscriber;
pub use models::event::Event;
pub use models::sermon::Sermon;
pub use models::gallery::{Gallery, MediaType};
pub use models::notification::{Channel, Notification};
