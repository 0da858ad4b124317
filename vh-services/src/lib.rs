//! Vases d'Honneur Services - the content store and everything that reads it.
//!
//! This crate provides:
//! - The entity store (seeded once, owns every record)
//! - Per-collection access facades (list, filter, create, update, delete)
//! - Id and clock generators injected into the store
//! - Pluggable per-collection validation hooks
//! - The store event bus and the query cache that listens to it
//! - Read-side page views (home, events, sermons, gallery, stats)
//! - Service lifecycle and the registry wiring it all together

pub mod service;
pub mod registry;
pub mod event_bus;
pub mod ids;
pub mod store;
pub mod query;
pub mod validation;
pub mod facade;
pub mod cache;
pub mod views;

// Re-export key types
pub use service::{Service, ServiceState};
pub use registry::ServiceRegistry;
pub use event_bus::{EventBus, StoreEvent};
pub use ids::{Clock, FixedClock, IdGenerator, SequentialIds, SystemClock};
pub use store::EntityStore;
pub use query::{ListQuery, Predicate, SortSpec};
pub use validation::{Validator, ValidatorSet};
pub use facade::{Entities, EntityAccess, EntityFacade};
pub use cache::{CacheStats, QueryCache, QueryKey};
pub use views::{PageViews, SubscriberStats};
