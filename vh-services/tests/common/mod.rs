//! Shared test utilities for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use vh_core::config::{AppConfig, ConfigHandle, DeletePolicy};
use vh_models::seed::max_seed_id;
use vh_models::Fields;
use vh_services::{
    Entities, EntityStore, EventBus, FixedClock, QueryCache, SequentialIds, ServiceRegistry,
    ValidatorSet,
};

/// Instant every test store reads as "now".
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 12, 20, 10, 0, 0).unwrap()
}

/// Create an EventBus with a small buffer suitable for tests.
pub fn create_test_event_bus() -> EventBus {
    EventBus::new(64)
}

/// A fresh store with a frozen clock and ids continuing after the seed data.
pub fn create_test_store() -> Arc<EntityStore> {
    let store = EntityStore::new(
        Arc::new(SequentialIds::after(max_seed_id())),
        Arc::new(FixedClock(test_now())),
    );
    store.initialize().expect("failed to seed test store");
    Arc::new(store)
}

/// Facade factory over a fresh seeded store with default validators.
pub fn create_test_entities(policy: DeletePolicy) -> Entities {
    create_test_entities_on(create_test_event_bus(), policy)
}

/// Facade factory publishing on the given bus.
pub fn create_test_entities_on(bus: EventBus, policy: DeletePolicy) -> Entities {
    Entities::new(
        create_test_store(),
        Arc::new(ValidatorSet::defaults()),
        bus,
        policy,
    )
}

/// An enabled query cache on the given bus.
pub fn create_test_cache(bus: &EventBus) -> Arc<QueryCache> {
    Arc::new(QueryCache::new(bus.clone(), true))
}

/// Create a ConfigHandle wrapping a default config.
pub fn create_test_config_handle() -> ConfigHandle {
    ConfigHandle::new(AppConfig::default())
}

/// An initialized registry with a frozen clock.
pub async fn create_test_registry() -> ServiceRegistry {
    let settings = AppConfig::default();
    let registry = ServiceRegistry::with_sources(
        ConfigHandle::new(settings.clone()),
        &settings,
        Arc::new(SequentialIds::after(max_seed_id())),
        Arc::new(FixedClock(test_now())),
    );
    registry.init_all().await.expect("failed to init registry");
    registry
}

/// Turn a `json!` object into a field map.
pub fn fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}
