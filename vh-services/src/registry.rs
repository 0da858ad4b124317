//! Service registry wiring the store, facades and query cache together.
//!
//! The registry reads the configuration once at construction, builds the
//! shared infrastructure (event bus, store, validators, cache), initializes
//! services in order, and shuts them down in reverse.

use std::sync::Arc;
use tracing::{error, info};

use vh_core::config::{AppConfig, ConfigHandle, DeletePolicy};
use vh_core::error::{VhError, VhResult};
use vh_models::seed::max_seed_id;

use crate::cache::QueryCache;
use crate::event_bus::{EventBus, StoreEvent};
use crate::facade::Entities;
use crate::ids::{Clock, IdGenerator, SequentialIds, SystemClock};
use crate::service::{Service, ServiceState};
use crate::store::EntityStore;
use crate::validation::ValidatorSet;
use crate::views::PageViews;

/// Central registry owning every long-lived component.
pub struct ServiceRegistry {
    /// Application configuration.
    pub config: ConfigHandle,
    /// Store event bus.
    pub event_bus: EventBus,
    store: Arc<EntityStore>,
    validators: Arc<ValidatorSet>,
    cache: Arc<QueryCache>,
    delete_policy: DeletePolicy,
    auto_invalidate: bool,
    /// Registered services in initialization order.
    services: Vec<Arc<dyn Service>>,
}

impl ServiceRegistry {
    /// Build the registry from a configuration handle, using the wall clock
    /// and the configured id start.
    pub async fn new(config: ConfigHandle) -> Self {
        let settings = config.snapshot().await;
        let first_id = settings
            .store
            .first_generated_id
            .unwrap_or_else(|| max_seed_id() + 1);
        Self::with_sources(
            config,
            &settings,
            Arc::new(SequentialIds::starting_at(first_id)),
            Arc::new(SystemClock),
        )
    }

    /// Build the registry with explicit id and clock sources.
    pub fn with_sources(
        config: ConfigHandle,
        settings: &AppConfig,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let event_bus = EventBus::new(settings.events.capacity);
        let store = Arc::new(EntityStore::new(ids, clock));
        let validators = if settings.store.validate {
            ValidatorSet::defaults()
        } else {
            ValidatorSet::disabled()
        };
        let cache = Arc::new(QueryCache::new(event_bus.clone(), settings.cache.enabled));

        let services: Vec<Arc<dyn Service>> = vec![
            Arc::clone(&store) as Arc<dyn Service>,
            Arc::clone(&cache) as Arc<dyn Service>,
        ];
        for service in &services {
            info!("registered service: {}", service.name());
        }

        Self {
            config,
            event_bus,
            store,
            validators: Arc::new(validators),
            cache,
            delete_policy: settings.store.delete_policy,
            auto_invalidate: settings.cache.enabled && settings.cache.auto_invalidate,
            services,
        }
    }

    /// Initialize all services in order, then announce the seeded store.
    pub async fn init_all(&self) -> VhResult<()> {
        info!("initializing {} services", self.services.len());

        for service in &self.services {
            let name = service.name();
            info!("initializing service: {name}");
            if let Err(e) = service.init() {
                error!("failed to initialize service {name}: {e}");
                return Err(VhError::ServiceInit(format!("{name}: {e}")));
            }
        }

        let records: usize = self.store.counts()?.iter().map(|(_, n)| n).sum();
        self.event_bus
            .emit(StoreEvent::StoreInitialized { records });

        info!("all services initialized");
        Ok(())
    }

    /// Shut down all services in reverse order.
    pub async fn shutdown_all(&self) -> VhResult<()> {
        info!("shutting down services");

        for service in self.services.iter().rev() {
            let name = service.name();
            info!("shutting down service: {name}");
            if let Err(e) = service.shutdown() {
                error!("error shutting down service {name}: {e}");
                // Continue shutting down other services
            }
        }

        info!("all services shut down");
        Ok(())
    }

    /// Facade factory over the shared store. With auto-invalidation on,
    /// every mutation marks the query cache stale before returning.
    pub fn entities(&self) -> Entities {
        let entities = Entities::new(
            Arc::clone(&self.store),
            Arc::clone(&self.validators),
            self.event_bus.clone(),
            self.delete_policy,
        );
        if self.auto_invalidate {
            entities.with_cache(Arc::clone(&self.cache))
        } else {
            entities
        }
    }

    /// Page views reading through the query cache.
    pub fn views(&self) -> PageViews {
        PageViews::new(self.entities()).with_cache(Arc::clone(&self.cache))
    }

    pub fn store(&self) -> &Arc<EntityStore> {
        &self.store
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    /// Get a reference to the event bus.
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Get the health status of all services.
    pub fn health_check(&self) -> Vec<(String, ServiceState, bool)> {
        self.services
            .iter()
            .map(|s| (s.name().to_string(), s.state(), s.is_healthy()))
            .collect()
    }

    /// Get the number of registered services.
    pub fn service_count(&self) -> usize {
        self.services.len()
    }
}
