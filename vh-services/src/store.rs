//! The entity store: one ordered sequence of records per collection.
//!
//! The store is an explicit instance owned by the registry. It is seeded once
//! and then mutated only through the access facades, which reach the
//! sequences via the crate-private `read_sequence`/`write_sequence` helpers.
//! Locks are plain `std::sync::RwLock`s and are never held across an await.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use vh_core::error::{VhError, VhResult};
use vh_models::seed::{max_seed_id, seed_records};
use vh_models::{Collection, Record, RecordId};

use crate::ids::{Clock, IdGenerator, SequentialIds, SystemClock};
use crate::service::{Service, ServiceState};

fn lock_err(context: &'static str) -> VhError {
    VhError::Storage(format!("poisoned lock: {context}"))
}

#[derive(Debug, Default)]
struct StoreState {
    initialized: bool,
    sequences: HashMap<Collection, Vec<Record>>,
}

/// In-memory store holding every collection.
pub struct EntityStore {
    state: RwLock<StoreState>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    lifecycle: Mutex<ServiceState>,
}

impl EntityStore {
    /// Create an empty, uninitialized store.
    pub fn new(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        let sequences = Collection::ALL
            .into_iter()
            .map(|c| (c, Vec::new()))
            .collect();
        Self {
            state: RwLock::new(StoreState {
                initialized: false,
                sequences,
            }),
            ids,
            clock,
            lifecycle: Mutex::new(ServiceState::Created),
        }
    }

    /// Store using the wall clock and ids continuing after the seed data.
    pub fn with_defaults() -> Self {
        Self::new(
            Arc::new(SequentialIds::after(max_seed_id())),
            Arc::new(SystemClock),
        )
    }

    /// Load the seed population. Only the first call has any effect; later
    /// calls leave existing data untouched and return `false`.
    pub fn initialize(&self) -> VhResult<bool> {
        let mut state = self.state.write().map_err(|_| lock_err("store state"))?;
        if state.initialized {
            debug!("entity store already initialized");
            return Ok(false);
        }

        let mut total = 0;
        for collection in Collection::ALL {
            let seeded = seed_records(collection);
            total += seeded.len();
            state.sequences.insert(collection, seeded);
        }
        state.initialized = true;
        info!("entity store seeded with {total} records");
        Ok(true)
    }

    /// Whether the seed population has been loaded.
    pub fn is_initialized(&self) -> VhResult<bool> {
        let state = self.state.read().map_err(|_| lock_err("store state"))?;
        Ok(state.initialized)
    }

    /// Seed the store on first access.
    fn ensure_initialized(&self) -> VhResult<()> {
        if !self.is_initialized()? {
            self.initialize()?;
        }
        Ok(())
    }

    /// Number of records currently in a collection.
    pub fn count(&self, collection: Collection) -> VhResult<usize> {
        self.read_sequence(collection, |records| records.len())
    }

    /// Record counts for every collection, in declaration order.
    pub fn counts(&self) -> VhResult<Vec<(Collection, usize)>> {
        Collection::ALL
            .into_iter()
            .map(|c| Ok((c, self.count(c)?)))
            .collect()
    }

    /// Run `f` against a collection's sequence under the read lock.
    pub(crate) fn read_sequence<R>(
        &self,
        collection: Collection,
        f: impl FnOnce(&[Record]) -> R,
    ) -> VhResult<R> {
        self.ensure_initialized()?;
        let state = self.state.read().map_err(|_| lock_err("store state"))?;
        let records = state
            .sequences
            .get(&collection)
            .ok_or_else(|| VhError::UnknownCollection(collection.name().to_string()))?;
        Ok(f(records))
    }

    /// Run `f` against a collection's sequence under the write lock.
    pub(crate) fn write_sequence<R>(
        &self,
        collection: Collection,
        f: impl FnOnce(&mut Vec<Record>) -> VhResult<R>,
    ) -> VhResult<R> {
        self.ensure_initialized()?;
        let mut state = self.state.write().map_err(|_| lock_err("store state"))?;
        let records = state
            .sequences
            .get_mut(&collection)
            .ok_or_else(|| VhError::UnknownCollection(collection.name().to_string()))?;
        f(records)
    }

    /// Next id not already present in `records`.
    pub(crate) fn fresh_id(&self, records: &[Record]) -> RecordId {
        loop {
            let id = self.ids.next_id();
            if !records.iter().any(|r| r.id == id) {
                return id;
            }
            debug!("id generator returned {id}, already in use; skipping");
        }
    }

    /// Current time from the injected clock.
    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn set_lifecycle(&self, next: ServiceState) -> VhResult<()> {
        let mut state = self.lifecycle.lock().map_err(|_| lock_err("store lifecycle"))?;
        *state = next;
        Ok(())
    }
}

impl Service for EntityStore {
    fn name(&self) -> &str {
        "entity_store"
    }

    fn state(&self) -> ServiceState {
        self.lifecycle
            .lock()
            .map(|s| *s)
            .unwrap_or(ServiceState::Failed)
    }

    fn init(&self) -> VhResult<()> {
        self.initialize()?;
        self.set_lifecycle(ServiceState::Running)
    }

    fn shutdown(&self) -> VhResult<()> {
        self.set_lifecycle(ServiceState::Stopped)
    }
}
