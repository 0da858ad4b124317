//! Query cache over facade reads.
//!
//! Entries are keyed by collection plus the canonical form of the read
//! (operation, predicate, sort, limit). Invalidation marks entries stale
//! rather than dropping them; a stale entry is refreshed on the next fetch.
//! Each collection carries a generation counter so a read that raced with an
//! invalidation is stored as already stale.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use vh_core::error::{VhError, VhResult};
use vh_models::{Collection, Record};

use crate::event_bus::{EventBus, StoreEvent};
use crate::facade::EntityAccess;
use crate::query::{ListQuery, Predicate};
use crate::service::{Service, ServiceState};

/// Identity of a cached read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub collection: Collection,
    canonical: String,
}

impl QueryKey {
    /// Key for a `list` read.
    pub fn list(collection: Collection, query: &ListQuery) -> Self {
        Self {
            collection,
            canonical: format!("list|{}", describe(query)),
        }
    }

    /// Key for a `filter` read.
    pub fn filter(collection: Collection, predicate: &Predicate, query: &ListQuery) -> Self {
        Self {
            collection,
            canonical: format!("filter|{}|{}", predicate.canonical(), describe(query)),
        }
    }

    /// Textual form, e.g. `Announcement:filter|is_published=true|-publish_date|6`.
    pub fn as_str(&self) -> String {
        format!("{}:{}", self.collection, self.canonical)
    }
}

fn describe(query: &ListQuery) -> String {
    let sort = query.sort.as_ref().map(ToString::to_string).unwrap_or_default();
    let limit = query.limit.map(|l| l.to_string()).unwrap_or_default();
    format!("{sort}|{limit}")
}

/// Counters describing cache effectiveness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
    pub entries: usize,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} entries, {} hits, {} misses, {} invalidations",
            self.entries, self.hits, self.misses, self.invalidations
        )
    }
}

#[derive(Debug)]
struct CachedRead {
    records: Arc<Vec<Record>>,
    stale: bool,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<QueryKey, CachedRead>,
    generations: HashMap<Collection, u64>,
}

impl CacheState {
    fn generation(&self, collection: Collection) -> u64 {
        self.generations.get(&collection).copied().unwrap_or(0)
    }

    fn mark_stale(&mut self, collection: Option<Collection>) -> usize {
        match collection {
            Some(c) => *self.generations.entry(c).or_default() += 1,
            None => {
                for c in Collection::ALL {
                    *self.generations.entry(c).or_default() += 1;
                }
            }
        }
        let mut marked = 0;
        for (key, entry) in self.entries.iter_mut() {
            if collection.map_or(true, |c| key.collection == c) && !entry.stale {
                entry.stale = true;
                marked += 1;
            }
        }
        marked
    }
}

/// Cache of facade reads, shared behind `Arc`.
pub struct QueryCache {
    state: Arc<RwLock<CacheState>>,
    enabled: bool,
    event_bus: EventBus,
    hits: AtomicU64,
    misses: AtomicU64,
    invalidations: AtomicU64,
    listener: Mutex<Option<JoinHandle<()>>>,
    lifecycle: Mutex<ServiceState>,
}

impl QueryCache {
    /// Create a cache. A disabled cache always reads through.
    pub fn new(event_bus: EventBus, enabled: bool) -> Self {
        Self {
            state: Arc::new(RwLock::new(CacheState::default())),
            enabled,
            event_bus,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            invalidations: AtomicU64::new(0),
            listener: Mutex::new(None),
            lifecycle: Mutex::new(ServiceState::Created),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Cached `list` read.
    pub async fn fetch(
        &self,
        facade: &dyn EntityAccess,
        query: &ListQuery,
    ) -> VhResult<Arc<Vec<Record>>> {
        let key = QueryKey::list(facade.collection(), query);
        self.fetch_with(key, || facade.list(query)).await
    }

    /// Cached `filter` read.
    pub async fn fetch_filtered(
        &self,
        facade: &dyn EntityAccess,
        predicate: &Predicate,
        query: &ListQuery,
    ) -> VhResult<Arc<Vec<Record>>> {
        let key = QueryKey::filter(facade.collection(), predicate, query);
        self.fetch_with(key, || facade.filter(predicate, query)).await
    }

    async fn fetch_with<F, Fut>(&self, key: QueryKey, read: F) -> VhResult<Arc<Vec<Record>>>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = VhResult<Vec<Record>>>,
    {
        if !self.enabled {
            return Ok(Arc::new(read().await?));
        }

        let generation = {
            let state = self.state.read().await;
            if let Some(entry) = state.entries.get(&key) {
                if !entry.stale {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    debug!("query cache hit: {}", key.as_str());
                    return Ok(Arc::clone(&entry.records));
                }
            }
            state.generation(key.collection)
        };

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!("query cache miss: {}", key.as_str());
        let records = Arc::new(read().await?);

        let mut state = self.state.write().await;
        let stale = state.generation(key.collection) != generation;
        state.entries.insert(
            key,
            CachedRead {
                records: Arc::clone(&records),
                stale,
            },
        );
        Ok(records)
    }

    /// Mark every cached read of `collection` stale. Returns how many
    /// entries changed.
    pub async fn invalidate(&self, collection: Collection) -> usize {
        self.invalidate_scope(Some(collection)).await
    }

    /// Mark every cached read stale.
    pub async fn invalidate_all(&self) -> usize {
        self.invalidate_scope(None).await
    }

    async fn invalidate_scope(&self, collection: Option<Collection>) -> usize {
        let marked = self.state.write().await.mark_stale(collection);
        self.invalidations.fetch_add(1, Ordering::Relaxed);
        debug!(
            "query cache invalidated {marked} entries for {}",
            collection.map(|c| c.name()).unwrap_or("all collections")
        );
        self.event_bus.emit(StoreEvent::CacheInvalidated {
            collection,
            entries: marked,
        });
        marked
    }

    /// Whether a read is cached and fresh.
    pub async fn is_fresh(&self, key: &QueryKey) -> bool {
        self.state
            .read()
            .await
            .entries
            .get(key)
            .map(|e| !e.stale)
            .unwrap_or(false)
    }

    /// Drop every entry.
    pub async fn clear(&self) {
        self.state.write().await.entries.clear();
    }

    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            entries: self.state.read().await.entries.len(),
        }
    }

    /// Invalidate automatically whenever a facade mutation is published.
    ///
    /// Must be called from within a tokio runtime. Replaces any listener
    /// started earlier.
    pub fn spawn_invalidation_listener(self: &Arc<Self>, event_bus: &EventBus) -> VhResult<()> {
        let mut rx = event_bus.subscribe();
        let cache = Arc::clone(self);
        let handle = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        if let Some(collection) = event.mutated_collection() {
                            cache.invalidate(collection).await;
                        }
                    }
                    Err(RecvError::Lagged(missed)) => {
                        warn!("query cache listener lagged by {missed} events; invalidating all");
                        cache.invalidate_all().await;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            debug!("query cache listener stopped");
        });

        let mut slot = self
            .listener
            .lock()
            .map_err(|_| VhError::Internal("query cache listener lock poisoned".into()))?;
        if let Some(previous) = slot.replace(handle) {
            previous.abort();
        }
        info!("query cache invalidation listener started");
        Ok(())
    }

    fn set_lifecycle(&self, next: ServiceState) -> VhResult<()> {
        let mut state = self
            .lifecycle
            .lock()
            .map_err(|_| VhError::Internal("query cache lifecycle lock poisoned".into()))?;
        *state = next;
        Ok(())
    }
}

impl Service for QueryCache {
    fn name(&self) -> &str {
        "query_cache"
    }

    fn state(&self) -> ServiceState {
        self.lifecycle
            .lock()
            .map(|s| *s)
            .unwrap_or(ServiceState::Failed)
    }

    fn init(&self) -> VhResult<()> {
        info!("query cache initialized (enabled: {})", self.enabled);
        self.set_lifecycle(ServiceState::Running)
    }

    fn shutdown(&self) -> VhResult<()> {
        if let Ok(mut slot) = self.listener.lock() {
            if let Some(handle) = slot.take() {
                handle.abort();
            }
        }
        self.set_lifecycle(ServiceState::Stopped)
    }
}
