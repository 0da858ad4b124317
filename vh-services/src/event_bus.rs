//! Typed event bus for store notifications.
//!
//! Uses tokio broadcast channels so the store never needs to know who is
//! listening. The query cache subscribes to mutation events; the CLI and
//! tests can subscribe too.

use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

use vh_models::{Collection, RecordId};

/// State changes published by the store and the query cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// Seed data was loaded into an empty store.
    StoreInitialized {
        records: usize,
    },
    /// A record was appended to a collection.
    RecordCreated {
        collection: Collection,
        id: RecordId,
    },
    /// An existing record was merged with new fields.
    RecordUpdated {
        collection: Collection,
        id: RecordId,
    },
    /// A record was removed from its collection.
    RecordDeleted {
        collection: Collection,
        id: RecordId,
    },
    /// Cached reads were marked stale. `None` means every collection.
    CacheInvalidated {
        collection: Option<Collection>,
        entries: usize,
    },
}

impl StoreEvent {
    /// Collection a mutation event refers to, if it is a mutation.
    pub fn mutated_collection(&self) -> Option<Collection> {
        match self {
            StoreEvent::RecordCreated { collection, .. }
            | StoreEvent::RecordUpdated { collection, .. }
            | StoreEvent::RecordDeleted { collection, .. } => Some(*collection),
            _ => None,
        }
    }
}

/// Store-wide event bus backed by a tokio broadcast channel.
///
/// Every subscriber gets every event. Subscribers that fall behind receive a
/// `Lagged` error and miss events.
#[derive(Clone)]
pub struct EventBus {
    sender: Arc<broadcast::Sender<StoreEvent>>,
}

impl EventBus {
    /// Create a new EventBus with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Subscribe to store events.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }

    /// Emit an event to all subscribers.
    pub fn emit(&self, event: StoreEvent) {
        let label = event_label(&event);
        match self.sender.send(event) {
            Ok(count) => {
                debug!("event_bus: emitted {label} to {count} subscriber(s)");
            }
            Err(_) => {
                debug!("event_bus: no subscribers for {label}");
            }
        }
    }

    /// Get the current number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Human-readable label for an event (for logging).
fn event_label(event: &StoreEvent) -> &'static str {
    match event {
        StoreEvent::StoreInitialized { .. } => "StoreInitialized",
        StoreEvent::RecordCreated { .. } => "RecordCreated",
        StoreEvent::RecordUpdated { .. } => "RecordUpdated",
        StoreEvent::RecordDeleted { .. } => "RecordDeleted",
        StoreEvent::CacheInvalidated { .. } => "CacheInvalidated",
    }
}
