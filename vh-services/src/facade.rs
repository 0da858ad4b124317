//! Per-collection access facades over the entity store.
//!
//! `Entities` is the factory: it holds the shared store, validators, event
//! bus and delete policy, and hands out one `EntityFacade` per collection.
//! Every operation yields once before touching the store so callers see the
//! same asynchronous shape a network-backed implementation would have.
//!
//! When a query cache is attached, a successful mutation marks that
//! collection's cached reads stale before it returns, so the next read
//! through the cache sees the new state.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::SecondsFormat;
use serde_json::Value;
use tracing::{debug, warn};

use vh_core::config::DeletePolicy;
use vh_core::constants::fields;
use vh_core::error::{VhError, VhResult};
use vh_models::{Collection, Entity, Fields, Record, RecordId};

use crate::cache::QueryCache;
use crate::event_bus::{EventBus, StoreEvent};
use crate::query::{ListQuery, Predicate};
use crate::store::EntityStore;
use crate::validation::ValidatorSet;

/// Read and write access to one collection.
#[async_trait]
pub trait EntityAccess: Send + Sync {
    /// Collection this facade serves.
    fn collection(&self) -> Collection;

    /// Every record, sorted and limited per `query`.
    async fn list(&self, query: &ListQuery) -> VhResult<Vec<Record>>;

    /// Records matching every condition of `predicate`, sorted and limited.
    async fn filter(&self, predicate: &Predicate, query: &ListQuery) -> VhResult<Vec<Record>>;

    /// Store a new record and return it with its assigned id.
    async fn create(&self, fields: Fields) -> VhResult<Record>;

    /// Shallow-merge `partial` into an existing record.
    async fn update(&self, id: RecordId, partial: Fields) -> VhResult<Record>;

    /// Remove a record. Returns whether anything was removed.
    async fn delete(&self, id: RecordId) -> VhResult<bool>;
}

/// In-memory facade for a single collection.
#[derive(Clone)]
pub struct EntityFacade {
    collection: Collection,
    store: Arc<EntityStore>,
    validators: Arc<ValidatorSet>,
    event_bus: EventBus,
    delete_policy: DeletePolicy,
    cache: Option<Arc<QueryCache>>,
}

impl EntityFacade {
    /// Fetch one record by id.
    pub async fn get(&self, id: RecordId) -> VhResult<Record> {
        tokio::task::yield_now().await;
        self.store
            .read_sequence(self.collection, |records| {
                records.iter().find(|r| r.id == id).cloned()
            })?
            .ok_or_else(|| VhError::not_found(self.collection.name(), id.get()))
    }

    /// `list`, decoded into the collection's typed model.
    pub async fn list_as<T: Entity>(&self, query: &ListQuery) -> VhResult<Vec<T>> {
        self.check_model::<T>()?;
        let records = self.list(query).await?;
        records.iter().map(Record::decode).collect()
    }

    /// `filter`, decoded into the collection's typed model.
    pub async fn filter_as<T: Entity>(
        &self,
        predicate: &Predicate,
        query: &ListQuery,
    ) -> VhResult<Vec<T>> {
        self.check_model::<T>()?;
        let records = self.filter(predicate, query).await?;
        records.iter().map(Record::decode).collect()
    }

    /// Create a record from a typed model and return the stored model.
    pub async fn create_from<T: Entity>(&self, entity: &T) -> VhResult<T> {
        self.check_model::<T>()?;
        let record = self.create(entity.to_fields()?).await?;
        record.decode()
    }

    async fn mutated(&self, event: StoreEvent) {
        if let Some(cache) = &self.cache {
            cache.invalidate(self.collection).await;
        }
        self.event_bus.emit(event);
    }

    fn check_model<T: Entity>(&self) -> VhResult<()> {
        if T::COLLECTION == self.collection {
            Ok(())
        } else {
            Err(VhError::Internal(format!(
                "{} model used with the {} facade",
                T::COLLECTION,
                self.collection
            )))
        }
    }

    fn read_matching(
        &self,
        predicate: Option<&Predicate>,
        query: &ListQuery,
    ) -> VhResult<Vec<Record>> {
        let matching = self.store.read_sequence(self.collection, |records| {
            records
                .iter()
                .filter(|r| predicate.map_or(true, |p| p.matches(r)))
                .cloned()
                .collect::<Vec<_>>()
        })?;
        Ok(query.apply(matching))
    }
}

#[async_trait]
impl EntityAccess for EntityFacade {
    fn collection(&self) -> Collection {
        self.collection
    }

    async fn list(&self, query: &ListQuery) -> VhResult<Vec<Record>> {
        tokio::task::yield_now().await;
        self.read_matching(None, query)
    }

    async fn filter(&self, predicate: &Predicate, query: &ListQuery) -> VhResult<Vec<Record>> {
        tokio::task::yield_now().await;
        self.read_matching(Some(predicate), query)
    }

    async fn create(&self, mut fields: Fields) -> VhResult<Record> {
        tokio::task::yield_now().await;
        let collection = self.collection;

        fields.remove(fields::ID);
        if fields.remove(fields::CREATED_DATE).is_some() {
            debug!("{collection}: ignoring caller-supplied created_date");
        }
        if collection.has_created_date() {
            let stamp = self.store.now().to_rfc3339_opts(SecondsFormat::Millis, true);
            fields.insert(fields::CREATED_DATE.to_string(), Value::String(stamp));
        }
        self.validators.validate(collection, &fields)?;

        let record = self.store.write_sequence(collection, |records| {
            let record = Record::new(self.store.fresh_id(records), fields);
            records.push(record.clone());
            Ok(record)
        })?;

        debug!("{collection}: created record {}", record.id);
        self.mutated(StoreEvent::RecordCreated {
            collection,
            id: record.id,
        })
        .await;
        Ok(record)
    }

    async fn update(&self, id: RecordId, partial: Fields) -> VhResult<Record> {
        tokio::task::yield_now().await;
        let collection = self.collection;

        let record = self.store.write_sequence(collection, |records| {
            let slot = records
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| VhError::not_found(collection.name(), id.get()))?;

            let mut merged = slot.clone();
            let skipped = merged.merge(&partial, &[fields::CREATED_DATE]);
            if !skipped.is_empty() {
                debug!("{collection}: update of {id} ignored keys {skipped:?}");
            }
            self.validators.validate(collection, &merged.fields)?;

            *slot = merged.clone();
            Ok(merged)
        })?;

        debug!("{collection}: updated record {id}");
        self.mutated(StoreEvent::RecordUpdated { collection, id }).await;
        Ok(record)
    }

    async fn delete(&self, id: RecordId) -> VhResult<bool> {
        tokio::task::yield_now().await;
        let collection = self.collection;

        let removed = self.store.write_sequence(collection, |records| {
            match records.iter().position(|r| r.id == id) {
                Some(index) => {
                    records.remove(index);
                    Ok(true)
                }
                None => Ok(false),
            }
        })?;

        if removed {
            debug!("{collection}: deleted record {id}");
            self.mutated(StoreEvent::RecordDeleted { collection, id }).await;
            return Ok(true);
        }

        match self.delete_policy {
            DeletePolicy::Idempotent => {
                debug!("{collection}: delete of missing record {id} is a no-op");
                Ok(false)
            }
            DeletePolicy::Strict => {
                warn!("{collection}: delete of missing record {id}");
                Err(VhError::not_found(collection.name(), id.get()))
            }
        }
    }
}

/// Factory producing one facade per collection over a shared store.
#[derive(Clone)]
pub struct Entities {
    store: Arc<EntityStore>,
    validators: Arc<ValidatorSet>,
    event_bus: EventBus,
    delete_policy: DeletePolicy,
    cache: Option<Arc<QueryCache>>,
}

impl Entities {
    pub fn new(
        store: Arc<EntityStore>,
        validators: Arc<ValidatorSet>,
        event_bus: EventBus,
        delete_policy: DeletePolicy,
    ) -> Self {
        Self {
            store,
            validators,
            event_bus,
            delete_policy,
            cache: None,
        }
    }

    /// Invalidate `cache` for a collection whenever one of its facades
    /// mutates it.
    pub fn with_cache(mut self, cache: Arc<QueryCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Facade for a collection.
    pub fn facade(&self, collection: Collection) -> EntityFacade {
        EntityFacade {
            collection,
            store: Arc::clone(&self.store),
            validators: Arc::clone(&self.validators),
            event_bus: self.event_bus.clone(),
            delete_policy: self.delete_policy,
            cache: self.cache.clone(),
        }
    }

    /// Facade for a collection given by entity name or storage key.
    pub fn by_name(&self, name: &str) -> VhResult<EntityFacade> {
        Ok(self.facade(Collection::parse(name)?))
    }

    /// Facade for a typed model's collection.
    pub fn of<T: Entity>(&self) -> EntityFacade {
        self.facade(T::COLLECTION)
    }

    pub fn announcements(&self) -> EntityFacade {
        self.facade(Collection::Announcement)
    }

    pub fn ministries(&self) -> EntityFacade {
        self.facade(Collection::Ministry)
    }

    pub fn subscribers(&self) -> EntityFacade {
        self.facade(Collection::Subscriber)
    }

    pub fn events(&self) -> EntityFacade {
        self.facade(Collection::Event)
    }

    pub fn sermons(&self) -> EntityFacade {
        self.facade(Collection::Sermon)
    }

    pub fn gallery(&self) -> EntityFacade {
        self.facade(Collection::Gallery)
    }

    pub fn notifications(&self) -> EntityFacade {
        self.facade(Collection::Notification)
    }

    /// Shared store behind every facade.
    pub fn store(&self) -> &Arc<EntityStore> {
        &self.store
    }

    pub fn delete_policy(&self) -> DeletePolicy {
        self.delete_policy
    }
}
