//! Store and facade behaviour across whole operation sequences.

mod common;

use std::collections::HashSet;

use serde_json::json;

use vh_core::config::DeletePolicy;
use vh_core::error::VhError;
use vh_models::{Collection, RecordId, Subscriber};
use vh_services::{EntityAccess, ListQuery, Predicate, StoreEvent};

use common::{create_test_entities, create_test_entities_on, create_test_event_bus, fields};

#[tokio::test]
async fn test_generated_ids_are_unique_across_collections() {
    let entities = create_test_entities(DeletePolicy::Idempotent);
    let mut seen = HashSet::new();

    for round in 0..10 {
        let ann = entities
            .announcements()
            .create(fields(json!({"title": format!("A{round}"), "content": "c"})))
            .await
            .unwrap();
        let min = entities
            .ministries()
            .create(fields(json!({"name": format!("M{round}")})))
            .await
            .unwrap();
        assert!(seen.insert(ann.id), "duplicate id {}", ann.id);
        assert!(seen.insert(min.id), "duplicate id {}", min.id);
    }

    let announcements = entities.announcements().list(&ListQuery::new()).await.unwrap();
    let ids: HashSet<RecordId> = announcements.iter().map(|r| r.id).collect();
    assert_eq!(ids.len(), announcements.len());
}

#[tokio::test]
async fn test_empty_update_is_idempotent() {
    let entities = create_test_entities(DeletePolicy::Idempotent);
    let sermons = entities.sermons();
    let before = sermons.get(RecordId(2)).await.unwrap();

    let after = sermons.update(RecordId(2), fields(json!({}))).await.unwrap();
    assert_eq!(after, before);
    assert_eq!(sermons.get(RecordId(2)).await.unwrap(), before);
}

#[tokio::test]
async fn test_update_never_changes_id() {
    let entities = create_test_entities(DeletePolicy::Idempotent);
    let events = entities.events();

    let updated = events
        .update(RecordId(1), fields(json!({"id": 77, "location": "Abidjan"})))
        .await
        .unwrap();
    assert_eq!(updated.id, RecordId(1));
    assert_eq!(updated.str_field("location"), Some("Abidjan"));
    assert!(events.get(RecordId(77)).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_update_missing_id_never_creates() {
    let entities = create_test_entities(DeletePolicy::Idempotent);
    let ministries = entities.ministries();

    let err = ministries
        .update(RecordId(999), fields(json!({"name": "Ghost"})))
        .await
        .unwrap_err();
    assert!(matches!(err, VhError::NotFound { id: 999, .. }));
    assert_eq!(ministries.list(&ListQuery::new()).await.unwrap().len(), 5);
}

#[tokio::test]
async fn test_delete_idempotent_policy() {
    let entities = create_test_entities(DeletePolicy::Idempotent);
    let gallery = entities.gallery();

    assert!(gallery.delete(RecordId(2)).await.unwrap());
    let remaining: Vec<u64> = gallery
        .list(&ListQuery::new())
        .await
        .unwrap()
        .iter()
        .map(|r| r.id.get())
        .collect();
    assert_eq!(remaining, vec![1, 3]);

    // A repeated delete keeps succeeding and reports nothing removed.
    assert!(!gallery.delete(RecordId(2)).await.unwrap());
    assert!(!gallery.delete(RecordId(2)).await.unwrap());
    assert_eq!(gallery.list(&ListQuery::new()).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_delete_strict_policy() {
    let entities = create_test_entities(DeletePolicy::Strict);
    let gallery = entities.gallery();

    assert!(gallery.delete(RecordId(2)).await.unwrap());
    assert!(gallery.delete(RecordId(2)).await.unwrap_err().is_not_found());
    assert!(gallery.delete(RecordId(2)).await.unwrap_err().is_not_found());
    assert_eq!(gallery.list(&ListQuery::new()).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_repeated_list_is_stable() {
    let entities = create_test_entities(DeletePolicy::Idempotent);
    let ministries = entities.ministries();
    let query = ListQuery::new().sorted("icon");

    let first = ministries.list(&query).await.unwrap();
    let second = ministries.list(&query).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_filter_by_type_is_exact() {
    let entities = create_test_entities(DeletePolicy::Idempotent);
    let announcements = entities.announcements();

    for (title, kind) in [("U1", "urgent"), ("U2", "Urgent"), ("U3", "urgent "), ("U4", "urgent")] {
        announcements
            .create(fields(json!({"title": title, "content": "c", "type": kind})))
            .await
            .unwrap();
    }

    let urgent = announcements
        .filter(&Predicate::new().eq("type", "urgent"), &ListQuery::new())
        .await
        .unwrap();
    let titles: Vec<&str> = urgent.iter().filter_map(|r| r.str_field("title")).collect();
    assert_eq!(titles, vec!["U1", "U4"]);
}

#[tokio::test]
async fn test_create_then_list_round_trip() {
    let entities = create_test_entities(DeletePolicy::Idempotent);
    let sermons = entities.sermons();
    let input = fields(json!({
        "title": "Le bon berger",
        "preacher": "Pasteur Jean-Marc",
        "sermon_date": "2025-12-21",
        "scripture_reference": "Jean 10:11",
        "tags": ["foi", "grâce"]
    }));

    let created = sermons.create(input.clone()).await.unwrap();
    let listed = sermons.list(&ListQuery::new()).await.unwrap();
    let matching: Vec<_> = listed.iter().filter(|r| r.fields == input).collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].id, created.id);
}

#[tokio::test]
async fn test_publish_scenario() {
    let entities = create_test_entities(DeletePolicy::Idempotent);
    let announcements = entities.announcements();
    let published = Predicate::new().eq("is_published", true);

    assert_eq!(announcements.filter(&published, &ListQuery::new()).await.unwrap().len(), 3);

    let draft = announcements
        .create(fields(json!({
            "title": "X", "content": "Y", "type": "urgent", "is_published": false
        })))
        .await
        .unwrap();
    assert_eq!(announcements.filter(&published, &ListQuery::new()).await.unwrap().len(), 3);

    announcements
        .update(draft.id, fields(json!({"is_published": true})))
        .await
        .unwrap();
    let now_published = announcements.filter(&published, &ListQuery::new()).await.unwrap();
    assert_eq!(now_published.len(), 4);
    assert!(now_published.iter().any(|r| r.id == draft.id));
}

#[tokio::test]
async fn test_subscriber_create_keeps_absent_fields_absent() {
    let entities = create_test_entities(DeletePolicy::Idempotent);
    let subscribers = entities.subscribers();
    subscribers
        .create(fields(json!({"full_name": "Awa", "email": "awa@x.com", "is_active": true})))
        .await
        .unwrap();

    let jean = subscribers
        .create(fields(json!({"full_name": "Jean", "email": "j@x.com"})))
        .await
        .unwrap();
    assert!(!jean.fields.contains_key("is_active"));
    assert!(!jean.fields.contains_key("whatsapp"));
    assert_eq!(jean.str_field("created_date"), Some("2025-12-20T10:00:00.000Z"));

    let listed = subscribers.list(&ListQuery::new()).await.unwrap();
    assert_eq!(listed.last().map(|r| r.id), Some(jean.id));

    let typed: Subscriber = jean.decode().unwrap();
    assert!(!typed.is_active);
    assert!(typed.created_at().is_some());
}

#[tokio::test]
async fn test_validation_failure_leaves_store_untouched() {
    let entities = create_test_entities(DeletePolicy::Idempotent);
    let subscribers = entities.subscribers();

    let err = subscribers
        .create(fields(json!({"full_name": "Jean", "email": "pas-un-email"})))
        .await
        .unwrap_err();
    assert!(matches!(err, VhError::Validation(_)));

    let err = entities
        .announcements()
        .create(fields(json!({"content": "no title"})))
        .await
        .unwrap_err();
    assert!(matches!(err, VhError::Validation(_)));

    assert!(subscribers.list(&ListQuery::new()).await.unwrap().is_empty());
    assert_eq!(entities.store().count(Collection::Announcement).unwrap(), 3);
}

#[tokio::test]
async fn test_sorted_and_limited_reads() {
    let entities = create_test_entities(DeletePolicy::Idempotent);
    let sermons = entities.sermons();

    let newest = sermons
        .list(&ListQuery::new().sorted("-sermon_date").limit(2))
        .await
        .unwrap();
    let dates: Vec<&str> = newest.iter().filter_map(|r| r.str_field("sermon_date")).collect();
    assert_eq!(dates, vec!["2025-12-15", "2025-12-08"]);

    let oldest = sermons
        .list(&ListQuery::new().sorted("sermon_date").limit(1))
        .await
        .unwrap();
    assert_eq!(oldest[0].id, RecordId(3));
}

#[tokio::test]
async fn test_filter_by_id() {
    let entities = create_test_entities(DeletePolicy::Idempotent);
    let found = entities
        .ministries()
        .filter(&Predicate::new().eq("id", 4), &ListQuery::new())
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].str_field("icon"), Some("Baby"));
}

#[tokio::test]
async fn test_fresh_stores_are_isolated() {
    let first = create_test_entities(DeletePolicy::Idempotent);
    let second = create_test_entities(DeletePolicy::Idempotent);

    first.ministries().delete(RecordId(1)).await.unwrap();
    assert_eq!(first.store().count(Collection::Ministry).unwrap(), 4);
    assert_eq!(second.store().count(Collection::Ministry).unwrap(), 5);
}

#[tokio::test]
async fn test_mutation_events_in_order() {
    let bus = create_test_event_bus();
    let mut rx = bus.subscribe();
    let entities = create_test_entities_on(bus, DeletePolicy::Idempotent);
    let notifications = entities.notifications();

    let created = notifications
        .create(fields(json!({"title": "Culte", "message": "Dimanche 9h", "channel": "email"})))
        .await
        .unwrap();
    notifications
        .update(created.id, fields(json!({"is_sent": true})))
        .await
        .unwrap();
    notifications.delete(created.id).await.unwrap();

    let collection = Collection::Notification;
    let id = created.id;
    assert_eq!(rx.recv().await.unwrap(), StoreEvent::RecordCreated { collection, id });
    assert_eq!(rx.recv().await.unwrap(), StoreEvent::RecordUpdated { collection, id });
    assert_eq!(rx.recv().await.unwrap(), StoreEvent::RecordDeleted { collection, id });
}

#[tokio::test]
async fn test_unknown_collection_rejected_at_construction() {
    let entities = create_test_entities(DeletePolicy::Idempotent);
    assert!(matches!(entities.by_name("Donation"), Err(VhError::UnknownCollection(name)) if name == "Donation"));
    assert_eq!(entities.by_name("Announcement").unwrap().collection(), Collection::Announcement);
    assert_eq!(entities.by_name("gallery").unwrap().collection(), Collection::Gallery);
}
