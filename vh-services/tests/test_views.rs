//! Page views over the seeded store.

mod common;

use chrono::NaiveDate;
use serde_json::json;

use vh_core::config::DeletePolicy;
use vh_models::{AnnouncementType, Collection, RecordId};
use vh_services::{EntityAccess, PageViews};

use common::{create_test_entities, create_test_registry, fields};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn test_home_announcements_newest_first() {
    let entities = create_test_entities(DeletePolicy::Idempotent);
    let views = PageViews::new(entities.clone());

    let home = views.home_announcements(None).await.unwrap();
    let titles: Vec<&str> = home.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Service de Noël", "Groupe de prière", "Collecte alimentaire"]
    );

    for i in 0..8 {
        entities
            .announcements()
            .create(fields(json!({
                "title": format!("Annonce {i}"),
                "content": "c",
                "publish_date": format!("2025-01-{:02}", i + 1),
                "is_published": true
            })))
            .await
            .unwrap();
    }
    let home = views.home_announcements(None).await.unwrap();
    assert_eq!(home.len(), 6);
    assert_eq!(home[0].title, "Annonce 7");
    assert_eq!(views.home_announcements(Some(2)).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_announcements_by_type() {
    let entities = create_test_entities(DeletePolicy::Idempotent);
    let views = PageViews::new(entities.clone());
    entities
        .announcements()
        .create(fields(json!({"title": "Brouillon", "content": "c", "type": "prayer", "is_published": false})))
        .await
        .unwrap();

    let prayer = views.announcements_by_type(Some(AnnouncementType::Prayer)).await.unwrap();
    assert_eq!(prayer.len(), 1);
    assert_eq!(prayer[0].title, "Groupe de prière");

    assert!(views
        .announcements_by_type(Some(AnnouncementType::Urgent))
        .await
        .unwrap()
        .is_empty());
    assert_eq!(views.announcements_by_type(None).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_split_events() {
    let entities = create_test_entities(DeletePolicy::Idempotent);
    let views = PageViews::new(entities.clone());
    entities
        .events()
        .create(fields(json!({"title": "Culte de rentrée", "event_date": "2025-09-07"})))
        .await
        .unwrap();

    let schedule = views.split_events(day(2025, 12, 20)).await.unwrap();
    assert_eq!(schedule.upcoming.len(), 1);
    assert!(schedule.upcoming[0].title.starts_with("EBIMP"));
    assert_eq!(schedule.past.len(), 1);
    assert_eq!(schedule.past[0].title, "Culte de rentrée");

    let on_the_day = views.split_events(day(2025, 12, 31)).await.unwrap();
    assert!(on_the_day.upcoming.is_empty());
    assert_eq!(on_the_day.past.len(), 2);
}

#[tokio::test]
async fn test_search_sermons() {
    let views = PageViews::new(create_test_entities(DeletePolicy::Idempotent));

    let sanogo = views.search_sermons("sanogo").await.unwrap();
    assert_eq!(sanogo.len(), 2);
    assert_eq!(sanogo[0].sermon_date, "2025-12-15");

    let by_reference = views.search_sermons("JEAN 3").await.unwrap();
    assert_eq!(by_reference.len(), 1);
    assert_eq!(by_reference[0].title, "L'amour inconditionnel de Dieu");

    assert_eq!(views.search_sermons("").await.unwrap().len(), 3);
    assert!(views.search_sermons("apocalypse").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_gallery_views() {
    let entities = create_test_entities(DeletePolicy::Idempotent);
    let views = PageViews::new(entities.clone());
    entities
        .gallery()
        .create(fields(json!({
            "title": "Chorale",
            "media_type": "video",
            "media_url": "/chorale.mp4",
            "event_name": "Culte dominical",
            "event_date": "2025-12-15"
        })))
        .await
        .unwrap();

    let names = views.gallery_event_names().await.unwrap();
    assert_eq!(
        names,
        vec!["Ebimpé 25-26", "Culte spécial jeunesse", "Culte dominical"]
    );

    let dominical = views.gallery_for_event(Some("Culte dominical")).await.unwrap();
    assert_eq!(dominical.len(), 2);
    assert_eq!(views.gallery_for_event(None).await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_subscriber_stats() {
    let entities = create_test_entities(DeletePolicy::Idempotent);
    let views = PageViews::new(entities.clone());

    let empty = views.subscriber_stats(day(2025, 12, 20)).await.unwrap();
    assert_eq!(empty.total, 0);
    assert_eq!(empty.active_rate, 0);
    assert_eq!(empty.whatsapp_rate, 0);
    assert_eq!(empty.last_days.len(), 7);
    assert_eq!(empty.new_this_week, 0);

    let subscribers = entities.subscribers();
    subscribers
        .create(fields(json!({"full_name": "Awa", "email": "awa@x.com", "whatsapp": "+225 07 00 00 00", "is_active": true})))
        .await
        .unwrap();
    subscribers
        .create(fields(json!({"full_name": "Jean", "email": "j@x.com", "whatsapp": ""})))
        .await
        .unwrap();
    subscribers
        .create(fields(json!({"full_name": "Koffi", "email": "k@x.com", "is_active": true})))
        .await
        .unwrap();

    // Every record was stamped on 2025-12-20 by the frozen clock.
    let stats = views.subscriber_stats(day(2025, 12, 20)).await.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.active, 2);
    assert_eq!(stats.with_whatsapp, 1);
    assert_eq!(stats.email_only, 2);
    assert_eq!(stats.active_rate, 67);
    assert_eq!(stats.whatsapp_rate, 33);
    assert_eq!(stats.last_days.first().map(|d| d.date), Some(day(2025, 12, 14)));
    assert_eq!(stats.last_days.last().map(|d| (d.date, d.count)), Some((day(2025, 12, 20), 3)));
    assert_eq!(stats.new_this_week, 3);

    let later = views.subscriber_stats(day(2026, 1, 10)).await.unwrap();
    assert_eq!(later.new_this_week, 0);
}

#[tokio::test]
async fn test_dashboard_counts_through_registry() {
    let registry = create_test_registry().await;
    let views = registry.views();

    let counts = views.dashboard_counts().await.unwrap();
    assert!(counts.contains(&(Collection::Announcement, 3)));
    assert!(counts.contains(&(Collection::Ministry, 5)));
    assert!(counts.contains(&(Collection::Subscriber, 0)));

    registry
        .entities()
        .subscribers()
        .create(fields(json!({"full_name": "Jean", "email": "j@x.com"})))
        .await
        .unwrap();

    let refreshed = views.dashboard_counts().await.unwrap();
    assert!(refreshed.contains(&(Collection::Subscriber, 1)));
    assert!(refreshed.contains(&(Collection::Sermon, 3)));

    registry.shutdown_all().await.unwrap();
}

#[tokio::test]
async fn test_registry_views_see_delete_immediately() {
    let registry = create_test_registry().await;
    let views = registry.views();
    assert_eq!(views.ministries().await.unwrap().len(), 5);

    assert!(registry
        .entities()
        .ministries()
        .delete(RecordId(1))
        .await
        .unwrap());

    let ministries = views.ministries().await.unwrap();
    assert_eq!(ministries.len(), 4);
    assert!(ministries.iter().all(|m| m.id != Some(RecordId(1))));

    registry.shutdown_all().await.unwrap();
}

#[tokio::test]
async fn test_registry_views_see_update_immediately() {
    let registry = create_test_registry().await;
    let views = registry.views();
    assert_eq!(views.home_announcements(None).await.unwrap().len(), 3);

    registry
        .entities()
        .announcements()
        .update(RecordId(2), fields(json!({"is_published": false})))
        .await
        .unwrap();

    let home = views.home_announcements(None).await.unwrap();
    assert_eq!(home.len(), 2);
    assert!(home.iter().all(|a| a.id != Some(RecordId(2))));

    registry.shutdown_all().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_registry_views_never_stale_after_create() {
    let registry = create_test_registry().await;
    let views = registry.views();
    let sermons = registry.entities().sermons();

    for round in 0..200 {
        sermons
            .create(fields(json!({
                "title": format!("Message {round}"),
                "preacher": "Pasteur Jean-Marc",
                "sermon_date": "2025-12-22"
            })))
            .await
            .unwrap();
        let found = views.search_sermons("").await.unwrap();
        assert_eq!(found.len(), 3 + round + 1, "stale read in round {round}");
    }

    registry.shutdown_all().await.unwrap();
}
