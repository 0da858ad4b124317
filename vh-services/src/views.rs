//! Read-side helpers behind the public pages and the admin panel.
//!
//! Each view performs one full read through a facade (through the query
//! cache when one is attached) and then narrows the result in memory:
//! date windows, substring search and distinct values are not store
//! operations.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::warn;

use vh_core::constants::{HOME_ANNOUNCEMENT_LIMIT, SIGNUP_WINDOW_DAYS};
use vh_core::error::VhResult;
use vh_models::models::parse_day;
use vh_models::{
    Announcement, AnnouncementType, Collection, Entity, Event, Gallery, Ministry, Record, Sermon,
};

use crate::cache::QueryCache;
use crate::facade::{Entities, EntityAccess};
use crate::query::{ListQuery, Predicate};

/// Events on either side of a reference day.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventSchedule {
    /// Strictly after the reference day.
    pub upcoming: Vec<Event>,
    /// On or before the reference day.
    pub past: Vec<Event>,
}

/// Sign-ups on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailySignups {
    pub date: NaiveDate,
    pub count: usize,
}

/// Subscriber engagement figures shown on the stats page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriberStats {
    pub total: usize,
    pub active: usize,
    pub with_whatsapp: usize,
    pub email_only: usize,
    /// Rounded percentage of active subscribers, 0 when there are none.
    pub active_rate: u32,
    /// Rounded percentage of subscribers with WhatsApp, 0 when there are none.
    pub whatsapp_rate: u32,
    /// Oldest day first, ending on the reference day.
    pub last_days: Vec<DailySignups>,
    pub new_this_week: usize,
}

fn rounded_percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((part as f64 / total as f64) * 100.0).round() as u32
}

fn decode_all<T: Entity>(records: &[Record]) -> Vec<T> {
    records
        .iter()
        .filter_map(|record| match record.decode::<T>() {
            Ok(entity) => Some(entity),
            Err(e) => {
                warn!("skipping {} record {}: {e}", T::COLLECTION, record.id);
                None
            }
        })
        .collect()
}

/// Page-level reads over the facades.
#[derive(Clone)]
pub struct PageViews {
    entities: Entities,
    cache: Option<Arc<QueryCache>>,
}

impl PageViews {
    pub fn new(entities: Entities) -> Self {
        Self { entities, cache: None }
    }

    /// Route reads through a query cache.
    pub fn with_cache(mut self, cache: Arc<QueryCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    async fn list(&self, collection: Collection, query: &ListQuery) -> VhResult<Vec<Record>> {
        let facade = self.entities.facade(collection);
        match &self.cache {
            Some(cache) => Ok(cache.fetch(&facade, query).await?.as_ref().clone()),
            None => facade.list(query).await,
        }
    }

    async fn filter(
        &self,
        collection: Collection,
        predicate: &Predicate,
        query: &ListQuery,
    ) -> VhResult<Vec<Record>> {
        let facade = self.entities.facade(collection);
        match &self.cache {
            Some(cache) => Ok(cache
                .fetch_filtered(&facade, predicate, query)
                .await?
                .as_ref()
                .clone()),
            None => facade.filter(predicate, query).await,
        }
    }

    async fn published_announcements(&self, limit: Option<usize>) -> VhResult<Vec<Record>> {
        let mut query = ListQuery::new().sorted("-publish_date");
        query.limit = limit;
        self.filter(
            Collection::Announcement,
            &Predicate::new().eq("is_published", true),
            &query,
        )
        .await
    }

    /// Latest published announcements for the home page.
    pub async fn home_announcements(&self, limit: Option<usize>) -> VhResult<Vec<Announcement>> {
        let limit = limit.unwrap_or(HOME_ANNOUNCEMENT_LIMIT);
        let records = self.published_announcements(Some(limit)).await?;
        Ok(decode_all(&records))
    }

    /// Published announcements, optionally restricted to one type.
    ///
    /// The type is compared against the stored string exactly, so records
    /// with a missing or unknown type only show under "all".
    pub async fn announcements_by_type(
        &self,
        kind: Option<AnnouncementType>,
    ) -> VhResult<Vec<Announcement>> {
        let records = self.published_announcements(None).await?;
        let matching: Vec<Record> = records
            .into_iter()
            .filter(|r| kind.map_or(true, |k| r.str_field("type") == Some(k.as_str())))
            .collect();
        Ok(decode_all(&matching))
    }

    /// Ministries in insertion order.
    pub async fn ministries(&self) -> VhResult<Vec<Ministry>> {
        let records = self.list(Collection::Ministry, &ListQuery::new()).await?;
        Ok(decode_all(&records))
    }

    /// Events split around `today`, each side newest first. Events without a
    /// readable date are left out of both lists.
    pub async fn split_events(&self, today: NaiveDate) -> VhResult<EventSchedule> {
        let records = self
            .list(Collection::Event, &ListQuery::new().sorted("-event_date"))
            .await?;
        let mut schedule = EventSchedule::default();
        for event in decode_all::<Event>(&records) {
            match event.date() {
                Some(day) if day > today => schedule.upcoming.push(event),
                Some(_) => schedule.past.push(event),
                None => {}
            }
        }
        Ok(schedule)
    }

    /// Sermons whose title, preacher or scripture reference contains `query`,
    /// ignoring case. An empty query returns everything.
    pub async fn search_sermons(&self, query: &str) -> VhResult<Vec<Sermon>> {
        let records = self
            .list(Collection::Sermon, &ListQuery::new().sorted("-sermon_date"))
            .await?;
        Ok(decode_all::<Sermon>(&records)
            .into_iter()
            .filter(|s| s.matches_query(query))
            .collect())
    }

    async fn gallery_items(&self) -> VhResult<Vec<Gallery>> {
        let records = self
            .list(Collection::Gallery, &ListQuery::new().sorted("-event_date"))
            .await?;
        Ok(decode_all(&records))
    }

    /// Distinct event names in gallery order (newest event first).
    pub async fn gallery_event_names(&self) -> VhResult<Vec<String>> {
        let mut seen = HashSet::new();
        Ok(self
            .gallery_items()
            .await?
            .into_iter()
            .filter_map(|g| seen.insert(g.event_name.clone()).then_some(g.event_name))
            .collect())
    }

    /// Gallery items, optionally restricted to one event name.
    pub async fn gallery_for_event(&self, event_name: Option<&str>) -> VhResult<Vec<Gallery>> {
        Ok(self
            .gallery_items()
            .await?
            .into_iter()
            .filter(|g| event_name.map_or(true, |name| g.event_name == name))
            .collect())
    }

    /// Subscriber figures relative to `today`.
    ///
    /// A subscriber without a readable sign-up date counts as signing up
    /// `today`.
    pub async fn subscriber_stats(&self, today: NaiveDate) -> VhResult<SubscriberStats> {
        let records = self
            .list(Collection::Subscriber, &ListQuery::new().sorted("-created_date"))
            .await?;

        let total = records.len();
        let active = records.iter().filter(|r| r.flag("is_active")).count();
        let with_whatsapp = records
            .iter()
            .filter(|r| r.str_field("whatsapp").is_some_and(|w| !w.trim().is_empty()))
            .count();

        let signup_days: Vec<NaiveDate> = records
            .iter()
            .map(|r| {
                r.str_field("created_date")
                    .or_else(|| r.str_field("subscribe_date"))
                    .and_then(parse_day)
                    .unwrap_or(today)
            })
            .collect();

        let last_days: Vec<DailySignups> = (0..SIGNUP_WINDOW_DAYS)
            .rev()
            .map(|back| {
                let date = today - Duration::days(back);
                let count = signup_days.iter().filter(|d| **d == date).count();
                DailySignups { date, count }
            })
            .collect();
        let new_this_week = last_days.iter().map(|d| d.count).sum();

        Ok(SubscriberStats {
            total,
            active,
            with_whatsapp,
            email_only: total.saturating_sub(with_whatsapp),
            active_rate: rounded_percent(active, total),
            whatsapp_rate: rounded_percent(with_whatsapp, total),
            last_days,
            new_this_week,
        })
    }

    /// Record count per collection, in declaration order.
    pub async fn dashboard_counts(&self) -> VhResult<Vec<(Collection, usize)>> {
        let mut counts = Vec::with_capacity(Collection::ALL.len());
        for collection in Collection::ALL {
            let records = self.list(collection, &ListQuery::new()).await?;
            counts.push((collection, records.len()));
        }
        Ok(counts)
    }
}
