//! Id and clock sources injected into the store.
//!
//! Tests pin both: a fixed starting id and a frozen clock make created
//! records fully predictable.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};

use vh_models::RecordId;

/// Hands out record ids. Every call must return a value never returned before.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> RecordId;
}

/// Monotonic counter, shared across collections.
#[derive(Debug)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    /// Start handing out ids at `first`.
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first.max(1)),
        }
    }

    /// Start right after `last_used`.
    pub fn after(last_used: u64) -> Self {
        Self::starting_at(last_used.saturating_add(1))
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> RecordId {
        RecordId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

/// Source of "now" for creation timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_sequential_ids_are_monotonic() {
        let ids = SequentialIds::after(5);
        assert_eq!(ids.next_id(), RecordId(6));
        assert_eq!(ids.next_id(), RecordId(7));
        assert_eq!(ids.next_id(), RecordId(8));
    }

    #[test]
    fn test_zero_start_is_bumped() {
        let ids = SequentialIds::starting_at(0);
        assert_eq!(ids.next_id(), RecordId(1));
    }

    #[test]
    fn test_fixed_clock() {
        let at = Utc.with_ymd_and_hms(2025, 12, 20, 9, 0, 0).unwrap();
        let clock = FixedClock(at);
        assert_eq!(clock.now(), at);
        assert_eq!(clock.now(), at);
    }
}
