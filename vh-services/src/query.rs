//! Query types shared by the facades and the query cache.
//!
//! A read is an optional exact-match predicate, an optional sort on one
//! field, and an optional limit applied after sorting.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use vh_models::{Fields, Record};

/// Sort on a single field. Written as `field` (ascending) or `-field`
/// (descending).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortSpec {
    pub field: String,
    pub descending: bool,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self { field: field.into(), descending: false }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self { field: field.into(), descending: true }
    }

    /// Parse the `-field` / `field` notation.
    pub fn parse(spec: &str) -> Self {
        let spec = spec.trim();
        match spec.strip_prefix('-') {
            Some(field) => Self::desc(field),
            None => Self::asc(spec.strip_prefix('+').unwrap_or(spec)),
        }
    }

    /// Compare two records on this spec's field.
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        let left = a.value(&self.field);
        let right = b.value(&self.field);
        let ord = compare_values(left.as_deref(), right.as_deref());
        if self.descending {
            ord.reverse()
        } else {
            ord
        }
    }
}

impl FromStr for SortSpec {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for SortSpec {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending {
            write!(f, "-{}", self.field)
        } else {
            write!(f, "{}", self.field)
        }
    }
}

/// Rank of a JSON value kind. Missing and null sort before everything.
fn kind_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Bool(_)) => 1,
        Some(Value::Number(_)) => 2,
        Some(Value::String(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Object(_)) => 5,
    }
}

/// Total order over optional JSON values used for sorting.
///
/// Strings compare lexicographically, so ISO dates order chronologically.
/// Arrays and objects compare equal to their own kind.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

/// Exact-match conditions, all of which must hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    conditions: Fields,
}

impl Predicate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `field == value` condition.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.insert(field.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn conditions(&self) -> &Fields {
        &self.conditions
    }

    /// Whether `record` satisfies every condition. A condition on an absent
    /// field never matches; `id` compares against the record id.
    pub fn matches(&self, record: &Record) -> bool {
        self.conditions.iter().all(|(field, expected)| {
            record
                .value(field)
                .map(|actual| actual.as_ref() == expected)
                .unwrap_or(false)
        })
    }

    /// Stable textual form, used in cache keys.
    pub fn canonical(&self) -> String {
        let mut parts: Vec<String> = self
            .conditions
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        parts.sort();
        parts.join("&")
    }
}

impl From<Fields> for Predicate {
    fn from(conditions: Fields) -> Self {
        Self { conditions }
    }
}

/// Ordering and size of a read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ListQuery {
    pub sort: Option<SortSpec>,
    pub limit: Option<usize>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sort using `-field` / `field` notation.
    pub fn sorted(mut self, spec: &str) -> Self {
        self.sort = Some(SortSpec::parse(spec));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sort then truncate. The sort is stable, so ties keep insertion order.
    pub fn apply(&self, mut records: Vec<Record>) -> Vec<Record> {
        if let Some(sort) = &self.sort {
            records.sort_by(|a, b| sort.compare(a, b));
        }
        if let Some(limit) = self.limit {
            records.truncate(limit);
        }
        records
    }
}
