//! Core data models used throughout the answer pipeline.
//!
//! These types represent the records, snapshots, and time queries that flow
//! between the crawlers, the cache, and the resolvers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One harvested row: a flat map of field name to JSON value.
///
/// The map is the default `serde_json::Map` (BTree-backed), so serialization
/// is key-sorted. Two records are the same record exactly when their
/// [`canonical`](Record::canonical) forms are equal, which is what the diff
/// and dedup logic relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(pub serde_json::Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Record(serde_json::Map::new())
    }

    /// Build a record from string fields. Crawlers and tests use this for
    /// the common all-text rows.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let mut map = serde_json::Map::new();
        for (k, v) in pairs {
            map.insert((*k).to_string(), Value::String((*v).to_string()));
        }
        Record(map)
    }

    pub fn insert(&mut self, key: &str, value: Value) {
        self.0.insert(key.to_string(), value);
    }

    /// String view of a field; `None` when absent or not a string.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn field_contains(&self, key: &str, needle: &str) -> bool {
        self.field(key).is_some_and(|v| v.contains(needle))
    }

    /// Field as display text: strings pass through, numbers are formatted.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Key-sorted JSON text. This is the record's identity.
    pub fn canonical(&self) -> String {
        // Map is BTree-backed, so to_string is already key-sorted.
        // A flat map of scalars cannot fail to serialize.
        serde_json::to_string(&self.0).unwrap_or_default()
    }
}

impl Default for Record {
    fn default() -> Self {
        Record::new()
    }
}

/// A full harvest of one cache partition, persisted as the JSON envelope
/// `{"crawledAt":"YYYY-MM-DD","items":[...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub crawled_at: NaiveDate,
    pub items: Vec<Record>,
}

impl Snapshot {
    pub fn new(crawled_at: NaiveDate, items: Vec<Record>) -> Self {
        Snapshot { crawled_at, items }
    }
}

/// How a domain's cache is keyed on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    /// One file for the whole domain (`data.json`).
    Global,
    /// One file per academic year (`2025.json`).
    Year(i32),
    /// One file per calendar date (`20250301.json`).
    Date(NaiveDate),
}

impl Partition {
    pub fn file_name(&self) -> String {
        match self {
            Partition::Global => "data.json".to_string(),
            Partition::Year(y) => format!("{y}.json"),
            Partition::Date(d) => format!("{}.json", d.format("%Y%m%d")),
        }
    }

    /// Short label for logs and the status listing.
    pub fn label(&self) -> String {
        match self {
            Partition::Global => "global".to_string(),
            Partition::Year(y) => y.to_string(),
            Partition::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }

    /// Inverse of [`file_name`](Partition::file_name), minus the extension:
    /// `data` is global, four digits a year, eight digits a date.
    pub fn from_file_stem(stem: &str) -> Option<Partition> {
        if stem == "data" {
            return Some(Partition::Global);
        }
        if stem.len() == 4 {
            return stem.parse::<i32>().ok().map(Partition::Year);
        }
        if stem.len() == 8 {
            return NaiveDate::parse_from_str(stem, "%Y%m%d")
                .ok()
                .map(Partition::Date);
        }
        None
    }
}

/// How precisely a question's temporal expression pinned down a date.
///
/// Ordered by specificity: `Exact` beats `Month` beats `Year` beats `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    Exact,
    Month,
    Year,
    Failed,
}

impl Precision {
    pub fn specificity(&self) -> u8 {
        match self {
            Precision::Exact => 3,
            Precision::Month => 2,
            Precision::Year => 1,
            Precision::Failed => 0,
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, Precision::Exact)
    }
}

/// A parsed temporal expression: the original text, the date it resolved to,
/// and how much of that date the text actually specified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeQuery {
    pub raw: String,
    pub resolved: NaiveDate,
    pub precision: Precision,
}

/// A fuzzy-match candidate with its similarity score in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
    pub name: String,
    pub score: f64,
}
