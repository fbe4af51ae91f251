//! The crawler contract.
//!
//! A crawler knows how to fetch raw data for one domain and turn it into
//! records; the pipeline only ever calls [`Crawler::run`], which ties fetch,
//! parse, and save together. Concrete crawlers are injected into resolvers
//! at construction, so tests swap in scripted ones and the answer logic
//! never knows where its data came from.

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::FetchError;
use crate::models::{Partition, Record, Snapshot};
use crate::snapshot::SnapshotStore;

pub trait Crawler {
    /// Source label for logs.
    fn name(&self) -> String;

    /// Obtain the raw payload for a partition. The payload must already be
    /// JSON text; a source that cannot produce it reports a fetch error and
    /// the cached snapshot stays untouched.
    fn fetch(&self, partition: &Partition) -> Result<String, FetchError>;

    /// Extract records from a fetched payload. Accepts either a bare JSON
    /// array of objects or an envelope-like object with an `items` array.
    fn parse(&self, raw: &str) -> Vec<Record> {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => records_from_json(&value),
            Err(err) => {
                warn!(crawler = %self.name(), error = %err, "unparseable payload");
                Vec::new()
            }
        }
    }

    /// Partitions this source can serve right now, when it knows. Harvest
    /// uses the hint instead of guessing date ranges.
    fn partitions_hint(&self) -> Option<Vec<Partition>> {
        None
    }

    /// Fetch, parse, and replace the partition's snapshot. Reports `true`
    /// only when both the fetch and the save succeeded; on a fetch failure
    /// nothing is written.
    fn run(
        &self,
        store: &SnapshotStore,
        domain: &str,
        partition: &Partition,
        today: NaiveDate,
    ) -> bool {
        let raw = match self.fetch(partition) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(
                    crawler = %self.name(),
                    domain = domain,
                    partition = %partition.label(),
                    error = %err,
                    "fetch failed, keeping cached snapshot"
                );
                return false;
            }
        };
        let items = self.parse(&raw);
        let count = items.len();
        let snapshot = Snapshot::new(today, items);
        match store.save(domain, partition, &snapshot) {
            Ok(()) => {
                info!(
                    crawler = %self.name(),
                    domain = domain,
                    partition = %partition.label(),
                    items = count,
                    "snapshot refreshed"
                );
                true
            }
            Err(err) => {
                warn!(
                    crawler = %self.name(),
                    domain = domain,
                    partition = %partition.label(),
                    error = %err,
                    "snapshot save failed"
                );
                false
            }
        }
    }
}

/// Record extraction shared by the concrete crawlers: a bare array, or an
/// object whose `items` key holds the array. Non-object entries are skipped.
pub fn records_from_json(value: &Value) -> Vec<Record> {
    let array = match value {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => match map.get("items").and_then(Value::as_array) {
            Some(items) => items.as_slice(),
            None => return Vec::new(),
        },
        _ => return Vec::new(),
    };
    array
        .iter()
        .filter_map(|entry| match entry {
            Value::Object(fields) => Some(Record(fields.clone())),
            _ => None,
        })
        .collect()
}

/// A crawler with no source behind it. Every fetch fails, so resolvers fall
/// back to whatever is already cached. Domains without a configured feed or
/// fixture directory get this.
pub struct NullCrawler;

impl Crawler for NullCrawler {
    fn name(&self) -> String {
        "null".to_string()
    }

    fn fetch(&self, _partition: &Partition) -> Result<String, FetchError> {
        Err(FetchError::NoSource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    struct CannedCrawler {
        payload: Option<String>,
    }

    impl Crawler for CannedCrawler {
        fn name(&self) -> String {
            "canned".to_string()
        }

        fn fetch(&self, _partition: &Partition) -> Result<String, FetchError> {
            self.payload.clone().ok_or(FetchError::NoSource)
        }
    }

    #[test]
    fn test_records_from_bare_array_and_envelope() {
        let bare: Value = serde_json::from_str(r#"[{"a":"1"},{"a":"2"},3]"#).unwrap();
        assert_eq!(records_from_json(&bare).len(), 2);

        let envelope: Value =
            serde_json::from_str(r#"{"crawledAt":"2025-03-05","items":[{"a":"1"}]}"#).unwrap();
        assert_eq!(records_from_json(&envelope).len(), 1);

        let neither: Value = serde_json::from_str(r#""just text""#).unwrap();
        assert!(records_from_json(&neither).is_empty());
    }

    #[test]
    fn test_run_saves_on_success() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());
        let crawler = CannedCrawler {
            payload: Some(r#"[{"event":"개강"}]"#.to_string()),
        };
        let part = Partition::Year(2025);
        assert!(crawler.run(&store, "calendar", &part, d(2025, 3, 5)));

        let outcome = store.load("calendar", &part);
        assert_eq!(outcome.records().len(), 1);
    }

    #[test]
    fn test_run_leaves_cache_alone_on_fetch_failure() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());
        let part = Partition::Global;
        let good = Snapshot::new(d(2025, 3, 4), vec![Record::from_pairs(&[("t", "x")])]);
        store.save("shuttle", &part, &good).unwrap();

        let crawler = CannedCrawler { payload: None };
        assert!(!crawler.run(&store, "shuttle", &part, d(2025, 3, 5)));

        // The earlier snapshot survives untouched.
        let outcome = store.load("shuttle", &part);
        assert_eq!(outcome.records().len(), 1);
        match outcome {
            crate::snapshot::LoadOutcome::Loaded(snap) => {
                assert_eq!(snap.crawled_at, d(2025, 3, 4));
            }
            other => panic!("expected Loaded, got {other:?}"),
        }
    }

    #[test]
    fn test_null_crawler_never_succeeds() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());
        assert!(!NullCrawler.run(&store, "meals", &Partition::Global, d(2025, 3, 5)));
    }
}
