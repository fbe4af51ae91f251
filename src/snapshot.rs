//! Snapshot persistence.
//!
//! Every domain's cache lives under one root as
//! `<root>/<domain>/<partition>.json` envelope files. All reads and writes
//! go through [`SnapshotStore`] so the rest of the pipeline never touches
//! the filesystem directly. A load never fails: a missing file and an
//! undecodable file are ordinary outcomes that route the caller to a
//! refresh, not errors.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::SnapshotError;
use crate::models::{Partition, Record, Snapshot};

/// File-backed snapshot cache rooted at one directory.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
}

/// What a load found.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(Snapshot),
    Missing,
    Corrupt,
}

impl LoadOutcome {
    /// The records behind this outcome; empty for `Missing` and `Corrupt`.
    pub fn records(&self) -> &[Record] {
        match self {
            LoadOutcome::Loaded(snap) => &snap.items,
            _ => &[],
        }
    }

    /// Whether the resolver should refresh before filtering. An envelope
    /// with zero items is valid data, but still worth one refresh attempt.
    pub fn needs_refresh(&self) -> bool {
        match self {
            LoadOutcome::Loaded(snap) => snap.items.is_empty(),
            LoadOutcome::Missing | LoadOutcome::Corrupt => true,
        }
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self, LoadOutcome::Corrupt)
    }
}

impl SnapshotStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        SnapshotStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where a domain's partition lives on disk.
    pub fn path(&self, domain: &str, partition: &Partition) -> PathBuf {
        self.root.join(domain).join(partition.file_name())
    }

    /// Load a partition. Never errors: unreadable or undecodable files are
    /// reported as `Corrupt` and logged, missing files as `Missing`.
    pub fn load(&self, domain: &str, partition: &Partition) -> LoadOutcome {
        let path = self.path(domain, partition);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return LoadOutcome::Missing,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "unreadable snapshot");
                return LoadOutcome::Corrupt;
            }
        };
        match serde_json::from_str::<Snapshot>(&text) {
            Ok(snap) => LoadOutcome::Loaded(snap),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "undecodable snapshot");
                LoadOutcome::Corrupt
            }
        }
    }

    /// Replace a partition's envelope wholesale. The snapshot is written to
    /// a sibling temp file and renamed into place, so a concurrent reader
    /// sees either the old envelope or the new one, never a torn write.
    pub fn save(
        &self,
        domain: &str,
        partition: &Partition,
        snapshot: &Snapshot,
    ) -> Result<(), SnapshotError> {
        let path = self.path(domain, partition);
        let dir = path.parent().unwrap_or(&self.root).to_path_buf();
        fs::create_dir_all(&dir).map_err(|source| SnapshotError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        let body =
            serde_json::to_string_pretty(snapshot).map_err(|source| SnapshotError::Encode {
                path: path.clone(),
                source,
            })?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, body).map_err(|source| SnapshotError::Write {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| SnapshotError::Write { path, source })
    }

    /// All partitions on disk for a domain, file name plus load outcome,
    /// sorted by file name. Used by the status command.
    pub fn partitions(&self, domain: &str) -> Vec<(String, LoadOutcome)> {
        let dir = self.root.join(domain);
        let Ok(entries) = fs::read_dir(&dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".json"))
            .collect();
        names.sort();
        names
            .into_iter()
            .map(|name| {
                let path = dir.join(&name);
                (name, self.load_path(&path))
            })
            .collect()
    }

    fn load_path(&self, path: &Path) -> LoadOutcome {
        match fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str::<Snapshot>(&text) {
                Ok(snap) => LoadOutcome::Loaded(snap),
                Err(_) => LoadOutcome::Corrupt,
            },
            Err(err) if err.kind() == ErrorKind::NotFound => LoadOutcome::Missing,
            Err(_) => LoadOutcome::Corrupt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn snap(items: Vec<Record>) -> Snapshot {
        Snapshot::new(d(2025, 3, 5), items)
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());
        let part = Partition::Year(2025);
        let items = vec![Record::from_pairs(&[
            ("month", "03월"),
            ("date", "1일"),
            ("event", "삼일절"),
        ])];
        store.save("calendar", &part, &snap(items.clone())).unwrap();

        match store.load("calendar", &part) {
            LoadOutcome::Loaded(s) => {
                assert_eq!(s.crawled_at, d(2025, 3, 5));
                assert_eq!(s.items, items);
            }
            other => panic!("expected Loaded, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_missing_not_corrupt() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());
        let outcome = store.load("meals", &Partition::Date(d(2025, 3, 5)));
        assert!(matches!(outcome, LoadOutcome::Missing));
        assert!(outcome.needs_refresh());
        assert!(outcome.records().is_empty());
    }

    #[test]
    fn test_garbage_file_is_corrupt() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());
        let part = Partition::Global;
        let path = store.path("shuttle", &part);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();

        let outcome = store.load("shuttle", &part);
        assert!(outcome.is_corrupt());
        assert!(outcome.needs_refresh());
    }

    #[test]
    fn test_empty_envelope_is_valid_but_stale() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());
        let part = Partition::Global;
        store.save("notices", &part, &snap(vec![])).unwrap();

        let outcome = store.load("notices", &part);
        assert!(matches!(outcome, LoadOutcome::Loaded(_)));
        assert!(!outcome.is_corrupt());
        assert!(outcome.needs_refresh());
    }

    #[test]
    fn test_save_replaces_whole_envelope() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());
        let part = Partition::Year(2025);
        let first = vec![Record::from_pairs(&[("event", "개강")])];
        let second = vec![Record::from_pairs(&[("event", "종강")])];
        store.save("calendar", &part, &snap(first)).unwrap();
        store.save("calendar", &part, &snap(second.clone())).unwrap();

        let outcome = store.load("calendar", &part);
        assert_eq!(outcome.records(), &second[..]);
        // No temp file left behind.
        let leftover = store.path("calendar", &part).with_extension("json.tmp");
        assert!(!leftover.exists());
    }

    #[test]
    fn test_partitions_listing_is_sorted() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());
        store
            .save("meals", &Partition::Date(d(2025, 3, 6)), &snap(vec![]))
            .unwrap();
        store
            .save("meals", &Partition::Date(d(2025, 3, 5)), &snap(vec![]))
            .unwrap();

        let names: Vec<String> = store
            .partitions("meals")
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["20250305.json", "20250306.json"]);
        assert!(store.partitions("calendar").is_empty());
    }
}
