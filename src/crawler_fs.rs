//! Fixture directory crawler.
//!
//! Serves records from local JSON files instead of the network: one file per
//! partition, named exactly like the cache files (`2025.json`,
//! `20250305.json`, `data.json`). Useful for seeding a kiosk offline, for
//! demos, and for tests. Which files count is controlled by glob patterns,
//! `*.json` by default.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde_json::Value;
use walkdir::WalkDir;

use crate::crawler::Crawler;
use crate::error::FetchError;
use crate::models::Partition;

pub struct FixtureCrawler {
    dir: PathBuf,
    include: GlobSet,
}

impl FixtureCrawler {
    pub fn new(dir: impl Into<PathBuf>, patterns: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern)
                .with_context(|| format!("invalid fixture glob: {pattern}"))?;
            builder.add(glob);
        }
        let include = builder.build().context("building fixture glob set")?;
        Ok(FixtureCrawler {
            dir: dir.into(),
            include,
        })
    }
}

impl Crawler for FixtureCrawler {
    fn name(&self) -> String {
        format!("fixture:{}", self.dir.display())
    }

    fn fetch(&self, partition: &Partition) -> Result<String, FetchError> {
        let path = self.dir.join(partition.file_name());
        let body = fs::read_to_string(&path).map_err(|source| FetchError::Fixture {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str::<Value>(&body).map_err(FetchError::Body)?;
        Ok(body)
    }

    /// The partitions actually present in the fixture directory, in file
    /// name order. Files whose names do not follow the partition naming are
    /// ignored.
    fn partitions_hint(&self) -> Option<Vec<Partition>> {
        let mut names: Vec<String> = WalkDir::new(&self.dir)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| self.include.is_match(entry.file_name()))
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();

        let partitions: Vec<Partition> = names
            .iter()
            .filter_map(|name| name.strip_suffix(".json"))
            .filter_map(Partition::from_file_stem)
            .collect();
        if partitions.is_empty() {
            None
        } else {
            Some(partitions)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn globs() -> Vec<String> {
        vec!["*.json".to_string()]
    }

    #[test]
    fn test_fetch_reads_partition_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("2025.json"), r#"[{"event":"개강"}]"#).unwrap();
        let crawler = FixtureCrawler::new(tmp.path(), &globs()).unwrap();

        let raw = crawler.fetch(&Partition::Year(2025)).unwrap();
        assert_eq!(crawler.parse(&raw).len(), 1);

        assert!(crawler.fetch(&Partition::Year(2024)).is_err());
    }

    #[test]
    fn test_non_json_body_is_a_fetch_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("data.json"), "<html>").unwrap();
        let crawler = FixtureCrawler::new(tmp.path(), &globs()).unwrap();
        assert!(matches!(
            crawler.fetch(&Partition::Global),
            Err(FetchError::Body(_))
        ));
    }

    #[test]
    fn test_partitions_hint_lists_recognized_files() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("data.json"), "[]").unwrap();
        fs::write(tmp.path().join("20250305.json"), "[]").unwrap();
        fs::write(tmp.path().join("README.md"), "notes").unwrap();
        fs::write(tmp.path().join("stray.json"), "[]").unwrap();
        let crawler = FixtureCrawler::new(tmp.path(), &globs()).unwrap();

        let hint = crawler.partitions_hint().unwrap();
        assert_eq!(
            hint,
            vec![
                Partition::Date(NaiveDate::from_ymd_opt(2025, 3, 5).unwrap()),
                Partition::Global,
            ]
        );
    }

    #[test]
    fn test_bad_glob_is_rejected() {
        assert!(FixtureCrawler::new("/tmp", &["[".to_string()]).is_err());
    }
}
