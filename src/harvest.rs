//! Bulk cache refresh for the `kiosk harvest` command.
//!
//! Answering refreshes lazily, one partition at a time; harvest is the eager
//! path that warms every partition a domain is likely to serve soon. Crawler
//! failures are reported per partition and never abort the rest of the run.

use anyhow::{bail, Result};
use chrono::{Datelike, Days, NaiveDate};

use crate::assistant::build_crawler;
use crate::config::Config;
use crate::models::Partition;
use crate::router::Domain;
use crate::snapshot::SnapshotStore;

/// Partitions worth keeping warm for a domain, as of `today`. Crawlers that
/// know their own layout (fixture directories) override this.
fn default_partitions(domain: Domain, today: NaiveDate) -> Vec<Partition> {
    match domain {
        Domain::Calendar => vec![
            Partition::Year(today.year()),
            Partition::Year(today.year() + 1),
        ],
        Domain::Graduation => vec![Partition::Year(today.year())],
        Domain::Meals => (0..7)
            .filter_map(|ahead| today.checked_add_days(Days::new(ahead)))
            .map(Partition::Date)
            .collect(),
        Domain::Notices | Domain::Shuttle => vec![Partition::Global],
    }
}

/// Run the harvest command: refresh `target` ("all" or one domain key).
pub fn run_harvest(config: &Config, target: &str, today: NaiveDate) -> Result<()> {
    let domains: Vec<Domain> = if target == "all" {
        Domain::ALL.to_vec()
    } else {
        match Domain::from_key(target) {
            Some(domain) => vec![domain],
            None => bail!(
                "Unknown harvest target: '{}'. Must be all, calendar, meals, graduation, notices, or shuttle.",
                target
            ),
        }
    };

    let store = SnapshotStore::new(&config.cache.dir);
    let mut fetched = 0usize;
    let mut failed = 0usize;

    for domain in domains {
        let crawler = build_crawler(config, domain)?;
        let partitions = crawler
            .partitions_hint()
            .unwrap_or_else(|| default_partitions(domain, today));

        println!("harvest {}", domain.key());
        for partition in &partitions {
            if crawler.run(&store, domain.key(), partition, today) {
                let count = store.load(domain.key(), partition).records().len();
                println!("  {}: {} records", partition.label(), count);
                fetched += 1;
            } else {
                println!("  {}: FAILED", partition.label());
                failed += 1;
            }
        }
    }

    println!("done ({} fetched, {} failed)", fetched, failed);
    if fetched == 0 && failed > 0 {
        bail!("every fetch failed; check feed URLs and fixture paths");
    }
    Ok(())
}
