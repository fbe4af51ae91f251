//! Cache overview for the `kiosk status` command.
//!
//! Walks every domain directory in the snapshot store and prints one line
//! per partition: record count and crawl date, with corrupt files called
//! out so a bad feed is visible before users hit it.

use anyhow::Result;

use crate::config::Config;
use crate::router::Domain;
use crate::snapshot::{LoadOutcome, SnapshotStore};

/// Run the status command: print per-partition cache contents.
pub fn run_status(config: &Config) -> Result<()> {
    let store = SnapshotStore::new(&config.cache.dir);

    println!("Campus Kiosk cache status");
    println!("=========================");
    println!();
    println!("  Cache dir: {}", store.root().display());
    println!();
    println!(
        "  {:<12} {:<14} {:>8}   {}",
        "DOMAIN", "PARTITION", "RECORDS", "CRAWLED"
    );
    println!("  {}", "-".repeat(52));

    let mut total = 0usize;
    let mut corrupt = 0usize;
    for domain in Domain::ALL {
        let partitions = store.partitions(domain.key());
        if partitions.is_empty() {
            println!(
                "  {:<12} {:<14} {:>8}   {}",
                domain.key(),
                "-",
                0,
                "never"
            );
            continue;
        }
        for (name, outcome) in partitions {
            let (records, crawled) = match &outcome {
                LoadOutcome::Loaded(snapshot) => {
                    (snapshot.items.len(), snapshot.crawled_at.to_string())
                }
                LoadOutcome::Missing => (0, "never".to_string()),
                LoadOutcome::Corrupt => {
                    corrupt += 1;
                    (0, "CORRUPT".to_string())
                }
            };
            total += records;
            println!(
                "  {:<12} {:<14} {:>8}   {}",
                domain.key(),
                name,
                records,
                crawled
            );
        }
    }
    println!();
    println!("  Total records: {}", total);
    if corrupt > 0 {
        println!("  Corrupt files: {}", corrupt);
    }
    println!();

    Ok(())
}
