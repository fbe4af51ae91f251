//! # Campus Kiosk CLI (`kiosk`)
//!
//! The `kiosk` binary answers campus questions from the command line and
//! manages the snapshot cache behind them.
//!
//! ## Usage
//!
//! ```bash
//! kiosk --config ./kiosk.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `kiosk ask "<question>"` | Answer a Korean question from cached snapshots |
//! | `kiosk harvest [target]` | Refresh snapshots for one domain or all of them |
//! | `kiosk status` | Show cached partitions, record counts, and crawl dates |
//!
//! ## Examples
//!
//! ```bash
//! # Warm every domain's cache, then ask
//! kiosk harvest all
//! kiosk ask "오늘 점심 메뉴 뭐야?"
//!
//! # Pin the reference date (useful for replaying past questions)
//! kiosk ask "다음 주 금요일 학사일정" --today 2025-03-05
//!
//! # Skip keyword routing
//! kiosk ask "2023학번 컴퓨터공학과 졸업요건" --domain graduation
//!
//! # Refresh just the cafeteria menus
//! kiosk harvest meals
//! ```

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use campus_kiosk::{assistant, config, harvest, stats};

/// Campus Kiosk CLI: answers campus questions from cached snapshots.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file; a missing file means built-in defaults (cache under `data/cache`,
/// no feeds, no fixtures).
#[derive(Parser)]
#[command(
    name = "kiosk",
    about = "Campus Kiosk - a time-aware, cache-backed answer pipeline for campus Q&A",
    version,
    long_about = "Campus Kiosk answers Korean-language questions about the academic calendar, \
    cafeteria menus, graduation requirements, notices, and shuttle schedules from JSON snapshots \
    cached on disk, refreshing them lazily through configurable feed or fixture crawlers."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./kiosk.toml")]
    config: PathBuf,

    /// Reference date standing in for "today" (YYYY-MM-DD).
    ///
    /// Defaults to the local date. Every temporal expression in a question
    /// ("내일", "다음 주 금요일") resolves relative to this.
    #[arg(long, global = true)]
    today: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Answer a question.
    ///
    /// Routes the question to one of the five domains by keyword, loads the
    /// cached snapshot (refreshing through the configured crawler when the
    /// cache is missing, corrupt, or unhelpful), and prints a Korean answer.
    /// Data problems never surface as errors: degraded answers are fixed
    /// Korean messages.
    Ask {
        /// The question text, in Korean.
        question: String,

        /// Force a domain instead of keyword routing:
        /// `calendar`, `meals`, `graduation`, `notices`, or `shuttle`.
        #[arg(long)]
        domain: Option<String>,
    },

    /// Refresh cached snapshots.
    ///
    /// Fetches every partition a domain is likely to serve soon: this
    /// year's and next year's calendar, a week of menus, the current
    /// graduation catalogue, and the global notice and shuttle tables.
    /// Failures are reported per partition and do not abort the rest.
    Harvest {
        /// `all` or one domain key (`calendar`, `meals`, `graduation`,
        /// `notices`, `shuttle`).
        #[arg(default_value = "all")]
        target: String,
    },

    /// Show what is cached.
    ///
    /// Prints one line per cached partition with its record count and crawl
    /// date, and flags corrupt files.
    Status,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cfg = config::load_config(&cli.config)?;
    let today = match &cli.today {
        Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .with_context(|| format!("Invalid --today value: '{}'. Expected YYYY-MM-DD.", text))?,
        None => Local::now().date_naive(),
    };

    match cli.command {
        Commands::Ask { question, domain } => {
            assistant::run_ask(&cfg, &question, today, domain.as_deref())?;
        }
        Commands::Harvest { target } => {
            harvest::run_harvest(&cfg, &target, today)?;
        }
        Commands::Status => {
            stats::run_status(&cfg)?;
        }
    }

    Ok(())
}
