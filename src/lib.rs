//! # Campus Kiosk
//!
//! A time-aware, cache-backed answer pipeline for campus Q&A.
//!
//! Campus Kiosk answers Korean-language questions about five campus domains
//! (academic calendar, cafeteria menus, graduation requirements, notices,
//! and shuttle schedules) from JSON snapshots cached on disk, refreshing
//! them lazily through pluggable crawlers and falling back to keyword
//! retrieval when structured resolution finds nothing.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌─────────┐   ┌────────────┐   ┌────────┐
//! │ Question │──▶│ Router  │──▶│  Resolver  │──▶│ Answer │
//! └──────────┘   │ keyword │   │ per domain │   └────────┘
//!                └─────────┘   └─────┬──────┘
//!                     ┌──────────────┼──────────────┐
//!                     ▼              ▼              ▼
//!               ┌───────────┐ ┌────────────┐ ┌───────────┐
//!               │ timeparse │ │  snapshot  │ │  crawler  │
//!               │ TimeQuery │ │ JSON cache │ │ feed / fs │
//!               └───────────┘ └────────────┘ └───────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! kiosk harvest all                 # warm the cache for every domain
//! kiosk status                      # inspect cached partitions
//! kiosk ask "오늘 점심 메뉴 뭐야?"
//! kiosk ask "컴퓨터공학과 졸업요건" --domain graduation
//! kiosk ask "내일 학사일정" --today 2025-03-05
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`timeparse`] | Korean temporal expressions to dates |
//! | [`snapshot`] | Partitioned JSON snapshot cache |
//! | [`crawler`] | Crawler contract and JSON decoding |
//! | [`diff`] | Additive snapshot diffing |
//! | [`matcher`] | Fuzzy entity-name matching |
//! | [`resolver`] | The shared answer state machine |
//! | [`router`] | Keyword routing across the five domains |
//! | [`fallback`] | Retrieval fallback and the generation seam |
//! | [`assistant`] | Wiring and the `ask` command |

pub mod assistant;
pub mod config;
pub mod crawler;
pub mod crawler_feed;
pub mod crawler_fs;
pub mod diff;
pub mod domain_calendar;
pub mod domain_graduation;
pub mod domain_meals;
pub mod domain_notices;
pub mod domain_shuttle;
pub mod error;
pub mod fallback;
pub mod harvest;
pub mod holidays;
pub mod lexicon;
pub mod matcher;
pub mod models;
pub mod resolver;
pub mod router;
pub mod snapshot;
pub mod stats;
pub mod timeparse;
