//! Error taxonomy for the answer pipeline.
//!
//! Internal code propagates these with `?`; nothing here is ever shown to an
//! end user directly. The resolver maps each variant to a fixed Korean
//! message at the last moment (see [`crate::lexicon`]), and the CLI layer
//! wraps anything else in `anyhow` context.

use std::path::PathBuf;

use thiserror::Error;

/// A temporal expression that names an impossible calendar date.
///
/// Distinct from "no pattern matched": that case resolves to the reference
/// date with failed precision and is not an error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("no such date: {year}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },
}

/// Snapshot persistence failures.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("creating cache directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("writing snapshot {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("encoding snapshot {path}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Crawler fetch failures. `run` logs these and reports `false`; the cached
/// snapshot on disk is left untouched.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("source returned status {0}")]
    Status(u16),

    #[error("source body is not JSON")]
    Body(#[source] serde_json::Error),

    #[error("reading fixture {path}")]
    Fixture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no source configured for this domain")]
    NoSource,
}
