use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::router::Domain;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub meals: MealsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
        }
    }
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("data/cache")
}

#[derive(Debug, Deserialize, Clone)]
pub struct CrawlConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Feed URL templates keyed by domain ("meals", "notices", ...).
    /// Templates may contain `{year}` and `{date}` placeholders.
    #[serde(default)]
    pub feeds: BTreeMap<String, String>,
    /// Directory of per-domain JSON fixtures, used for domains without a feed.
    #[serde(default)]
    pub fixtures: Option<PathBuf>,
    #[serde(default = "default_fixture_globs")]
    pub fixture_globs: Vec<String>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            feeds: BTreeMap::new(),
            fixtures: None,
            fixture_globs: default_fixture_globs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}
fn default_fixture_globs() -> Vec<String> {
    vec!["*.json".to_string()]
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    #[serde(default = "default_fallback_limit")]
    pub fallback_limit: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            fallback_limit: default_fallback_limit(),
        }
    }
}

fn default_fallback_limit() -> usize {
    3
}

#[derive(Debug, Deserialize, Clone)]
pub struct MealsConfig {
    #[serde(default = "default_cafeterias")]
    pub cafeterias: Vec<String>,
    #[serde(default = "default_audience")]
    pub default_audience: String,
}

impl Default for MealsConfig {
    fn default() -> Self {
        Self {
            cafeterias: default_cafeterias(),
            default_audience: default_audience(),
        }
    }
}

fn default_cafeterias() -> Vec<String> {
    vec!["학생회관".to_string(), "기숙사식당".to_string()]
}
fn default_audience() -> String {
    "학생".to_string()
}

/// Loads the config, falling back to built-in defaults when the file is absent.
pub fn load_config(path: &Path) -> Result<Config> {
    let config: Config = if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content).with_context(|| "Failed to parse config file")?
    } else {
        Config::default()
    };

    // Validate cache
    if config.cache.dir.as_os_str().is_empty() {
        anyhow::bail!("cache.dir must not be empty");
    }

    // Validate crawl
    if config.crawl.timeout_secs == 0 {
        anyhow::bail!("crawl.timeout_secs must be >= 1");
    }
    for key in config.crawl.feeds.keys() {
        if Domain::from_key(key).is_none() {
            anyhow::bail!(
                "Unknown feed domain: '{}'. Must be calendar, meals, graduation, notices, or shuttle.",
                key
            );
        }
    }
    if config.crawl.fixture_globs.is_empty() {
        anyhow::bail!("crawl.fixture_globs must not be empty");
    }

    // Validate retrieval
    if config.retrieval.fallback_limit < 1 {
        anyhow::bail!("retrieval.fallback_limit must be >= 1");
    }

    // Validate meals
    if config.meals.cafeterias.is_empty() {
        anyhow::bail!("meals.cafeterias must not be empty");
    }
    match config.meals.default_audience.as_str() {
        "학생" | "직원" => {}
        other => anyhow::bail!(
            "Unknown meals.default_audience: '{}'. Must be 학생 or 직원.",
            other
        ),
    }

    Ok(config)
}
