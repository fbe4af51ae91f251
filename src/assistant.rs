//! The question-answering front door.
//!
//! An [`Assistant`] owns one [`Resolver`] per domain plus the shared
//! snapshot-backed retrieval fallback. Answering a question means routing
//! it to a domain by keyword (or honoring an explicit override) and handing
//! it to that domain's resolver; questions no domain claims go straight to
//! retrieval over everything cached.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::debug;

use crate::config::Config;
use crate::crawler::{Crawler, NullCrawler};
use crate::crawler_feed::FeedCrawler;
use crate::crawler_fs::FixtureCrawler;
use crate::domain_calendar::CalendarDomain;
use crate::domain_graduation::GraduationDomain;
use crate::domain_meals::MealsDomain;
use crate::domain_notices::NoticesDomain;
use crate::domain_shuttle::ShuttleDomain;
use crate::fallback::{RetrievalFallback, SnapshotRetriever};
use crate::lexicon::MSG_UNROUTABLE;
use crate::resolver::{DomainSpec, Resolver};
use crate::router::{self, Domain};
use crate::snapshot::SnapshotStore;

/// All five domain resolvers behind keyword routing.
pub struct Assistant {
    resolvers: Vec<(Domain, Resolver)>,
    fallback: Arc<SnapshotRetriever>,
}

impl Assistant {
    /// Create an assistant with every domain wired from the config: one
    /// crawler per domain, one shared store, one shared fallback.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = SnapshotStore::new(&config.cache.dir);
        let fallback = Arc::new(SnapshotRetriever::new(
            store.clone(),
            Domain::ALL.iter().map(|d| d.key().to_string()).collect(),
            config.retrieval.fallback_limit,
        ));

        let mut resolvers = Vec::new();
        for domain in Domain::ALL {
            let crawler = build_crawler(config, domain)?;
            let resolver = Resolver::new(domain_spec(config, domain), crawler, store.clone())
                .with_fallback(fallback.clone());
            resolvers.push((domain, resolver));
        }

        Ok(Assistant {
            resolvers,
            fallback,
        })
    }

    /// Answer a question as of `today`. `forced` bypasses keyword routing.
    pub fn answer(&self, question: &str, today: NaiveDate, forced: Option<Domain>) -> String {
        let routed = forced.or_else(|| router::route(question));
        let Some(domain) = routed else {
            debug!(question = question, "no routing keyword matched");
            return self
                .fallback
                .retrieve(question)
                .into_iter()
                .next()
                .unwrap_or_else(|| MSG_UNROUTABLE.to_string());
        };

        match self.resolvers.iter().find(|(d, _)| *d == domain) {
            Some((_, resolver)) => resolver.answer(question, today),
            None => MSG_UNROUTABLE.to_string(),
        }
    }
}

fn domain_spec(config: &Config, domain: Domain) -> Box<dyn DomainSpec> {
    match domain {
        Domain::Calendar => Box::new(CalendarDomain),
        Domain::Meals => Box::new(MealsDomain::new(
            config.meals.cafeterias.clone(),
            config.meals.default_audience.clone(),
        )),
        Domain::Graduation => Box::new(GraduationDomain),
        Domain::Notices => Box::new(NoticesDomain),
        Domain::Shuttle => Box::new(ShuttleDomain),
    }
}

/// Pick the crawler for a domain: a configured feed wins, then the fixture
/// directory, then the no-op crawler that leaves the cache untouched.
pub fn build_crawler(config: &Config, domain: Domain) -> Result<Box<dyn Crawler>> {
    if let Some(template) = config.crawl.feeds.get(domain.key()) {
        let crawler = FeedCrawler::new(template, Duration::from_secs(config.crawl.timeout_secs))
            .with_context(|| format!("Failed to build feed crawler for '{}'", domain.key()))?;
        return Ok(Box::new(crawler));
    }
    if let Some(dir) = &config.crawl.fixtures {
        let crawler = FixtureCrawler::new(dir.join(domain.key()), &config.crawl.fixture_globs)
            .with_context(|| format!("Failed to build fixture crawler for '{}'", domain.key()))?;
        return Ok(Box::new(crawler));
    }
    Ok(Box::new(NullCrawler))
}

/// CLI entry: answer one question and print the reply.
pub fn run_ask(
    config: &Config,
    question: &str,
    today: NaiveDate,
    domain: Option<&str>,
) -> Result<()> {
    let forced = match domain {
        Some(key) => Some(Domain::from_key(key).with_context(|| {
            format!(
                "Unknown domain: '{}'. Must be calendar, meals, graduation, notices, or shuttle.",
                key
            )
        })?),
        None => None,
    };

    let assistant = Assistant::from_config(config)?;
    println!("{}", assistant.answer(question, today, forced));
    Ok(())
}
