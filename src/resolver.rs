//! The shared answer-resolution state machine.
//!
//! Every domain answers questions the same way; only the partition strategy,
//! the filter predicate, and the phrasing differ, and those come in through
//! [`DomainSpec`]. The flow:
//!
//! ```text
//! parse time ─▶ preflight ─▶ update intent? ──▶ capture prev ─▶ crawl ─▶ diff
//!                               │
//!                               ▼
//!                          load cache ─▶ filter ─▶ (empty: refresh once,
//!                          refilter) ─▶ (empty: retry partition) ─▶
//!                          (empty: retrieval fallback) ─▶ fixed message
//! ```
//!
//! `answer` is infallible: every internal failure ends in one of the fixed
//! Korean messages, never in an error bubbling out to the caller.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use crate::crawler::Crawler;
use crate::diff;
use crate::error::TimeParseError;
use crate::fallback::{AnswerGenerator, RetrievalFallback};
use crate::lexicon;
use crate::models::{Partition, Record, TimeQuery};
use crate::snapshot::SnapshotStore;
use crate::timeparse;

/// What a domain's filter made of the loaded records.
pub enum FilterOutcome {
    /// Records the question asked for, ready to render.
    Matched(Vec<Record>),
    /// Nothing matched; the resolver may refresh and try again.
    Empty,
    /// The question itself is underspecified; ask and stop. No refresh.
    Clarify(String),
}

/// A second chance at a different partition, offered by the domain when the
/// primary one came up empty (meals fall back to the same day last year).
pub struct Retry {
    pub partition: Partition,
    pub time: TimeQuery,
    pub notice: String,
}

/// Everything one answer domain contributes to the shared pipeline.
pub trait DomainSpec {
    /// Cache directory name and log label.
    fn name(&self) -> &'static str;

    /// Which cache partition serves this question.
    fn partition(&self, question: &str, time: &TimeQuery) -> Partition;

    /// Chance to answer before any cache or network access (weekend
    /// cafeteria closures, missing required entities).
    fn preflight(&self, _question: &str, _time: &TimeQuery) -> Option<String> {
        None
    }

    /// Whether answers hinge on the resolved date. When true, an imprecisely
    /// parsed date makes the resolver hedge the answer and ask the user to
    /// confirm. Domains keyed by entity rather than date opt out.
    fn date_sensitive(&self) -> bool {
        true
    }

    /// Select the records the question asks for.
    fn filter(&self, question: &str, time: &TimeQuery, items: &[Record]) -> FilterOutcome;

    /// Phrase matched records as an answer.
    fn render(&self, question: &str, time: &TimeQuery, matched: &[Record]) -> String;

    /// Phrase newly appeared records for an update question.
    fn render_diff(&self, added: &[Record]) -> String;

    /// Update question, nothing new.
    fn no_changes(&self) -> String;

    /// Filter and fallback both came up empty.
    fn not_found(&self) -> String;

    /// The snapshot itself was empty even after refreshing.
    fn no_data(&self) -> String {
        self.not_found()
    }

    /// Alternative partition to try when the primary filter found nothing.
    fn retry(&self, _question: &str, _time: &TimeQuery) -> Option<Retry> {
        None
    }
}

/// One domain's resolver: the domain profile plus its injected crawler and
/// the shared snapshot store.
pub struct Resolver {
    domain: Box<dyn DomainSpec>,
    crawler: Box<dyn Crawler>,
    store: SnapshotStore,
    fallback: Option<Arc<dyn RetrievalFallback>>,
    generator: Option<Arc<dyn AnswerGenerator>>,
}

impl Resolver {
    pub fn new(domain: Box<dyn DomainSpec>, crawler: Box<dyn Crawler>, store: SnapshotStore) -> Self {
        Resolver {
            domain,
            crawler,
            store,
            fallback: None,
            generator: None,
        }
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn RetrievalFallback>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn with_generator(mut self, generator: Arc<dyn AnswerGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Resolve a question against the reference date. Always an answer,
    /// never an error.
    pub fn answer(&self, question: &str, reference: NaiveDate) -> String {
        let time = match timeparse::parse(question, reference) {
            Ok(time) => time,
            Err(TimeParseError::InvalidDate { year, month, day }) => {
                return lexicon::msg_invalid_date(year, month, day);
            }
        };
        debug!(
            domain = self.domain.name(),
            resolved = %time.resolved,
            precision = ?time.precision,
            "time parsed"
        );

        if let Some(answer) = self.domain.preflight(question, &time) {
            return answer;
        }

        let partition = self.domain.partition(question, &time);
        if lexicon::wants_update(question) {
            self.answer_update(question, &partition, reference)
        } else {
            self.answer_filtered(question, &time, &partition, reference)
        }
    }

    fn answer_update(&self, question: &str, partition: &Partition, reference: NaiveDate) -> String {
        let name = self.domain.name();
        // The previous snapshot must be held in memory before the crawler
        // touches the file; reading it back afterwards would diff the new
        // data against itself.
        let previous: Vec<Record> = self.store.load(name, partition).records().to_vec();

        if !self.crawler.run(&self.store, name, partition, reference) {
            return lexicon::MSG_NETWORK.to_string();
        }

        let current = self.store.load(name, partition);
        let fresh = diff::added(&previous, current.records());
        debug!(domain = name, added = fresh.len(), question = question, "update diff");
        if fresh.is_empty() {
            self.domain.no_changes()
        } else {
            self.domain.render_diff(&fresh)
        }
    }

    fn answer_filtered(
        &self,
        question: &str,
        time: &TimeQuery,
        partition: &Partition,
        reference: NaiveDate,
    ) -> String {
        let name = self.domain.name();
        let mut outcome = self.store.load(name, partition);
        let mut refreshed = false;

        if outcome.needs_refresh() {
            refreshed = true;
            if self.crawler.run(&self.store, name, partition, reference) {
                outcome = self.store.load(name, partition);
            }
        }

        let mut result = self.domain.filter(question, time, outcome.records());

        // One lazy refresh when the cached data did not satisfy the filter,
        // unless this question already caused one.
        if matches!(result, FilterOutcome::Empty) && !refreshed {
            if self.crawler.run(&self.store, name, partition, reference) {
                outcome = self.store.load(name, partition);
                result = self.domain.filter(question, time, outcome.records());
            }
        }

        match result {
            FilterOutcome::Clarify(answer) => answer,
            FilterOutcome::Matched(records) => {
                let body = self.domain.render(question, time, &records);
                self.hedge(time, body)
            }
            FilterOutcome::Empty => {
                let no_data = outcome.records().is_empty();
                self.resolve_empty(question, time, no_data, reference)
            }
        }
    }

    fn hedge(&self, time: &TimeQuery, body: String) -> String {
        if self.domain.date_sensitive() {
            lexicon::qualify_by_precision(time, body)
        } else {
            body
        }
    }

    fn resolve_empty(
        &self,
        question: &str,
        time: &TimeQuery,
        no_data: bool,
        reference: NaiveDate,
    ) -> String {
        let name = self.domain.name();

        if let Some(retry) = self.domain.retry(question, time) {
            let mut outcome = self.store.load(name, &retry.partition);
            if outcome.needs_refresh()
                && self.crawler.run(&self.store, name, &retry.partition, reference)
            {
                outcome = self.store.load(name, &retry.partition);
            }
            if let FilterOutcome::Matched(records) =
                self.domain.filter(question, &retry.time, outcome.records())
            {
                debug!(domain = name, partition = %retry.partition.label(), "retry partition hit");
                let body = self.domain.render(question, &retry.time, &records);
                return self.hedge(time, format!("{}\n{}", retry.notice, body));
            }
        }

        if let Some(fallback) = &self.fallback {
            let context = fallback.retrieve(question);
            if !context.is_empty() {
                debug!(domain = name, hits = context.len(), "retrieval fallback hit");
                return match &self.generator {
                    Some(generator) => generator.generate(question, &context),
                    None => context[0].clone(),
                };
            }
        }

        if no_data {
            self.domain.no_data()
        } else {
            self.domain.not_found()
        }
    }
}
