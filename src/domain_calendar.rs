//! Academic calendar domain.
//!
//! Calendar records are one row per event: a zero-padded month ("03월"), a
//! day or day range ("1일", "1일~5일"), and the event text. The cache is
//! partitioned by year, so one file covers a whole academic year.

use std::sync::LazyLock;

use chrono::Datelike;
use regex::Regex;

use crate::lexicon::summarize;
use crate::models::{Partition, Precision, Record, TimeQuery};
use crate::resolver::{DomainSpec, FilterOutcome};

static DAY_NUMBERS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d{1,2})일").unwrap());

pub struct CalendarDomain;

fn month_number(rec: &Record) -> Option<u32> {
    rec.field("month")?.trim_end_matches('월').parse().ok()
}

/// Day fields are "1일" or ranges like "1일~5일". Days are compared
/// numerically; a substring test would let "1일" match "11일".
fn day_matches(rec: &Record, day: u32) -> bool {
    let Some(field) = rec.field("date") else {
        return false;
    };
    let days: Vec<u32> = DAY_NUMBERS
        .captures_iter(field)
        .filter_map(|caps| caps[1].parse().ok())
        .collect();
    match days.as_slice() {
        [] => false,
        [single] => *single == day,
        [start, end, ..] => day >= *start && day <= *end,
    }
}

fn event_line(rec: &Record, with_date: bool) -> String {
    let event = rec.field("event").unwrap_or("");
    if with_date {
        format!(
            "{} {} {}",
            rec.field("month").unwrap_or(""),
            rec.field("date").unwrap_or(""),
            event
        )
    } else {
        event.to_string()
    }
}

impl DomainSpec for CalendarDomain {
    fn name(&self) -> &'static str {
        "calendar"
    }

    fn partition(&self, _question: &str, time: &TimeQuery) -> Partition {
        Partition::Year(time.resolved.year())
    }

    fn filter(&self, _question: &str, time: &TimeQuery, items: &[Record]) -> FilterOutcome {
        let month = time.resolved.month();
        let day = time.resolved.day();
        let matched: Vec<Record> = match time.precision {
            Precision::Year => items.to_vec(),
            Precision::Month => items
                .iter()
                .filter(|rec| month_number(rec) == Some(month))
                .cloned()
                .collect(),
            Precision::Exact | Precision::Failed => items
                .iter()
                .filter(|rec| month_number(rec) == Some(month) && day_matches(rec, day))
                .cloned()
                .collect(),
        };
        if matched.is_empty() {
            FilterOutcome::Empty
        } else {
            FilterOutcome::Matched(matched)
        }
    }

    fn render(&self, _question: &str, time: &TimeQuery, matched: &[Record]) -> String {
        let d = time.resolved;
        match time.precision {
            Precision::Exact | Precision::Failed => {
                let events: Vec<String> =
                    matched.iter().map(|rec| event_line(rec, false)).collect();
                format!(
                    "{}년 {}월 {}일 학사일정: {}입니다.",
                    d.year(),
                    d.month(),
                    d.day(),
                    summarize(&events, 5)
                )
            }
            Precision::Month => {
                let events: Vec<String> = matched
                    .iter()
                    .map(|rec| {
                        format!(
                            "{} {}",
                            rec.field("date").unwrap_or(""),
                            rec.field("event").unwrap_or("")
                        )
                    })
                    .collect();
                format!(
                    "{}년 {}월 학사일정: {}입니다.",
                    d.year(),
                    d.month(),
                    summarize(&events, 5)
                )
            }
            Precision::Year => {
                let events: Vec<String> =
                    matched.iter().map(|rec| event_line(rec, true)).collect();
                format!("{}년 학사일정: {}입니다.", d.year(), summarize(&events, 5))
            }
        }
    }

    fn render_diff(&self, added: &[Record]) -> String {
        let events: Vec<&str> = added
            .iter()
            .filter_map(|rec| rec.field("event"))
            .take(3)
            .collect();
        format!(
            "새로운 학사일정이 업데이트되었습니다: {} 등",
            events.join(", ")
        )
    }

    fn no_changes(&self) -> String {
        "최근 학사일정 변동 사항이 없습니다.".to_string()
    }

    fn not_found(&self) -> String {
        "해당 날짜의 학사일정을 찾지 못했습니다.".to_string()
    }

    fn no_data(&self) -> String {
        "학사일정 데이터를 찾지 못했습니다.".to_string()
    }
}
