//! Shuttle bus domain.
//!
//! Shuttle data is a mix of timetable rows and route rows, kept together in
//! one global partition. Each record tags its kind ("schedule" or "route")
//! and carries the original table row as an array of cells.

use serde_json::Value;

use crate::lexicon::summarize;
use crate::models::{Partition, Record, TimeQuery};
use crate::resolver::{DomainSpec, FilterOutcome};

pub struct ShuttleDomain;

fn row_kind(question: &str) -> &'static str {
    if question.contains("노선") || question.contains("경로") {
        "route"
    } else {
        "schedule"
    }
}

fn row_text(rec: &Record) -> Option<String> {
    let cells = rec.0.get("row")?.as_array()?;
    let parts: Vec<String> = cells
        .iter()
        .filter_map(|cell| match cell {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

impl DomainSpec for ShuttleDomain {
    fn name(&self) -> &'static str {
        "shuttle"
    }

    fn date_sensitive(&self) -> bool {
        false
    }

    fn partition(&self, _question: &str, _time: &TimeQuery) -> Partition {
        Partition::Global
    }

    fn filter(&self, question: &str, _time: &TimeQuery, items: &[Record]) -> FilterOutcome {
        let kind = row_kind(question);
        let matched: Vec<Record> = items
            .iter()
            .filter(|rec| rec.field("type") == Some(kind))
            .cloned()
            .collect();
        if matched.is_empty() {
            FilterOutcome::Empty
        } else {
            FilterOutcome::Matched(matched)
        }
    }

    fn render(&self, question: &str, _time: &TimeQuery, matched: &[Record]) -> String {
        let head = match row_kind(question) {
            "route" => "셔틀버스 노선 안내",
            _ => "셔틀버스 운행 시간표",
        };
        let rows: Vec<String> = matched.iter().filter_map(row_text).collect();
        format!("{}: {}입니다.", head, summarize(&rows, 3))
    }

    fn render_diff(&self, added: &[Record]) -> String {
        format!("셔틀버스 정보가 {}건 업데이트되었습니다.", added.len())
    }

    fn no_changes(&self) -> String {
        "변경된 셔틀버스 정보가 없습니다.".to_string()
    }

    fn not_found(&self) -> String {
        "셔틀버스 정보를 찾지 못했습니다.".to_string()
    }
}
