//! Graduation requirements domain.
//!
//! Requirement records are one row per (college, department, category) with
//! the credit total for that category. Questions must name a department;
//! the name is matched fuzzily against the departments actually present in
//! the catalogue, since nobody types "컴퓨터공학과" the official way. The
//! cache is partitioned by catalogue year.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use chrono::Datelike;
use regex::Regex;

use crate::lexicon;
use crate::matcher;
use crate::models::{Partition, Record, TimeQuery};
use crate::resolver::{DomainSpec, FilterOutcome};

static COHORT_YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(20\d{2})학번").unwrap());

pub struct GraduationDomain;

/// The catalogue year a question refers to: an explicit 20xx학번 wins,
/// otherwise the year the question resolved to.
fn catalogue_year(question: &str, time: &TimeQuery) -> i32 {
    COHORT_YEAR
        .captures(question)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or_else(|| time.resolved.year())
}

impl DomainSpec for GraduationDomain {
    fn name(&self) -> &'static str {
        "graduation"
    }

    fn date_sensitive(&self) -> bool {
        false
    }

    fn partition(&self, question: &str, time: &TimeQuery) -> Partition {
        Partition::Year(catalogue_year(question, time))
    }

    fn preflight(&self, question: &str, _time: &TimeQuery) -> Option<String> {
        if lexicon::extract_department(question).is_none() {
            return Some("어떤 학과의 졸업요건이 궁금한지 다시 입력해주세요.".to_string());
        }
        None
    }

    fn filter(&self, question: &str, _time: &TimeQuery, items: &[Record]) -> FilterOutcome {
        // An empty catalogue is a data problem, not a naming problem; let
        // the resolver refresh before we blame the user's spelling.
        if items.is_empty() {
            return FilterOutcome::Empty;
        }
        let Some(dept) = lexicon::extract_department(question) else {
            return FilterOutcome::Empty;
        };

        let names: BTreeSet<&str> = items.iter().filter_map(|rec| rec.field("department")).collect();

        // Several departments can legitimately share an answer when their
        // names are near-identical ("컴퓨터공학과" and "컴퓨터공학부"), so
        // high-confidence matches are kept together; otherwise fall back to
        // the single best name above the looser bar.
        let strong = matcher::top_matches(
            &dept,
            names.iter().copied(),
            matcher::STRONG_LIMIT,
            matcher::STRONG_THRESHOLD,
        );
        let accepted: Vec<String> = if strong.is_empty() {
            match matcher::best_match(&dept, names.iter().copied(), matcher::BEST_THRESHOLD) {
                Some(best) => vec![best.name],
                None => {
                    return FilterOutcome::Clarify("과 이름을 다시 확인해주세요.".to_string());
                }
            }
        } else {
            strong.into_iter().map(|c| c.name).collect()
        };

        let matched: Vec<Record> = items
            .iter()
            .filter(|rec| {
                rec.field("department")
                    .is_some_and(|d| accepted.iter().any(|a| a == d))
            })
            .cloned()
            .collect();
        if matched.is_empty() {
            FilterOutcome::Empty
        } else {
            FilterOutcome::Matched(matched)
        }
    }

    fn render(&self, question: &str, time: &TimeQuery, matched: &[Record]) -> String {
        let year = catalogue_year(question, time);
        let mut depts: Vec<&str> = Vec::new();
        for rec in matched {
            if let Some(dept) = rec.field("department") {
                if !depts.contains(&dept) {
                    depts.push(dept);
                }
            }
        }

        let mut answer = String::new();
        for (i, dept) in depts.iter().enumerate() {
            if i > 0 {
                answer.push('\n');
            }
            answer.push_str(&format!("{year}학년도 {dept} 졸업요건"));
            for rec in matched
                .iter()
                .filter(|rec| rec.field("department") == Some(*dept))
            {
                let category = rec.field("category").unwrap_or("");
                match rec.text("credits") {
                    Some(credits) => {
                        answer.push_str(&format!("\n- {category}: {credits}학점"));
                    }
                    None => answer.push_str(&format!("\n- {category}")),
                }
            }
        }
        answer
    }

    fn render_diff(&self, added: &[Record]) -> String {
        format!("졸업요건 정보가 {}건 업데이트되었습니다.", added.len())
    }

    fn no_changes(&self) -> String {
        "졸업요건 변동 사항이 없습니다.".to_string()
    }

    fn not_found(&self) -> String {
        "요청하신 졸업요건 정보를 찾지 못했습니다.".to_string()
    }

    fn no_data(&self) -> String {
        "졸업요건 데이터를 찾지 못했습니다.".to_string()
    }
}
