//! Campus notices domain.
//!
//! Notice records carry a title, URL, posting date, and the college and
//! department that published them. All notices live in one global partition;
//! a question either names a department (filter on it) or gets the notices
//! posted within the last week, newest first.

use chrono::{Days, NaiveDate};

use crate::lexicon;
use crate::models::{Partition, Record, TimeQuery};
use crate::resolver::{DomainSpec, FilterOutcome};

const LISTING_LIMIT: usize = 5;
const RECENT_DAYS: u64 = 7;

pub struct NoticesDomain;

fn posted_at(rec: &Record) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(rec.field("posted_at")?, "%Y-%m-%d").ok()
}

fn newest_first(records: &mut [Record]) {
    records.sort_by(|a, b| posted_at(b).cmp(&posted_at(a)));
}

impl DomainSpec for NoticesDomain {
    fn name(&self) -> &'static str {
        "notices"
    }

    fn date_sensitive(&self) -> bool {
        false
    }

    fn partition(&self, _question: &str, _time: &TimeQuery) -> Partition {
        Partition::Global
    }

    fn filter(&self, question: &str, time: &TimeQuery, items: &[Record]) -> FilterOutcome {
        let mut matched: Vec<Record> = match lexicon::extract_department(question) {
            Some(dept) => items
                .iter()
                .filter(|rec| rec.field_contains("dept", &dept))
                .cloned()
                .collect(),
            None => {
                let until = time.resolved;
                let since = until.checked_sub_days(Days::new(RECENT_DAYS)).unwrap_or(until);
                items
                    .iter()
                    .filter(|rec| {
                        posted_at(rec).is_some_and(|posted| posted >= since && posted <= until)
                    })
                    .cloned()
                    .collect()
            }
        };
        if matched.is_empty() {
            return FilterOutcome::Empty;
        }
        newest_first(&mut matched);
        matched.truncate(LISTING_LIMIT);
        FilterOutcome::Matched(matched)
    }

    fn render(&self, question: &str, _time: &TimeQuery, matched: &[Record]) -> String {
        let head = match lexicon::extract_department(question) {
            Some(dept) => format!("{dept} 공지"),
            None => "최근 공지".to_string(),
        };
        let titles: Vec<&str> = matched.iter().filter_map(|rec| rec.field("title")).collect();
        format!("{} 목록: {} 등", head, titles.join(", "))
    }

    fn render_diff(&self, added: &[Record]) -> String {
        let titles: Vec<&str> = added
            .iter()
            .filter_map(|rec| rec.field("title"))
            .take(3)
            .collect();
        format!("새로운 공지가 업데이트되었습니다: {} 등", titles.join(", "))
    }

    fn no_changes(&self) -> String {
        "최근 공지사항 업데이트가 없습니다.".to_string()
    }

    fn not_found(&self) -> String {
        "요청하신 공지사항을 찾지 못했습니다.".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Precision;

    fn time(y: i32, m: u32, d: u32) -> TimeQuery {
        TimeQuery {
            raw: String::new(),
            resolved: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            precision: Precision::Failed,
        }
    }

    fn notice(title: &str, posted_at: &str, dept: &str) -> Record {
        Record::from_pairs(&[
            ("id", title),
            ("title", title),
            ("url", "https://campus.test/n/1"),
            ("posted_at", posted_at),
            ("college", "공과대학"),
            ("dept", dept),
        ])
    }

    fn board() -> Vec<Record> {
        vec![
            notice("장학금 신청 안내", "2025-03-04", "학생처"),
            notice("졸업작품 전시회", "2025-03-02", "컴퓨터공학과"),
            notice("실험실 안전교육", "2025-02-10", "컴퓨터공학과"),
        ]
    }

    #[test]
    fn test_department_questions_filter_by_department() {
        match NoticesDomain.filter("컴퓨터공학과 공지 알려줘", &time(2025, 3, 5), &board()) {
            FilterOutcome::Matched(matched) => {
                assert_eq!(matched.len(), 2);
                // Newest first.
                assert_eq!(matched[0].field("title"), Some("졸업작품 전시회"));
            }
            _ => panic!("expected matches"),
        }
    }

    #[test]
    fn test_plain_questions_list_the_last_week() {
        match NoticesDomain.filter("공지 뭐 있어", &time(2025, 3, 5), &board()) {
            FilterOutcome::Matched(matched) => {
                // The February notice is older than a week.
                assert_eq!(matched.len(), 2);
                assert_eq!(matched[0].field("title"), Some("장학금 신청 안내"));
            }
            _ => panic!("expected matches"),
        }
    }

    #[test]
    fn test_listing_is_capped() {
        let mut many = Vec::new();
        for i in 0..8 {
            many.push(notice(&format!("공지 {i}"), "2025-03-04", "학생처"));
        }
        match NoticesDomain.filter("공지 알려줘", &time(2025, 3, 5), &many) {
            FilterOutcome::Matched(matched) => assert_eq!(matched.len(), LISTING_LIMIT),
            _ => panic!("expected matches"),
        }
    }

    #[test]
    fn test_render_heads_with_department_or_recency() {
        let matched = vec![notice("장학금 신청 안내", "2025-03-04", "학생처")];
        assert_eq!(
            NoticesDomain.render("공지 알려줘", &time(2025, 3, 5), &matched),
            "최근 공지 목록: 장학금 신청 안내 등"
        );
        let matched = vec![notice("졸업작품 전시회", "2025-03-02", "컴퓨터공학과")];
        assert_eq!(
            NoticesDomain.render("컴퓨터공학과 공지", &time(2025, 3, 5), &matched),
            "컴퓨터공학과 공지 목록: 졸업작품 전시회 등"
        );
    }
}
