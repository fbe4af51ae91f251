//! Shared keyword tables and fixed user-facing phrases.
//!
//! Everything a user can read is assembled from the constants here or from
//! the per-domain formatters; internal errors never leak through. Keeping
//! the tables in one module means the resolvers, the router, and the tests
//! all agree on what counts as, say, update intent.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{Precision, TimeQuery};

/// Words that signal "did anything change?" rather than "tell me X".
pub const UPDATE_KEYWORDS: [&str; 4] = ["변동", "업데이트", "바뀐", "변경"];

pub fn wants_update(text: &str) -> bool {
    UPDATE_KEYWORDS.iter().any(|kw| text.contains(kw))
}

/// Department-like token: anything ending in 학과/학부/대학원/대학.
pub static DEPT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\w가-힣]+(?:학과|학부|대학원|대학))").unwrap());

pub fn extract_department(text: &str) -> Option<String> {
    DEPT_PATTERN
        .captures(text)
        .map(|caps| caps[1].to_string())
}

/// Meal slot named in the question; lunch when unspecified.
pub fn meal_slot(text: &str) -> &'static str {
    if text.contains("아침") || text.contains("조식") {
        "조식"
    } else if text.contains("저녁") || text.contains("석식") {
        "석식"
    } else {
        "중식"
    }
}

/// Who is eating: staff rows only when the question says so.
pub fn meal_audience<'a>(text: &str, default: &'a str) -> &'a str {
    if text.contains("교직원") || text.contains("직원") {
        "직원"
    } else {
        default
    }
}

pub const MSG_NETWORK: &str = "최신 정보를 불러오지 못했습니다. 잠시 후 다시 시도해주세요.";
pub const MSG_UNROUTABLE: &str = "질문을 이해하지 못했습니다. 다시 질문해주세요.";

pub fn msg_invalid_date(year: i32, month: u32, day: u32) -> String {
    format!("날짜를 다시 확인해주세요. {year}년 {month}월 {day}일은 올바른 날짜가 아닙니다.")
}

/// Wrap an answer according to how confidently the date was parsed. Exact
/// dates pass through; anything vaguer echoes the date actually used and
/// asks the user to confirm instead of presenting the answer as definitive.
pub fn qualify_by_precision(time: &TimeQuery, body: String) -> String {
    use chrono::Datelike;
    let d = time.resolved;
    match time.precision {
        Precision::Exact => body,
        Precision::Month => format!(
            "{}년 {}월 기준으로 안내드립니다. 원하신 날짜가 맞는지 확인해주세요.\n{}",
            d.year(),
            d.month(),
            body
        ),
        Precision::Year => format!(
            "{}년 기준으로 안내드립니다. 원하신 날짜가 맞는지 확인해주세요.\n{}",
            d.year(),
            body
        ),
        Precision::Failed => format!(
            "정확한 날짜를 파악하지 못해 {}년 {}월 {}일 기준으로 안내드립니다. 원하신 날짜가 맞는지 확인해주세요.\n{}",
            d.year(),
            d.month(),
            d.day(),
            body
        ),
    }
}

/// First `limit` entries joined with ", ", with " 등" appended when the list
/// was cut short. The trailing 등 matches how the answers read in Korean:
/// "A, B 등".
pub fn summarize(entries: &[String], limit: usize) -> String {
    let shown: Vec<&str> = entries.iter().take(limit).map(String::as_str).collect();
    let mut out = shown.join(", ");
    if entries.len() > limit {
        out.push_str(" 등");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_update_intent_keywords() {
        assert!(wants_update("학사일정 변동 사항 있어?"));
        assert!(wants_update("공지 업데이트 됐어?"));
        assert!(wants_update("바뀐 거 있나"));
        assert!(!wants_update("오늘 학식 뭐야"));
    }

    #[test]
    fn test_department_extraction() {
        assert_eq!(
            extract_department("컴퓨터공학과 졸업요건 알려줘").as_deref(),
            Some("컴퓨터공학과")
        );
        assert_eq!(
            extract_department("경영대학 공지 있어?").as_deref(),
            Some("경영대학")
        );
        assert_eq!(extract_department("졸업요건 알려줘"), None);
    }

    #[test]
    fn test_meal_slot_and_audience() {
        assert_eq!(meal_slot("아침 뭐 나와"), "조식");
        assert_eq!(meal_slot("저녁 메뉴"), "석식");
        assert_eq!(meal_slot("오늘 학식"), "중식");
        assert_eq!(meal_audience("교직원 식단", "학생"), "직원");
        assert_eq!(meal_audience("오늘 점심", "학생"), "학생");
    }

    #[test]
    fn test_precision_qualification() {
        let d = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let exact = TimeQuery {
            raw: "9월 1일".into(),
            resolved: d,
            precision: Precision::Exact,
        };
        assert_eq!(qualify_by_precision(&exact, "본문".into()), "본문");

        let month = TimeQuery {
            raw: "9월".into(),
            resolved: d,
            precision: Precision::Month,
        };
        let wrapped = qualify_by_precision(&month, "본문".into());
        assert!(wrapped.contains("2025년 9월 기준"));
        assert!(wrapped.contains("확인해주세요"));
        assert!(wrapped.ends_with("본문"));
    }

    #[test]
    fn test_summarize_appends_suffix_only_when_cut() {
        let items = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(summarize(&items, 2), "a, b 등");
        assert_eq!(summarize(&items, 3), "a, b, c");
    }
}
