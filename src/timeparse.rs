//! Korean temporal expression parsing.
//!
//! Turns free-form question text ("내일", "지난 금요일", "2025년 3월 1일")
//! into a [`TimeQuery`]: the date it resolves to relative to a reference
//! date, plus how precisely the text pinned that date down. Resolution is
//! first-match-wins over the pattern table below, most specific first, so a
//! precision is never assigned without a literal match to back it.

use std::sync::LazyLock;

use chrono::{Datelike, Days, NaiveDate};
use regex::Regex;

use crate::error::TimeParseError;
use crate::models::{Precision, TimeQuery};

static DAYS_AFTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)일\s*후").unwrap());
static DAYS_BEFORE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)일\s*전").unwrap());
static LAST_WEEKDAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"지난\s*주?\s*([월화수목금토일])요일").unwrap());
static NEXT_WEEKDAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"다음\s*주\s*([월화수목금토일])요일").unwrap());
static LAST_WEEK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"지난\s*주").unwrap());
static NEXT_WEEK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"다음\s*주").unwrap());
static FULL_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(20\d{2})년\s*(\d{1,2})월\s*(\d{1,2})일").unwrap());
static MONTH_DAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})월\s*(\d{1,2})일").unwrap());
static YEAR_MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(20\d{2})년\s*(\d{1,2})월").unwrap());
static BARE_MONTH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d{1,2})월").unwrap());
static BARE_YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(20\d{2})년").unwrap());

/// Parse the temporal expression in `text` against `reference`.
///
/// Text with no recognizable expression is not an error: it resolves to the
/// reference date with [`Precision::Failed`], which downstream code treats
/// as "use the reference date but do not claim certainty". An explicit date
/// that names an impossible day (2월 30일) is a hard error.
pub fn parse(text: &str, reference: NaiveDate) -> Result<TimeQuery, TimeParseError> {
    if let Some(date) = relative_day(text, reference) {
        return Ok(exact(text, date));
    }
    if let Some(caps) = DAYS_AFTER.captures(text) {
        if let Some(date) = shift_days(reference, &caps[1], true) {
            return Ok(exact(text, date));
        }
    }
    if let Some(caps) = DAYS_BEFORE.captures(text) {
        if let Some(date) = shift_days(reference, &caps[1], false) {
            return Ok(exact(text, date));
        }
    }
    // Weekday forms before the bare week shifts, so "다음 주 금요일" is not
    // swallowed by "다음 주".
    if let Some(caps) = NEXT_WEEKDAY.captures(text) {
        let target = weekday_index(&caps[1]);
        let from = reference.weekday().num_days_from_monday();
        let ahead = (target + 7 - from) % 7 + 7;
        if let Some(date) = reference.checked_add_days(Days::new(ahead as u64)) {
            return Ok(exact(text, date));
        }
    }
    if let Some(caps) = LAST_WEEKDAY.captures(text) {
        let target = weekday_index(&caps[1]);
        let from = reference.weekday().num_days_from_monday();
        let mut back = (from + 7 - target) % 7;
        if back == 0 {
            back = 7;
        }
        if let Some(date) = reference.checked_sub_days(Days::new(back as u64)) {
            return Ok(exact(text, date));
        }
    }
    if LAST_WEEK.is_match(text) {
        if let Some(date) = reference.checked_sub_days(Days::new(7)) {
            return Ok(exact(text, date));
        }
    }
    if NEXT_WEEK.is_match(text) {
        if let Some(date) = reference.checked_add_days(Days::new(7)) {
            return Ok(exact(text, date));
        }
    }
    if let Some(caps) = FULL_DATE.captures(text) {
        let date = make_date(num(&caps[1]) as i32, num(&caps[2]), num(&caps[3]))?;
        return Ok(exact(text, date));
    }
    if let Some(caps) = MONTH_DAY.captures(text) {
        // A year mentioned anywhere in the text applies to a bare
        // month-day form; otherwise the reference year is assumed.
        let year = BARE_YEAR
            .captures(text)
            .map(|y| num(&y[1]) as i32)
            .unwrap_or_else(|| reference.year());
        let date = make_date(year, num(&caps[1]), num(&caps[2]))?;
        return Ok(exact(text, date));
    }
    if let Some(caps) = YEAR_MONTH.captures(text) {
        let date = make_date(num(&caps[1]) as i32, num(&caps[2]), 1)?;
        return Ok(query(text, date, Precision::Month));
    }
    if let Some(caps) = BARE_MONTH.captures(text) {
        let date = make_date(reference.year(), num(&caps[1]), 1)?;
        return Ok(query(text, date, Precision::Month));
    }
    if let Some(caps) = BARE_YEAR.captures(text) {
        let date = make_date(num(&caps[1]) as i32, 1, 1)?;
        return Ok(query(text, date, Precision::Year));
    }
    Ok(query(text, reference, Precision::Failed))
}

fn relative_day(text: &str, reference: NaiveDate) -> Option<NaiveDate> {
    if text.contains("오늘") {
        Some(reference)
    } else if text.contains("내일") {
        reference.checked_add_days(Days::new(1))
    } else if text.contains("모레") {
        reference.checked_add_days(Days::new(2))
    } else if text.contains("어제") {
        reference.checked_sub_days(Days::new(1))
    } else {
        None
    }
}

fn shift_days(reference: NaiveDate, digits: &str, forward: bool) -> Option<NaiveDate> {
    let n = digits.parse::<u64>().ok()?;
    if forward {
        reference.checked_add_days(Days::new(n))
    } else {
        reference.checked_sub_days(Days::new(n))
    }
}

fn make_date(year: i32, month: u32, day: u32) -> Result<NaiveDate, TimeParseError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(TimeParseError::InvalidDate { year, month, day })
}

fn weekday_index(letter: &str) -> u32 {
    match letter {
        "월" => 0,
        "화" => 1,
        "수" => 2,
        "목" => 3,
        "금" => 4,
        "토" => 5,
        _ => 6,
    }
}

fn num(digits: &str) -> u32 {
    digits.parse().unwrap_or(0)
}

fn exact(text: &str, resolved: NaiveDate) -> TimeQuery {
    query(text, resolved, Precision::Exact)
}

fn query(text: &str, resolved: NaiveDate, precision: Precision) -> TimeQuery {
    TimeQuery {
        raw: text.to_string(),
        resolved,
        precision,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2025-03-05 is a Wednesday.
    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 5).unwrap()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn resolve(text: &str) -> TimeQuery {
        parse(text, reference()).unwrap()
    }

    #[test]
    fn test_relative_days() {
        assert_eq!(resolve("오늘 학식 뭐야").resolved, d(2025, 3, 5));
        assert_eq!(resolve("내일 일정 알려줘").resolved, d(2025, 3, 6));
        assert_eq!(resolve("모레는?").resolved, d(2025, 3, 7));
        assert_eq!(resolve("어제 공지 뭐 올라왔어").resolved, d(2025, 3, 4));
        assert!(resolve("오늘").precision.is_exact());
    }

    #[test]
    fn test_day_offsets() {
        assert_eq!(resolve("3일 후 식단").resolved, d(2025, 3, 8));
        assert_eq!(resolve("10일 전 공지").resolved, d(2025, 2, 23));
    }

    #[test]
    fn test_last_weekday_is_strictly_past() {
        // Reference is Wednesday; 지난 월요일 is two days back.
        assert_eq!(resolve("지난 월요일 공지").resolved, d(2025, 3, 3));
        // Same weekday as the reference goes a full week back.
        assert_eq!(resolve("지난 수요일 식단").resolved, d(2025, 2, 26));
    }

    #[test]
    fn test_next_week_weekday() {
        // This week's Friday is 03-07; next week's is 03-14.
        assert_eq!(resolve("다음 주 금요일 학사일정").resolved, d(2025, 3, 14));
        assert_eq!(resolve("다음 주 수요일").resolved, d(2025, 3, 12));

        // The target lands in the 7-day window starting a week out, and
        // the spacing in 다음주 is optional. 2025-03-06 is a Thursday.
        let thursday = d(2025, 3, 6);
        let q = parse("다음주 월요일 식단", thursday).unwrap();
        assert_eq!(q.resolved, d(2025, 3, 17));
        assert!(q.precision.is_exact());
    }

    #[test]
    fn test_week_shifts() {
        assert_eq!(resolve("지난 주 공지").resolved, d(2025, 2, 26));
        assert_eq!(resolve("다음 주 일정").resolved, d(2025, 3, 12));
    }

    #[test]
    fn test_explicit_dates() {
        let q = resolve("2025년 12월 25일 일정");
        assert_eq!(q.resolved, d(2025, 12, 25));
        assert!(q.precision.is_exact());

        // Bare month-day takes the reference year.
        assert_eq!(resolve("3월 1일 학사일정").resolved, d(2025, 3, 1));
        // A year elsewhere in the text overrides it.
        assert_eq!(resolve("2024년의 2월 29일").resolved, d(2024, 2, 29));
    }

    #[test]
    fn test_month_and_year_precision() {
        let q = resolve("2025년 9월 일정 알려줘");
        assert_eq!(q.resolved, d(2025, 9, 1));
        assert_eq!(q.precision, Precision::Month);

        let q = resolve("9월 학사일정");
        assert_eq!(q.resolved, d(2025, 9, 1));
        assert_eq!(q.precision, Precision::Month);

        let q = resolve("2024년 학사일정");
        assert_eq!(q.resolved, d(2024, 1, 1));
        assert_eq!(q.precision, Precision::Year);
    }

    #[test]
    fn test_impossible_date_is_an_error() {
        let err = parse("2월 30일 식단", reference()).unwrap_err();
        assert_eq!(
            err,
            TimeParseError::InvalidDate {
                year: 2025,
                month: 2,
                day: 30
            }
        );
        assert!(parse("2025년 13월", reference()).is_err());
    }

    #[test]
    fn test_no_expression_falls_back_to_reference() {
        let q = resolve("학식 뭐 나와?");
        assert_eq!(q.resolved, reference());
        assert_eq!(q.precision, Precision::Failed);
    }

    #[test]
    fn test_parse_is_deterministic() {
        assert_eq!(resolve("다음 주 금요일"), resolve("다음 주 금요일"));
    }
}
