//! Korean public holiday lookup.
//!
//! A fixed month/day table covers the statutory holidays that fall on the
//! same date every year; substitute and lunar-calendar holidays that move
//! around are carried as dated extras. The meals domain consults this before
//! crawling, since cafeterias close on holidays and weekends.

use chrono::{Datelike, NaiveDate, Weekday};

const FIXED: &[(u32, u32, &str)] = &[
    (1, 1, "1월1일"),
    (3, 1, "삼일절"),
    (5, 5, "어린이날"),
    (6, 6, "현충일"),
    (8, 15, "광복절"),
    (10, 3, "개천절"),
    (10, 9, "한글날"),
    (12, 25, "기독탄신일"),
];

const EXTRA: &[(i32, u32, u32, &str)] = &[
    (2025, 5, 5, "부처님오신날"),
    (2025, 5, 6, "대체공휴일"),
    (2025, 10, 8, "대체공휴일"),
];

/// Holiday name(s) for the date, or `None` on an ordinary day. When a fixed
/// holiday and an extra coincide the names are joined with ", ", fixed first.
pub fn holiday_name(date: NaiveDate) -> Option<String> {
    let mut names = Vec::new();
    for (month, day, name) in FIXED {
        if date.month() == *month && date.day() == *day {
            names.push(*name);
        }
    }
    for (year, month, day, name) in EXTRA {
        if date.year() == *year && date.month() == *month && date.day() == *day {
            names.push(*name);
        }
    }
    if names.is_empty() {
        None
    } else {
        Some(names.join(", "))
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_fixed_holidays() {
        assert_eq!(holiday_name(d(2025, 3, 1)).as_deref(), Some("삼일절"));
        assert_eq!(holiday_name(d(2026, 10, 9)).as_deref(), Some("한글날"));
        assert_eq!(holiday_name(d(2025, 3, 4)), None);
    }

    #[test]
    fn test_extras_and_overlap() {
        // 2025-05-05 is both 어린이날 and 부처님오신날.
        assert_eq!(
            holiday_name(d(2025, 5, 5)).as_deref(),
            Some("어린이날, 부처님오신날")
        );
        assert_eq!(holiday_name(d(2025, 5, 6)).as_deref(), Some("대체공휴일"));
        // The extra is year-specific.
        assert_eq!(holiday_name(d(2026, 5, 6)), None);
    }

    #[test]
    fn test_weekend() {
        assert!(is_weekend(d(2025, 3, 1))); // Saturday
        assert!(is_weekend(d(2025, 3, 2))); // Sunday
        assert!(!is_weekend(d(2025, 3, 3)));
    }
}
