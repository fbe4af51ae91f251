//! Cafeteria meals domain.
//!
//! Meal records are one row per (cafeteria, meal slot, audience): 조식/중식/
//! 석식 for 학생 or 직원, with the menu text. Cafeterias publish placeholder
//! rows ("운영안함", "주말") for slots they skip, and close entirely on
//! weekends and public holidays, so those questions are answered before any
//! cache or network work. The cache is partitioned by date, one file per day.

use chrono::{Datelike, Days, NaiveDate};

use crate::holidays;
use crate::lexicon::{self, summarize};
use crate::models::{Partition, Record, TimeQuery};
use crate::resolver::{DomainSpec, FilterOutcome, Retry};

pub struct MealsDomain {
    cafeterias: Vec<String>,
    default_audience: String,
}

impl MealsDomain {
    pub fn new(cafeterias: Vec<String>, default_audience: String) -> Self {
        MealsDomain {
            cafeterias,
            default_audience,
        }
    }

    fn cafeteria_in(&self, question: &str) -> Option<&str> {
        self.cafeterias
            .iter()
            .find(|name| question.contains(name.as_str()))
            .map(String::as_str)
    }
}

fn is_placeholder(menu: Option<&str>) -> bool {
    match menu {
        None => true,
        Some(text) => {
            let text = text.trim();
            text.is_empty() || text == "운영안함" || text == "주말"
        }
    }
}

fn one_year_back(date: NaiveDate) -> Option<NaiveDate> {
    date.with_year(date.year() - 1)
        .or_else(|| date.checked_sub_days(Days::new(365)))
}

impl DomainSpec for MealsDomain {
    fn name(&self) -> &'static str {
        "meals"
    }

    fn partition(&self, _question: &str, time: &TimeQuery) -> Partition {
        Partition::Date(time.resolved)
    }

    fn preflight(&self, _question: &str, time: &TimeQuery) -> Option<String> {
        if holidays::is_weekend(time.resolved) {
            return Some("주말에는 학생식당을 운영하지 않습니다.".to_string());
        }
        holidays::holiday_name(time.resolved)
            .map(|name| format!("{name}에는 학생식당을 운영하지 않습니다."))
    }

    fn filter(&self, question: &str, _time: &TimeQuery, items: &[Record]) -> FilterOutcome {
        let slot = lexicon::meal_slot(question);
        let audience = lexicon::meal_audience(question, &self.default_audience);
        let cafeteria = self.cafeteria_in(question);

        let matched: Vec<Record> = items
            .iter()
            .filter(|rec| rec.field("meal") == Some(slot))
            .filter(|rec| rec.field("who").map_or(true, |who| who == audience))
            .filter(|rec| cafeteria.map_or(true, |caf| rec.field("cafeteria") == Some(caf)))
            .filter(|rec| !is_placeholder(rec.field("menu")))
            .cloned()
            .collect();
        if matched.is_empty() {
            FilterOutcome::Empty
        } else {
            FilterOutcome::Matched(matched)
        }
    }

    fn render(&self, question: &str, time: &TimeQuery, matched: &[Record]) -> String {
        let slot = lexicon::meal_slot(question);
        let menus: Vec<String> = matched
            .iter()
            .filter_map(|rec| {
                let menu = rec.field("menu")?;
                match rec.field("cafeteria") {
                    Some(caf) => Some(format!("{caf} {menu}")),
                    None => Some(menu.to_string()),
                }
            })
            .collect();
        format!(
            "{}월 {}일 {} 식단은 {}입니다.",
            time.resolved.month(),
            time.resolved.day(),
            slot,
            summarize(&menus, 3)
        )
    }

    fn render_diff(&self, added: &[Record]) -> String {
        let menus: Vec<&str> = added
            .iter()
            .filter_map(|rec| rec.field("menu"))
            .filter(|menu| !is_placeholder(Some(menu)))
            .take(3)
            .collect();
        if menus.is_empty() {
            return format!("식단 {}건이 업데이트되었습니다.", added.len());
        }
        format!("오늘 식단이 업데이트되었습니다: {} 등", menus.join(", "))
    }

    fn no_changes(&self) -> String {
        "오늘 식단은 변동 사항이 없습니다.".to_string()
    }

    fn not_found(&self) -> String {
        "오늘은 식단 정보가 없습니다.".to_string()
    }

    /// A day whose menus are all placeholders reads the same as a missing
    /// day; both fall back to the same calendar day one year earlier.
    fn retry(&self, _question: &str, time: &TimeQuery) -> Option<Retry> {
        let back = one_year_back(time.resolved)?;
        Some(Retry {
            partition: Partition::Date(back),
            time: TimeQuery {
                raw: time.raw.clone(),
                resolved: back,
                precision: time.precision,
            },
            notice: "요청하신 날짜의 식단이 없어 작년 같은 날의 식단을 안내드립니다.".to_string(),
        })
    }
}
