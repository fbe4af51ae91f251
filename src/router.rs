//! Question-to-domain routing.
//!
//! Keyword routing, checked in a fixed priority order so mixed questions
//! land predictably: "점심시간 셔틀 있어?" is about the shuttle, not lunch.

/// The five answer domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Calendar,
    Meals,
    Graduation,
    Notices,
    Shuttle,
}

impl Domain {
    pub const ALL: [Domain; 5] = [
        Domain::Calendar,
        Domain::Meals,
        Domain::Graduation,
        Domain::Notices,
        Domain::Shuttle,
    ];

    /// Cache directory name, config key, and CLI argument for this domain.
    pub fn key(&self) -> &'static str {
        match self {
            Domain::Calendar => "calendar",
            Domain::Meals => "meals",
            Domain::Graduation => "graduation",
            Domain::Notices => "notices",
            Domain::Shuttle => "shuttle",
        }
    }

    pub fn from_key(key: &str) -> Option<Domain> {
        Domain::ALL.iter().copied().find(|d| d.key() == key)
    }
}

const SHUTTLE_KEYWORDS: [&str; 3] = ["셔틀", "버스", "통학"];
const MEAL_KEYWORDS: [&str; 9] = [
    "식단", "메뉴", "학식", "조식", "중식", "석식", "아침", "점심", "저녁",
];
const GRADUATION_KEYWORDS: [&str; 2] = ["졸업요건", "졸업"];
const NOTICE_KEYWORDS: [&str; 2] = ["공지", "공지사항"];
const CALENDAR_KEYWORDS: [&str; 6] = ["학사일정", "일정", "개강", "종강", "수강신청", "방학"];

/// Route a question to its domain, or `None` when nothing matches. Shuttle
/// is checked first because meal and calendar words show up incidentally in
/// shuttle questions.
pub fn route(question: &str) -> Option<Domain> {
    let hit = |keywords: &[&str]| keywords.iter().any(|kw| question.contains(kw));
    if hit(&SHUTTLE_KEYWORDS) {
        Some(Domain::Shuttle)
    } else if hit(&MEAL_KEYWORDS) {
        Some(Domain::Meals)
    } else if hit(&GRADUATION_KEYWORDS) {
        Some(Domain::Graduation)
    } else if hit(&NOTICE_KEYWORDS) {
        Some(Domain::Notices)
    } else if hit(&CALENDAR_KEYWORDS) {
        Some(Domain::Calendar)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_domain_routes() {
        assert_eq!(route("오늘 학식 뭐야"), Some(Domain::Meals));
        assert_eq!(route("내일 저녁 뭐 나와?"), Some(Domain::Meals));
        assert_eq!(route("학사일정 알려줘"), Some(Domain::Calendar));
        assert_eq!(route("다음 주 일정 뭐 있어?"), Some(Domain::Calendar));
        assert_eq!(route("컴퓨터공학과 졸업요건"), Some(Domain::Graduation));
        assert_eq!(route("공지 올라온 거 있어?"), Some(Domain::Notices));
        assert_eq!(route("셔틀 언제 와"), Some(Domain::Shuttle));
    }

    #[test]
    fn test_shuttle_wins_mixed_questions() {
        assert_eq!(route("점심시간 셔틀 있어?"), Some(Domain::Shuttle));
        assert_eq!(route("개강일 버스 시간표"), Some(Domain::Shuttle));
    }

    #[test]
    fn test_unroutable_question() {
        assert_eq!(route("도서관 몇 시까지 해?"), None);
    }

    #[test]
    fn test_keys_round_trip() {
        for domain in Domain::ALL {
            assert_eq!(Domain::from_key(domain.key()), Some(domain));
        }
        assert_eq!(Domain::from_key("library"), None);
    }
}
