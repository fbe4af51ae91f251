//! Additive snapshot comparison.
//!
//! "What changed?" questions are answered by set difference over canonical
//! record text: anything in the current snapshot that was not in the
//! previous one counts as new. Removals and in-place edits are invisible by
//! design; an edited record simply shows up as an addition.

use std::collections::HashSet;

use crate::models::Record;

/// Records of `current` absent from `previous`, in `current`'s order.
pub fn added(previous: &[Record], current: &[Record]) -> Vec<Record> {
    let seen: HashSet<String> = previous.iter().map(Record::canonical).collect();
    current
        .iter()
        .filter(|rec| !seen.contains(&rec.canonical()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(event: &str) -> Record {
        Record::from_pairs(&[("month", "03월"), ("date", "1일"), ("event", event)])
    }

    #[test]
    fn test_new_records_are_reported_in_order() {
        let prev = vec![rec("개강")];
        let curr = vec![rec("개강"), rec("수강정정"), rec("채플")];
        let fresh = added(&prev, &curr);
        assert_eq!(fresh.len(), 2);
        assert_eq!(fresh[0].field("event"), Some("수강정정"));
        assert_eq!(fresh[1].field("event"), Some("채플"));
    }

    #[test]
    fn test_identical_snapshots_yield_nothing() {
        let prev = vec![rec("개강"), rec("채플")];
        assert!(added(&prev, &prev).is_empty());
    }

    #[test]
    fn test_removals_are_invisible() {
        let prev = vec![rec("개강"), rec("채플")];
        let curr = vec![rec("개강")];
        assert!(added(&prev, &curr).is_empty());
    }

    #[test]
    fn test_field_order_does_not_fake_a_change() {
        let prev = vec![Record::from_pairs(&[("a", "1"), ("b", "2")])];
        let curr = vec![Record::from_pairs(&[("b", "2"), ("a", "1")])];
        assert!(added(&prev, &curr).is_empty());
    }

    #[test]
    fn test_edited_record_appears_as_addition() {
        let prev = vec![rec("개강")];
        let curr = vec![rec("개강(변경)")];
        let fresh = added(&prev, &curr);
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].field("event"), Some("개강(변경)"));
    }
}
