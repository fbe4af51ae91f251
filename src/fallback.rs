//! Last-resort retrieval and the generation contract.
//!
//! When structured filtering finds nothing, the resolver hands the question
//! to a [`RetrievalFallback`]: a lexical search over everything in the
//! cache. The [`AnswerGenerator`] seam is where a language model would sit;
//! the pipeline itself never calls one, and without a generator the top
//! retrieved line is returned as-is.

use sha2::{Digest, Sha256};

use crate::models::Record;
use crate::snapshot::SnapshotStore;

/// Free-text retrieval over cached data. Returns candidate answer lines,
/// best first, possibly empty.
pub trait RetrievalFallback {
    fn retrieve(&self, question: &str) -> Vec<String>;
}

/// Turns a question plus retrieved context into a final answer. This is the
/// seam for a generation backend; implementations decide how much of the
/// context to trust.
pub trait AnswerGenerator {
    fn generate(&self, question: &str, context: &[String]) -> String;
}

/// Assembles the prompt a generator receives. Kept separate from the
/// generator trait so every backend sees the same prompt shape.
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn assemble(question: &str, context: &[String]) -> String {
        let mut prompt = String::from("다음 학교 정보를 참고하여 질문에 답하세요.\n\n");
        for (i, line) in context.iter().enumerate() {
            prompt.push_str(&format!("[{}] {}\n", i + 1, line));
        }
        prompt.push_str(&format!("\n질문: {question}\n답변:"));
        prompt
    }
}

/// Keyword-overlap retrieval across every snapshot in the store.
///
/// Each cached record is rendered to one line of its field values; lines are
/// scored by how many of the question's tokens they contain and deduplicated
/// by content hash, so the same row cached under two partitions appears only
/// once.
pub struct SnapshotRetriever {
    store: SnapshotStore,
    domains: Vec<String>,
    limit: usize,
}

impl SnapshotRetriever {
    pub fn new(store: SnapshotStore, domains: Vec<String>, limit: usize) -> Self {
        SnapshotRetriever {
            store,
            domains,
            limit,
        }
    }

    fn render_line(record: &Record) -> String {
        let mut parts: Vec<String> = Vec::new();
        for value in record.0.values() {
            match value {
                serde_json::Value::String(s) if !s.is_empty() => parts.push(s.clone()),
                serde_json::Value::Array(cells) => {
                    for cell in cells {
                        if let Some(s) = cell.as_str() {
                            parts.push(s.to_string());
                        }
                    }
                }
                serde_json::Value::Number(n) => parts.push(n.to_string()),
                _ => {}
            }
        }
        parts.join(" ")
    }
}

impl RetrievalFallback for SnapshotRetriever {
    fn retrieve(&self, question: &str) -> Vec<String> {
        let tokens: Vec<&str> = question
            .split_whitespace()
            .filter(|t| t.chars().count() > 1)
            .collect();
        if tokens.is_empty() {
            return Vec::new();
        }

        let mut seen: std::collections::HashSet<Vec<u8>> = std::collections::HashSet::new();
        let mut scored: Vec<(usize, String)> = Vec::new();
        for domain in &self.domains {
            for (_, outcome) in self.store.partitions(domain) {
                for record in outcome.records() {
                    let line = Self::render_line(record);
                    if line.is_empty() {
                        continue;
                    }
                    let score = tokens.iter().filter(|t| line.contains(**t)).count();
                    if score == 0 {
                        continue;
                    }
                    let hash = Sha256::digest(line.as_bytes()).to_vec();
                    if seen.insert(hash) {
                        scored.push((score, line));
                    }
                }
            }
        }
        scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        scored
            .into_iter()
            .take(self.limit)
            .map(|(_, line)| line)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Partition, Snapshot};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn retriever(store: &SnapshotStore) -> SnapshotRetriever {
        SnapshotRetriever::new(
            store.clone(),
            vec!["calendar".to_string(), "notices".to_string()],
            3,
        )
    }

    #[test]
    fn test_retrieves_lines_matching_question_tokens() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());
        let snap = Snapshot::new(
            d(2025, 3, 5),
            vec![
                Record::from_pairs(&[("month", "03월"), ("date", "2일"), ("event", "입학식")]),
                Record::from_pairs(&[("month", "06월"), ("date", "21일"), ("event", "종강")]),
            ],
        );
        store.save("calendar", &Partition::Year(2025), &snap).unwrap();

        let hits = retriever(&store).retrieve("입학식 언제야");
        assert_eq!(hits.len(), 1);
        assert!(hits[0].contains("입학식"));
    }

    #[test]
    fn test_duplicate_rows_across_partitions_collapse() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());
        let rec = Record::from_pairs(&[("title", "장학금 신청 안내")]);
        store
            .save(
                "notices",
                &Partition::Global,
                &Snapshot::new(d(2025, 3, 5), vec![rec.clone()]),
            )
            .unwrap();
        store
            .save(
                "calendar",
                &Partition::Year(2025),
                &Snapshot::new(d(2025, 3, 5), vec![rec]),
            )
            .unwrap();

        let hits = retriever(&store).retrieve("장학금 신청");
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_empty_question_retrieves_nothing() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());
        assert!(retriever(&store).retrieve("  ").is_empty());
    }

    #[test]
    fn test_prompt_shape() {
        let prompt = PromptBuilder::assemble("입학식 언제야", &["03월 2일 입학식".to_string()]);
        assert!(prompt.contains("[1] 03월 2일 입학식"));
        assert!(prompt.contains("질문: 입학식 언제야"));
        assert!(prompt.ends_with("답변:"));
    }
}
