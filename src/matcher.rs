//! Fuzzy name matching for user-typed entities.
//!
//! Users rarely type a department name exactly the way the registrar spells
//! it ("컴공과" for "컴퓨터공학과"), so lookups go through normalized
//! Levenshtein similarity instead of string equality.

use strsim::normalized_levenshtein;

use crate::models::MatchCandidate;

/// Minimum similarity for a confident single best match.
pub const BEST_THRESHOLD: f64 = 0.5;
/// Stricter bar for multi-candidate selection, where every candidate that
/// clears it shares the result set.
pub const STRONG_THRESHOLD: f64 = 0.8;
/// Maximum number of multi-candidate matches.
pub const STRONG_LIMIT: usize = 3;

/// The single best candidate scoring at or above `threshold`, if any.
/// Ties keep the earliest candidate, so callers get stable results.
pub fn best_match<'a, I>(query: &str, names: I, threshold: f64) -> Option<MatchCandidate>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<MatchCandidate> = None;
    for name in names {
        let score = normalized_levenshtein(query, name);
        if score < threshold {
            continue;
        }
        let beats = best.as_ref().map(|b| score > b.score).unwrap_or(true);
        if beats {
            best = Some(MatchCandidate {
                name: name.to_string(),
                score,
            });
        }
    }
    best
}

/// Up to `limit` candidates scoring at or above `threshold`, best first.
pub fn top_matches<'a, I>(
    query: &str,
    names: I,
    limit: usize,
    threshold: f64,
) -> Vec<MatchCandidate>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut scored: Vec<MatchCandidate> = names
        .into_iter()
        .map(|name| MatchCandidate {
            name: name.to_string(),
            score: normalized_levenshtein(query, name),
        })
        .filter(|c| c.score >= threshold)
        .collect();
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    scored.truncate(limit);
    scored
}
