//! Fuzzy-match suggester for unrecognized words (spec.md §4.2.1).
//!
//! Grounded in `examples/original_source/src/parser/utils.py::find_similar_token`,
//! which runs `difflib.get_close_matches` (cutoff 0.6, up to 3 matches) against
//! each vocabulary category in turn, then merges and deduplicates. We use a
//! hand-rolled normalized Levenshtein similarity instead of pulling in a
//! string-distance crate, since the teacher doesn't depend on one either and
//! the comparison set here is small and fixed.

use crate::lexer::vocabulary;

const CUTOFF: f64 = 0.6;
const MAX_SUGGESTIONS: usize = 3;

/// Suggests up to three vocabulary entries close to `word`, deduplicated in
/// first-seen order, or `None` if nothing clears the similarity threshold.
pub fn suggest(word: &str) -> Option<String> {
    let word = word.to_lowercase();
    let mut candidates: Vec<&'static str> = Vec::new();

    for entry in vocabulary() {
        if candidates.contains(&entry) {
            continue;
        }
        if similarity(&word, &entry.to_lowercase()) >= CUTOFF {
            candidates.push(entry);
        }
    }

    candidates.sort_by(|a, b| {
        similarity(&word, &b.to_lowercase())
            .partial_cmp(&similarity(&word, &a.to_lowercase()))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    candidates.truncate(MAX_SUGGESTIONS);

    if candidates.is_empty() {
        None
    } else {
        Some(candidates.join(", "))
    }
}

/// Normalized similarity in `[0.0, 1.0]`: `1 - edit_distance / max_len`.
fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let distance = levenshtein(a, b) as f64;
    let max_len = a.chars().count().max(b.chars().count()) as f64;
    1.0 - distance / max_len
}

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.iter().enumerate() {
        let mut prev_diag = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let temp = row[j + 1];
            row[j + 1] = if ca == cb {
                prev_diag
            } else {
                1 + prev_diag.min(row[j]).min(row[j + 1])
            };
            prev_diag = temp;
        }
    }

    row[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_closest_keyword() {
        let suggestion = suggest("kinnd").expect("expected a suggestion");
        assert!(suggestion.contains("kind"));
    }

    #[test]
    fn no_suggestion_for_unrelated_word() {
        assert_eq!(suggest("xyzzyplugh123"), None);
    }

    #[test]
    fn dedups_candidates() {
        let suggestion = suggest("role").unwrap();
        let parts: Vec<_> = suggestion.split(", ").collect();
        let mut unique = parts.clone();
        unique.dedup();
        assert_eq!(parts.len(), unique.len());
    }
}
