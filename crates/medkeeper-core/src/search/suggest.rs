//! Combobox suggestions for medication and regimen codes.
//!
//! Substring hits rank first, then fuzzy similarity. Scores are in 0.0..=1.0.

use std::cmp::Ordering;

use strsim::{jaro_winkler, normalized_levenshtein};

use crate::models::Medication;
use crate::store::StoreState;

/// Minimum fuzzy score for a non-substring candidate.
const MIN_SIMILARITY: f64 = 0.70;

/// A ranked suggestion.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion<T> {
    pub item: T,
    pub score: f64,
}

/// Catalog entries matching `term` on code or name.
pub fn suggest_medications<'a>(
    state: &'a StoreState,
    term: &str,
    limit: usize,
) -> Vec<Suggestion<&'a Medication>> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return Vec::new();
    }
    let mut ranked: Vec<Suggestion<&Medication>> = state
        .medications
        .iter()
        .filter_map(|m| {
            let score = score(&term, &m.code).max(score(&term, &m.name));
            (score >= MIN_SIMILARITY).then_some(Suggestion { item: m, score })
        })
        .collect();
    rank(&mut ranked);
    ranked.truncate(limit);
    ranked
}

/// Distinct regimen codes matching `term`.
pub fn suggest_regimen_codes<'a>(state: &'a StoreState, term: &str) -> Vec<Suggestion<&'a str>> {
    let term = term.trim().to_lowercase();
    let mut ranked: Vec<Suggestion<&str>> = Vec::new();
    for regimen in &state.regimens {
        if ranked.iter().any(|s| s.item == regimen.code) {
            continue;
        }
        let score = if term.is_empty() { 1.0 } else { score(&term, &regimen.code) };
        if score >= MIN_SIMILARITY {
            ranked.push(Suggestion {
                item: regimen.code.as_str(),
                score,
            });
        }
    }
    rank(&mut ranked);
    ranked
}

/// 1.0 for a substring hit, otherwise a blend of Jaro-Winkler and
/// normalized Levenshtein weighted toward prefix agreement.
fn score(term: &str, candidate: &str) -> f64 {
    let candidate = candidate.to_lowercase();
    if candidate.contains(term) {
        return 1.0;
    }
    jaro_winkler(term, &candidate) * 0.6 + normalized_levenshtein(term, &candidate) * 0.4
}

fn rank<T>(ranked: &mut [Suggestion<T>]) {
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
}
