// touchline-core/src/domain/mapping/fuzzy.rs

use strsim::{jaro_winkler, normalized_levenshtein};
use tracing::debug;

/// Best candidate found for a name, with its score in `0..=100`.
#[derive(Debug, Clone, PartialEq)]
pub struct NameMatch {
    pub candidate: String,
    pub score: f64,
}

/// Lowercase, punctuation to spaces, whitespace collapsed.
fn normalize(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn token_sorted(name: &str) -> String {
    let mut tokens: Vec<&str> = name.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

// An abbreviation hit never scores as high as an exact match.
const ABBREVIATION_WEIGHT: f64 = 0.9;

fn ratio(a: &str, b: &str) -> f64 {
    jaro_winkler(a, b).max(normalized_levenshtein(a, b))
}

/// `utd` abbreviates `united`: same first letter, the rest in order.
fn abbreviates(x: &str, y: &str) -> bool {
    let (short, long) = if x.chars().count() <= y.chars().count() {
        (x, y)
    } else {
        (y, x)
    };
    if short.chars().count() < 2 || short.chars().next() != long.chars().next() {
        return false;
    }
    let mut rest = long.chars();
    short.chars().all(|c| rest.any(|l| l == c))
}

/// Tokens of the shorter name abbreviating tokens of the longer one, in
/// order, over the longer name's token count.
fn abbreviation_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<&str> = a.split_whitespace().collect();
    let b: Vec<&str> = b.split_whitespace().collect();
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if long.is_empty() {
        return 0.0;
    }

    let mut next = 0;
    let mut hits = 0;
    for token in &short {
        if let Some(offset) = long[next..].iter().position(|t| abbreviates(token, t)) {
            hits += 1;
            next += offset + 1;
        }
    }
    ABBREVIATION_WEIGHT * hits as f64 / long.len() as f64
}

/// Similarity of two team names in `0..=100`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let (a, b) = (normalize(a), normalize(b));
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let direct = ratio(&a, &b);
    let sorted = ratio(&token_sorted(&a), &token_sorted(&b));
    let abbreviated = abbreviation_ratio(&a, &b);
    (direct.max(sorted).max(abbreviated) * 100.0).clamp(0.0, 100.0)
}

/// Picks the closest candidate for a name, refusing anything below
/// `min_score`.
#[derive(Debug, Clone, Copy)]
pub struct NameMatcher {
    min_score: f64,
}

impl NameMatcher {
    pub fn new(min_score: f64) -> Self {
        Self { min_score }
    }

    pub fn min_score(&self) -> f64 {
        self.min_score
    }

    /// Highest scoring candidate; on a tie the earlier candidate wins.
    /// `None` when there is no candidate at or above the threshold.
    pub fn best_match<S: AsRef<str>>(&self, name: &str, candidates: &[S]) -> Option<NameMatch> {
        let mut best: Option<NameMatch> = None;
        for candidate in candidates {
            let candidate = candidate.as_ref();
            let score = similarity(name, candidate);
            if best.as_ref().is_none_or(|b| score > b.score) {
                best = Some(NameMatch {
                    candidate: candidate.to_string(),
                    score,
                });
            }
        }

        match best {
            Some(m) if m.score >= self.min_score => {
                debug!(name, candidate = %m.candidate, score = m.score, "Matched team name");
                Some(m)
            }
            Some(m) => {
                debug!(name, closest = %m.candidate, score = m.score, "Below threshold, unmatched");
                None
            }
            None => None,
        }
    }
}
