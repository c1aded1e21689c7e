//! String similarity measures used by the matcher.
//!
//! Two measures for two jobs:
//! - [`edit_similarity`] (normalized Levenshtein) drives the auto-resolve
//!   stage. It is strict about character order, so one-letter typos score
//!   high while reworded labels do not, and it never returns 1.0 for
//!   unequal strings.
//! - [`suggestion_similarity`] (trigram Jaccard) drives "did you mean"
//!   ranking. It tolerates word order and hyphen/space variants, which is
//!   exactly what a human reviewing an unmatched label wants to see.

use trigram::similarity;

/// Normalized edit-distance similarity between two canonical labels.
///
/// Returns `1.0 - distance / max_len`, in `[0, 1]`; exactly 1.0 only for
/// equal strings.
#[must_use]
pub fn edit_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }
    let a_len = a.chars().count();
    let b_len = b.chars().count();
    let distance = levenshtein(a, b);
    1.0 - (distance as f64) / (a_len.max(b_len) as f64)
}

/// Character-level Levenshtein distance, two-row dynamic programming.
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr: Vec<usize> = vec![0; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitute = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitute.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Trigram similarity between two canonical labels, in `[0, 1]`.
#[must_use]
pub fn suggestion_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    f64::from(similarity(a, b))
}
