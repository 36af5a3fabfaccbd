//! Lexical similarity primitives

use std::collections::HashSet;

/// Word-level Jaccard similarity between two token lists.
///
/// Returns 1.0 when both are empty (two empty texts are identical for our
/// purposes) and 0.0 when exactly one is empty.
pub fn jaccard_tokens(a: &[String], b: &[String]) -> f64 {
    let set_a: HashSet<&str> = a.iter().map(|s| s.as_str()).collect();
    let set_b: HashSet<&str> = b.iter().map(|s| s.as_str()).collect();

    if set_a.is_empty() && set_b.is_empty() {
        return 1.0;
    }
    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }

    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.len() + set_b.len() - intersection;
    intersection as f64 / union as f64
}

/// Mean pairwise Jaccard similarity over all distinct pairs of token lists.
///
/// Returns 0.0 for fewer than two lists (no pairs to compare).
pub fn mean_pairwise_jaccard(token_lists: &[Vec<String>]) -> f64 {
    if token_lists.len() < 2 {
        return 0.0;
    }

    let mut total = 0.0;
    let mut pairs = 0usize;
    for i in 0..token_lists.len() {
        for j in (i + 1)..token_lists.len() {
            total += jaccard_tokens(&token_lists[i], &token_lists[j]);
            pairs += 1;
        }
    }
    total / pairs as f64
}
