//! Narrative independence signal
//!
//! Measures how independently worded a cluster's members are. Genuine
//! multi-outlet coverage paraphrases; astroturfed campaigns paste the same
//! text everywhere. Near-copy wording (mean similarity above 0.9) is
//! penalized severely rather than linearly.

use crate::similarity::mean_pairwise_jaccard;

/// Mean similarity above this is treated as copy-paste text.
const COPY_THRESHOLD: f64 = 0.9;
/// Multiplier applied to the independence remainder for copy-paste clusters.
const COPY_PENALTY: f64 = 0.3;

/// Narrative independence in [0, 1].
///
/// `1 - s` for mean pairwise word-level Jaccard similarity `s`, with the
/// remainder scaled down by the copy penalty once `s` crosses the threshold.
/// A single member has nothing to copy from and scores 1.0.
pub fn narrative_score(token_lists: &[Vec<String>]) -> f64 {
    if token_lists.len() < 2 {
        return 1.0;
    }

    let s = mean_pairwise_jaccard(token_lists);
    let mut independence = 1.0 - s;
    if s > COPY_THRESHOLD {
        independence *= COPY_PENALTY;
    }
    independence.clamp(0.0, 1.0)
}
