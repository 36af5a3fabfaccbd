//! Diversity integrity signal
//!
//! Measures how broad and reputable a cluster's sourcing is. A story carried
//! only by low-tier outlets scores low regardless of volume; a single major
//! wire pickup moves the needle more than ten copycat blogs.

use std::collections::HashSet;

use crate::article::SourceTier;

use super::ResolvedMember;

/// Bonus when at least one major-tier source is present.
const MAJOR_PRESENCE_BONUS: f64 = 0.2;
/// Per-extra-distinct-source bonus, capped.
const DISTINCT_SOURCE_STEP: f64 = 0.02;
const DISTINCT_SOURCE_CAP: f64 = 0.2;

/// Diversity integrity in [0, 1].
///
/// Weighted mean of tier weights normalized by the major-tier weight, plus a
/// major-presence bonus and a capped distinct-source bonus.
pub fn diversity_score(members: &[ResolvedMember]) -> f64 {
    if members.is_empty() {
        return 0.0;
    }

    let weight_sum: f64 = members.iter().map(|m| m.tier.weight()).sum();
    let base = (weight_sum / members.len() as f64) / SourceTier::Major.weight();

    let major_bonus = if members.iter().any(|m| m.tier == SourceTier::Major) {
        MAJOR_PRESENCE_BONUS
    } else {
        0.0
    };

    let distinct: HashSet<&str> = members.iter().map(|m| m.source.as_str()).collect();
    let distinct_bonus =
        (DISTINCT_SOURCE_STEP * (distinct.len().saturating_sub(1)) as f64).min(DISTINCT_SOURCE_CAP);

    (base + major_bonus + distinct_bonus).clamp(0.0, 1.0)
}
