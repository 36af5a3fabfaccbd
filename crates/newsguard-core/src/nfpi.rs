//! News Fraud Probability Index
//!
//! Collapses the four signals into a single 0-100 suspicion score for
//! consumers that want one number instead of the full snapshot.

use serde::{Deserialize, Serialize};

use crate::signal::SignalSnapshot;

const DIVERSITY_WEIGHT: f64 = 0.3;
const NARRATIVE_WEIGHT: f64 = 0.3;
const TEMPORAL_WEIGHT: f64 = 0.2;
const EVENT_WEIGHT: f64 = 0.2;

/// Interpretation bands for the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NfpiBand {
    /// Below 10: trust fast
    HighTrust,
    /// Below 40: relatively safe
    Safe,
    /// 40 to 70: discount confidence
    Caution,
    /// Above 70: very likely fabricated or coordinated
    VerySuspicious,
}

impl std::fmt::Display for NfpiBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HighTrust => write!(f, "high_trust"),
            Self::Safe => write!(f, "safe"),
            Self::Caution => write!(f, "caution"),
            Self::VerySuspicious => write!(f, "very_suspicious"),
        }
    }
}

/// Suspicion index in [0, 100].
///
/// Weighted blend of inverted diversity, inverted narrative independence,
/// negative temporal naturalness, and the absence of a calendar event.
pub fn nfpi_score(signals: &SignalSnapshot) -> f64 {
    let diversity_risk = 1.0 - signals.diversity.clamp(0.0, 1.0);
    let narrative_risk = 1.0 - signals.narrative.clamp(0.0, 1.0);
    let temporal_risk = (-signals.temporal).max(0.0).min(1.0);
    let event_risk = if signals.event_match { 0.0 } else { 1.0 };

    let score = 100.0
        * (DIVERSITY_WEIGHT * diversity_risk
            + NARRATIVE_WEIGHT * narrative_risk
            + TEMPORAL_WEIGHT * temporal_risk
            + EVENT_WEIGHT * event_risk);
    score.clamp(0.0, 100.0)
}

/// Interpretation band for a score.
pub fn nfpi_band(score: f64) -> NfpiBand {
    if score > 70.0 {
        NfpiBand::VerySuspicious
    } else if score >= 40.0 {
        NfpiBand::Caution
    } else if score >= 10.0 {
        NfpiBand::Safe
    } else {
        NfpiBand::HighTrust
    }
}
