//! Multi-signal scoring
//!
//! Four signals recomputed from a cluster's full member set on every
//! mutation: source diversity, temporal naturalness, narrative independence,
//! and scheduled-event legitimacy. All calculators are pure functions of the
//! member set and the external resolvers' responses.

mod diversity;
mod event;
mod narrative;
mod temporal;

pub use diversity::diversity_score;
pub use event::{match_event, EventKind, EventMatch, ScheduledEvent};
pub use narrative::narrative_score;
pub use temporal::{temporal_shape, TemporalShape};

use serde::{Deserialize, Serialize};

use crate::article::SourceTier;
use crate::config::{GuardConfig, TemporalThresholds};

/// A member article with its source tier resolved and text tokenized.
///
/// Built by the store after resolver calls; the calculators never touch the
/// resolvers themselves.
#[derive(Debug, Clone)]
pub struct ResolvedMember {
    pub article_id: String,
    pub source: String,
    pub tier: SourceTier,
    pub published_at_ms: i64,
    pub tokens: Vec<String>,
}

/// Point-in-time signal values for a cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSnapshot {
    /// Diversity integrity, 0..1 (higher = broader, better sourcing)
    pub diversity: f64,
    /// Temporal naturalness, -1..1 (negative = machine-like arrival pattern)
    pub temporal: f64,
    /// Narrative independence, 0..1 (lower = near-copy wording)
    pub narrative: f64,
    /// Whether a scheduled calendar event plausibly explains the cluster
    pub event_match: bool,
    /// Confidence of the event match, 0..1
    pub event_confidence: f64,
    /// Name of the matched event, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    /// Set when any resolver fell back to its safe default; downstream
    /// consumers should discount confidence further
    pub degraded: bool,
}

impl Default for SignalSnapshot {
    fn default() -> Self {
        Self {
            diversity: 0.0,
            temporal: 0.0,
            narrative: 0.0,
            event_match: false,
            event_confidence: 0.0,
            event_name: None,
            degraded: false,
        }
    }
}

/// Computes all four signals for a cluster's current member set.
#[derive(Debug, Clone)]
pub struct SignalCalculator {
    temporal: TemporalThresholds,
    event_tolerance_ms: i64,
    event_match_threshold: f64,
}

impl SignalCalculator {
    pub fn new(config: &GuardConfig) -> Self {
        Self {
            temporal: config.temporal.clone(),
            event_tolerance_ms: config.event_tolerance_ms,
            event_match_threshold: config.event_match_threshold,
        }
    }

    /// Compute a full snapshot.
    ///
    /// `events` are the calendar resolver's entries for the cluster's
    /// first-seen window; `theme_keywords` is the cluster's keyword set used
    /// for event-affinity scoring; `degraded` is true when any resolver call
    /// fell back to a default.
    pub fn compute(
        &self,
        members: &[ResolvedMember],
        events: &[ScheduledEvent],
        first_seen_ms: i64,
        theme_keywords: &[String],
        degraded: bool,
    ) -> SignalSnapshot {
        let diversity = diversity_score(members);

        let mut timestamps: Vec<i64> = members.iter().map(|m| m.published_at_ms).collect();
        timestamps.sort_unstable();
        let shape = temporal_shape(&timestamps, &self.temporal);

        let token_lists: Vec<Vec<String>> = members.iter().map(|m| m.tokens.clone()).collect();
        let narrative = narrative_score(&token_lists);

        let event = match_event(
            events,
            first_seen_ms,
            theme_keywords,
            self.event_tolerance_ms,
            self.event_match_threshold,
        );

        SignalSnapshot {
            diversity,
            temporal: shape.score(),
            narrative,
            event_match: event.matched,
            event_confidence: event.confidence,
            event_name: event.event_name,
            degraded,
        }
    }
}
