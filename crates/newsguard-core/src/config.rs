//! Engine configuration
//!
//! All durations are in milliseconds.

use serde::{Deserialize, Serialize};

/// Thresholds for temporal pattern classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporalThresholds {
    /// Arrivals within this span are a burst (default: 60_000ms = 1 minute)
    pub burst_window_ms: i64,
    /// Uniform-drip detection applies within this span; beyond it even
    /// spacing reads as ordinary spread (default: 900_000ms = 15 minutes)
    pub spread_window_ms: i64,
    /// Spans beyond this are gradual diffusion (default: 7_200_000ms = 2 hours)
    pub diffusion_window_ms: i64,
    /// Distance from a round-minute boundary still counted as aligned (default: 1s)
    pub alignment_tolerance_ms: i64,
    /// Max coefficient of variation of inter-arrival gaps for "near-uniform" spacing
    pub uniform_cv_max: f64,
}

impl Default for TemporalThresholds {
    fn default() -> Self {
        Self {
            burst_window_ms: 60_000,         // 1 minute
            spread_window_ms: 900_000,       // 15 minutes
            diffusion_window_ms: 7_200_000,  // 2 hours
            alignment_tolerance_ms: 1_000,   // 1 second
            uniform_cv_max: 0.15,
        }
    }
}

/// Top-level configuration for clustering, scoring, and lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardConfig {
    /// A new article joins an existing cluster only if its timestamp is
    /// within this window of the cluster's last_seen (default: 60 minutes)
    pub time_window_ms: i64,
    /// Clusters below this member count stay Pending (default: 2)
    pub min_cluster_size: usize,
    /// Clusters idle longer than this are evicted by the sweep (default: 24 hours)
    pub max_age_ms: i64,
    /// Number of independent serialized mutation lanes (default: 16)
    pub shard_count: usize,
    /// Bounded timeout for external resolver calls (default: 500ms)
    pub resolver_timeout_ms: u64,
    /// Cooldown/eviction sweep interval (default: 60 seconds)
    pub sweep_interval_ms: u64,
    /// Calendar lookup tolerance around first_seen (default: 2 hours)
    pub event_tolerance_ms: i64,
    /// Scheduled-event match is accepted above this confidence (default: 0.5)
    pub event_match_threshold: f64,
    /// Top-K keywords used for fingerprinting (default: 8)
    pub fingerprint_keywords: usize,
    /// Temporal pattern thresholds
    #[serde(default)]
    pub temporal: TemporalThresholds,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            time_window_ms: 3_600_000, // 60 minutes
            min_cluster_size: 2,
            max_age_ms: 86_400_000, // 24 hours
            shard_count: 16,
            resolver_timeout_ms: 500,
            sweep_interval_ms: 60_000,
            event_tolerance_ms: 7_200_000, // 2 hours
            event_match_threshold: 0.5,
            fingerprint_keywords: 8,
            temporal: TemporalThresholds::default(),
        }
    }
}
