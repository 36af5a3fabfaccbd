//! Temporal naturalness signal
//!
//! Classifies the inter-arrival pattern of a cluster's member timestamps.
//! Organic news diffusion is irregular; coordinated releases are either
//! burst-synchronized or suspiciously evenly spaced. Embargoed coverage is
//! the one legitimate synchronized pattern: everyone publishes the moment a
//! round-clock embargo lifts.

use serde::{Deserialize, Serialize};

use crate::config::TemporalThresholds;

const MINUTE_MS: i64 = 60_000;

/// Arrival-pattern shape of a member timestamp set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemporalShape {
    /// Fewer than two members; no pattern yet
    Sparse,
    /// Burst aligned to a round clock time (embargo lift)
    SynchronizedRelease,
    /// Burst at an arbitrary second (bot-like)
    CoordinatedBurst,
    /// Short spread with near-uniform spacing (scripted drip)
    UniformDrip,
    /// Short spread with irregular spacing (organic pickup)
    IrregularSpread,
    /// Diffusion over multiple hours
    GradualDiffusion,
}

impl TemporalShape {
    /// Naturalness score in [-1, 1]. Negative values indicate machine-like
    /// arrival patterns.
    pub fn score(&self) -> f64 {
        match self {
            Self::Sparse => 0.0,
            Self::SynchronizedRelease => 0.8,
            Self::CoordinatedBurst => -0.8,
            Self::UniformDrip => -0.5,
            Self::IrregularSpread => 0.3,
            Self::GradualDiffusion => 0.5,
        }
    }
}

impl std::fmt::Display for TemporalShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sparse => write!(f, "sparse"),
            Self::SynchronizedRelease => write!(f, "synchronized_release"),
            Self::CoordinatedBurst => write!(f, "coordinated_burst"),
            Self::UniformDrip => write!(f, "uniform_drip"),
            Self::IrregularSpread => write!(f, "irregular_spread"),
            Self::GradualDiffusion => write!(f, "gradual_diffusion"),
        }
    }
}

/// Classify a sorted timestamp slice into a temporal shape.
///
/// The mapping is total: every input lands on exactly one shape.
pub fn temporal_shape(sorted_timestamps: &[i64], thresholds: &TemporalThresholds) -> TemporalShape {
    if sorted_timestamps.len() < 2 {
        return TemporalShape::Sparse;
    }

    let earliest = sorted_timestamps[0];
    let latest = sorted_timestamps[sorted_timestamps.len() - 1];
    let span = latest - earliest;

    if span <= thresholds.burst_window_ms {
        if is_clock_aligned(earliest, thresholds.alignment_tolerance_ms) {
            return TemporalShape::SynchronizedRelease;
        }
        return TemporalShape::CoordinatedBurst;
    }

    if span >= thresholds.diffusion_window_ms {
        return TemporalShape::GradualDiffusion;
    }

    // scripted drips play out over a short window; even spacing across a
    // longer span is indistinguishable from periodic organic pickup
    if span <= thresholds.spread_window_ms
        && is_near_uniform(sorted_timestamps, thresholds.uniform_cv_max)
    {
        return TemporalShape::UniformDrip;
    }

    TemporalShape::IrregularSpread
}

/// Whether a timestamp sits within tolerance of a round-minute boundary.
fn is_clock_aligned(ts_ms: i64, tolerance_ms: i64) -> bool {
    let offset = ts_ms.rem_euclid(MINUTE_MS);
    offset <= tolerance_ms || (MINUTE_MS - offset) <= tolerance_ms
}

/// Whether inter-arrival gaps are near-uniform: coefficient of variation
/// (population stddev / mean) at or below `cv_max`.
fn is_near_uniform(sorted_timestamps: &[i64], cv_max: f64) -> bool {
    let gaps: Vec<f64> = sorted_timestamps
        .windows(2)
        .map(|w| (w[1] - w[0]) as f64)
        .collect();
    if gaps.len() < 2 {
        // a single gap carries no evidence of scripted spacing
        return false;
    }

    let mean = gaps.iter().sum::<f64>() / gaps.len() as f64;
    if mean <= 0.0 {
        return true;
    }
    let variance = gaps.iter().map(|g| (g - mean) * (g - mean)).sum::<f64>() / gaps.len() as f64;
    variance.sqrt() / mean <= cv_max
}
