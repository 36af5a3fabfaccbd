//! External resolver adapters
//!
//! Source reputation and the economic calendar live outside this system.
//! The store talks to them through these traits, always under a bounded
//! timeout, and degrades to conservative defaults when they fail: a slow
//! reputation database must never stall ingestion.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use newsguard_core::article::SourceTier;
use newsguard_core::signal::ScheduledEvent;

use crate::error::ResolverError;

/// Resolves a source identifier to its reputation tier.
#[async_trait]
pub trait SourceTierResolver: Send + Sync {
    async fn resolve_tier(&self, source: &str) -> Result<SourceTier, ResolverError>;
}

/// Returns scheduled events for a ticker within a time window.
#[async_trait]
pub trait EventCalendarResolver: Send + Sync {
    async fn scheduled_events(
        &self,
        ticker: &str,
        window_start_ms: i64,
        window_end_ms: i64,
    ) -> Result<Vec<ScheduledEvent>, ResolverError>;
}

/// Tier used when the reputation resolver fails or times out.
pub const DEGRADED_TIER: SourceTier = SourceTier::Minor;

/// Resolve a tier under a timeout; on failure fall back to [`DEGRADED_TIER`]
/// and report degradation via the returned flag.
pub async fn resolve_tier_bounded(
    resolver: &Arc<dyn SourceTierResolver>,
    source: &str,
    timeout: Duration,
) -> (SourceTier, bool) {
    match tokio::time::timeout(timeout, resolver.resolve_tier(source)).await {
        Ok(Ok(tier)) => (tier, false),
        Ok(Err(e)) => {
            warn!(source, error = %e, "tier resolver failed, degrading to {}", DEGRADED_TIER);
            (DEGRADED_TIER, true)
        }
        Err(_) => {
            warn!(source, "tier resolver timed out, degrading to {}", DEGRADED_TIER);
            (DEGRADED_TIER, true)
        }
    }
}

/// Fetch calendar events under a timeout; on failure fall back to no events
/// and report degradation via the returned flag.
pub async fn scheduled_events_bounded(
    resolver: &Arc<dyn EventCalendarResolver>,
    ticker: &str,
    window_start_ms: i64,
    window_end_ms: i64,
    timeout: Duration,
) -> (Vec<ScheduledEvent>, bool) {
    match tokio::time::timeout(
        timeout,
        resolver.scheduled_events(ticker, window_start_ms, window_end_ms),
    )
    .await
    {
        Ok(Ok(events)) => (events, false),
        Ok(Err(e)) => {
            warn!(ticker, error = %e, "calendar resolver failed, assuming no events");
            (Vec::new(), true)
        }
        Err(_) => {
            warn!(ticker, "calendar resolver timed out, assuming no events");
            (Vec::new(), true)
        }
    }
}

/// In-memory tier resolver backed by an exact-match table with a default.
///
/// Suitable for tests and for deployments that preload the reputation set.
#[derive(Debug, Default)]
pub struct StaticTierResolver {
    tiers: HashMap<String, SourceTier>,
    default_tier: SourceTier,
}

impl StaticTierResolver {
    pub fn new(default_tier: SourceTier) -> Self {
        Self {
            tiers: HashMap::new(),
            default_tier,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>, tier: SourceTier) -> Self {
        self.tiers.insert(source.into(), tier);
        self
    }
}

#[async_trait]
impl SourceTierResolver for StaticTierResolver {
    async fn resolve_tier(&self, source: &str) -> Result<SourceTier, ResolverError> {
        Ok(self.tiers.get(source).copied().unwrap_or(self.default_tier))
    }
}

/// In-memory calendar backed by a per-ticker event list.
#[derive(Debug, Default)]
pub struct StaticCalendar {
    events: HashMap<String, Vec<ScheduledEvent>>,
}

impl StaticCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_event(mut self, ticker: impl Into<String>, event: ScheduledEvent) -> Self {
        self.events.entry(ticker.into()).or_default().push(event);
        self
    }
}

#[async_trait]
impl EventCalendarResolver for StaticCalendar {
    async fn scheduled_events(
        &self,
        ticker: &str,
        window_start_ms: i64,
        window_end_ms: i64,
    ) -> Result<Vec<ScheduledEvent>, ResolverError> {
        Ok(self
            .events
            .get(ticker)
            .map(|events| {
                events
                    .iter()
                    .filter(|e| {
                        e.scheduled_at_ms >= window_start_ms && e.scheduled_at_ms <= window_end_ms
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
