//! Sharded cluster store
//!
//! Owns all cluster state and serializes mutation per fingerprint: each
//! fingerprint hashes to one of N lanes, each lane guarded by its own async
//! mutex. One lane mutates at a time; distinct lanes run fully in parallel.
//! Signal recomputation, verdict classification, and the cooldown clamp all
//! happen under the lane lock, so readers never observe a cluster whose
//! signals lag its member set.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::sync::{broadcast, Mutex};
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, info, warn};

use newsguard_core::article::Article;
use newsguard_core::cluster::{Cluster, ClusterUpdateEvent};
use newsguard_core::config::GuardConfig;
use newsguard_core::fingerprint::{tokenize, Fingerprint, FingerprintGenerator};
use newsguard_core::nfpi::nfpi_score;
use newsguard_core::signal::{ResolvedMember, SignalCalculator, SignalSnapshot};
use newsguard_core::verdict::{classify, Outcome, RuleInput, Verdict};

use crate::error::{IngestError, IngestResult};
use crate::resolver::{
    resolve_tier_bounded, scheduled_events_bounded, EventCalendarResolver, SourceTierResolver,
};

/// Capacity of the update broadcast channel; slow subscribers lag, they do
/// not backpressure ingestion.
const UPDATE_CHANNEL_CAPACITY: usize = 1024;

/// Wall clock in Unix milliseconds.
pub fn epoch_ms_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Result of one sweep pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Cooldowns whose deadline passed and whose clamp was released
    pub released_cooldowns: usize,
    /// Idle clusters evicted
    pub evicted: usize,
}

/// Per-verdict cluster counts.
#[derive(Debug, Clone, Default)]
pub struct StoreStats {
    pub total_clusters: usize,
    pub cooling_clusters: usize,
    pub by_verdict: HashMap<Verdict, usize>,
}

type Shard = Mutex<HashMap<Fingerprint, Cluster>>;

/// The cluster store. Cheap to share via [`Arc`]; all methods take `&self`.
pub struct ClusterStore {
    config: GuardConfig,
    generator: FingerprintGenerator,
    calculator: SignalCalculator,
    shards: Vec<Shard>,
    tiers: Arc<dyn SourceTierResolver>,
    calendar: Arc<dyn EventCalendarResolver>,
    updates: broadcast::Sender<ClusterUpdateEvent>,
}

impl ClusterStore {
    pub fn new(
        config: GuardConfig,
        tiers: Arc<dyn SourceTierResolver>,
        calendar: Arc<dyn EventCalendarResolver>,
    ) -> Self {
        let shard_count = config.shard_count.max(1);
        let shards = (0..shard_count)
            .map(|_| Mutex::new(HashMap::new()))
            .collect();
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            generator: FingerprintGenerator::new(config.fingerprint_keywords),
            calculator: SignalCalculator::new(&config),
            config,
            shards,
            tiers,
            calendar,
            updates,
        }
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Subscribe to cluster update events.
    pub fn subscribe(&self) -> broadcast::Receiver<ClusterUpdateEvent> {
        self.updates.subscribe()
    }

    /// Update events as an async stream.
    pub fn updates(&self) -> BroadcastStream<ClusterUpdateEvent> {
        BroadcastStream::new(self.updates.subscribe())
    }

    fn shard(&self, fingerprint: &Fingerprint) -> &Shard {
        &self.shards[fingerprint.lane(self.shards.len())]
    }

    /// Ingest one article: validate, cluster, recompute signals and verdict,
    /// emit an update event. Returns the cluster state after the mutation.
    ///
    /// `now_ms` is the ingestion wall clock, passed explicitly so cooldown
    /// behavior is reproducible under test.
    pub async fn ingest(&self, article: Article, now_ms: i64) -> IngestResult<Cluster> {
        article.validate()?;

        let fingerprint = self.generator.fingerprint(&article);
        let shard = self.shard(&fingerprint);
        let mut lane = shard.lock().await;

        let mut cluster = match lane.remove(&fingerprint) {
            Some(mut existing)
                if (article.published_at_ms - existing.last_seen_ms).abs()
                    <= self.config.time_window_ms =>
            {
                existing.append(article);
                existing
            }
            Some(stale) => {
                info!(
                    fingerprint = %fingerprint,
                    idle_ms = article.published_at_ms - stale.last_seen_ms,
                    "cluster outside join window, reseeding"
                );
                self.seed_cluster(fingerprint.clone(), article)
            }
            None => {
                debug!(fingerprint = %fingerprint, "creating cluster");
                self.seed_cluster(fingerprint.clone(), article)
            }
        };

        // One retry on a revision mismatch. The lane lock makes a mismatch
        // impossible in practice; this is the defensive guard, not a
        // correctness mechanism.
        for attempt in 0..2 {
            let revision = cluster.revision;
            let previous_verdict = cluster.verdict;

            let (signals, outcome, nfpi) = self.recompute(&cluster).await;

            if cluster.revision != revision {
                warn!(
                    fingerprint = %cluster.fingerprint,
                    attempt,
                    "revision moved during recompute, retrying"
                );
                continue;
            }

            cluster.apply(signals, outcome, nfpi, now_ms);
            if cluster.verdict != previous_verdict {
                info!(
                    fingerprint = %cluster.fingerprint,
                    ticker = %cluster.ticker,
                    verdict = %cluster.verdict,
                    members = cluster.member_count(),
                    nfpi = cluster.nfpi,
                    "verdict changed"
                );
            }
            let _ = self.updates.send(cluster.update_event());
            lane.insert(fingerprint, cluster.clone());
            return Ok(cluster);
        }

        // fail-open: keep the appended member but skip the stale update
        warn!(fingerprint = %fingerprint, "persistent mutation conflict, update skipped");
        lane.insert(fingerprint.clone(), cluster);
        Err(IngestError::Conflict {
            fingerprint: fingerprint.to_string(),
        })
    }

    fn seed_cluster(&self, fingerprint: Fingerprint, article: Article) -> Cluster {
        let theme = self.generator.theme(&article);
        let theme_keywords = tokenize(&article.title);
        Cluster::seed(fingerprint, article, theme, theme_keywords)
    }

    /// Full signal/verdict recompute for a cluster's current member set.
    async fn recompute(&self, cluster: &Cluster) -> (SignalSnapshot, Outcome, f64) {
        let timeout = Duration::from_millis(self.config.resolver_timeout_ms);
        let mut degraded = false;

        // Resolve each distinct source once per recompute.
        let mut tier_by_source = HashMap::new();
        for article in &cluster.members {
            if !tier_by_source.contains_key(article.source.as_str()) {
                let (tier, fell_back) =
                    resolve_tier_bounded(&self.tiers, &article.source, timeout).await;
                degraded |= fell_back;
                tier_by_source.insert(article.source.as_str(), tier);
            }
        }

        let members: Vec<ResolvedMember> = cluster
            .members
            .iter()
            .map(|a| ResolvedMember {
                article_id: a.id.clone(),
                source: a.source.clone(),
                tier: tier_by_source[a.source.as_str()],
                published_at_ms: a.published_at_ms,
                tokens: tokenize(&a.text()),
            })
            .collect();

        let (events, calendar_fell_back) = scheduled_events_bounded(
            &self.calendar,
            &cluster.ticker,
            cluster.first_seen_ms - self.config.event_tolerance_ms,
            cluster.first_seen_ms + self.config.event_tolerance_ms,
            timeout,
        )
        .await;
        degraded |= calendar_fell_back;

        let signals = self.calculator.compute(
            &members,
            &events,
            cluster.first_seen_ms,
            &cluster.theme_keywords,
            degraded,
        );
        let outcome = classify(&RuleInput {
            signals: &signals,
            member_count: cluster.member_count(),
            min_cluster_size: self.config.min_cluster_size,
        });
        let nfpi = nfpi_score(&signals);
        (signals, outcome, nfpi)
    }

    /// Look up a cluster by fingerprint.
    pub async fn get(&self, fingerprint: &Fingerprint) -> Option<Cluster> {
        self.shard(fingerprint).lock().await.get(fingerprint).cloned()
    }

    /// Clusters touched within the last `since_hours`.
    pub async fn list_active(&self, since_hours: i64, now_ms: i64) -> Vec<Cluster> {
        let cutoff = now_ms - since_hours * 3_600_000;
        let mut active = Vec::new();
        for shard in &self.shards {
            let lane = shard.lock().await;
            active.extend(lane.values().filter(|c| c.last_seen_ms >= cutoff).cloned());
        }
        active.sort_by_key(|c| std::cmp::Reverse(c.last_seen_ms));
        active
    }

    /// Clusters currently carrying the given verdict.
    pub async fn list_by_verdict(&self, verdict: Verdict) -> Vec<Cluster> {
        let mut matching = Vec::new();
        for shard in &self.shards {
            let lane = shard.lock().await;
            matching.extend(lane.values().filter(|c| c.verdict == verdict).cloned());
        }
        matching
    }

    /// Store-wide counters.
    pub async fn stats(&self) -> StoreStats {
        let mut stats = StoreStats::default();
        let now = epoch_ms_now();
        for shard in &self.shards {
            let lane = shard.lock().await;
            for cluster in lane.values() {
                stats.total_clusters += 1;
                if cluster.is_cooling(now) {
                    stats.cooling_clusters += 1;
                }
                *stats.by_verdict.entry(cluster.verdict).or_insert(0) += 1;
            }
        }
        stats
    }

    /// One sweep pass: release expired cooldowns and evict idle clusters.
    ///
    /// Runs under the same lane locks as ingestion, so it never observes or
    /// leaves a cluster mid-update.
    pub async fn sweep(&self, now_ms: i64) -> SweepStats {
        let mut stats = SweepStats::default();
        let max_age = self.config.max_age_ms;
        for shard in &self.shards {
            let mut lane = shard.lock().await;

            for cluster in lane.values_mut() {
                if cluster.expire_cooldown(now_ms) {
                    stats.released_cooldowns += 1;
                    if now_ms - cluster.last_seen_ms > max_age {
                        // idle past max_age: eviction below, no re-cooling
                        continue;
                    }
                    // reclassify from the stored signals so the released
                    // multiplier is visible without waiting for new members
                    let outcome = classify(&RuleInput {
                        signals: &cluster.signals,
                        member_count: cluster.member_count(),
                        min_cluster_size: self.config.min_cluster_size,
                    });
                    let signals = cluster.signals.clone();
                    let nfpi = cluster.nfpi;
                    cluster.apply(signals, outcome, nfpi, now_ms);
                    info!(
                        fingerprint = %cluster.fingerprint,
                        verdict = %cluster.verdict,
                        "cooldown released"
                    );
                    let _ = self.updates.send(cluster.update_event());
                }
            }

            let before = lane.len();
            lane.retain(|fingerprint, cluster| {
                let expired = now_ms - cluster.last_seen_ms > max_age;
                let keep = !expired || cluster.is_cooling(now_ms);
                if !keep {
                    debug!(fingerprint = %fingerprint, "evicting idle cluster");
                }
                keep
            });
            stats.evicted += before - lane.len();
        }

        if stats != SweepStats::default() {
            info!(
                released = stats.released_cooldowns,
                evicted = stats.evicted,
                "sweep pass complete"
            );
        }
        stats
    }
}
