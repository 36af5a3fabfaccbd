//! Cooldown release and eviction behavior of the sweep pass.

use std::sync::Arc;

use newsguard_core::article::{Article, ArticleBuilder, SourceTier};
use newsguard_core::config::GuardConfig;
use newsguard_core::verdict::Verdict;
use newsguard_engine::resolver::{StaticCalendar, StaticTierResolver};
use newsguard_engine::store::{epoch_ms_now, ClusterStore};
use newsguard_engine::sweeper::CooldownManager;

const T0: i64 = 1_699_977_617_345; // off a round minute
const HOUR_MS: i64 = 3_600_000;

fn store_with(config: GuardConfig) -> ClusterStore {
    let tiers = StaticTierResolver::new(SourceTier::Minor)
        .with_source("reuters.com", SourceTier::Major)
        .with_source("bloomberg.com", SourceTier::Major)
        .with_source("wsj.com", SourceTier::Major);
    ClusterStore::new(config, Arc::new(tiers), Arc::new(StaticCalendar::new()))
}

fn pump_article(id: &str, source: &str, ts: i64) -> Article {
    ArticleBuilder::new()
        .id(id)
        .ticker("XYZ")
        .title("Xyz Pharma set to soar on secret breakthrough deal")
        .content("Tiny Xyz Pharma set to soar after secret breakthrough deal with major partner insiders say.")
        .source(source)
        .published_at(ts)
        .build()
}

/// Seed a manipulation-shaped cluster: three minor copycats seconds apart.
async fn seed_attack(store: &ClusterStore) {
    for (i, src) in ["blog-one.net", "blog-two.net", "blog-three.net"]
        .iter()
        .enumerate()
    {
        let ts = T0 + i as i64 * 1_000;
        store
            .ingest(pump_article(&format!("p-{i}"), src, ts), ts)
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn sweep_releases_expired_cooldown_and_reclassifies() {
    // max_age beyond the 24h attack cooldown, so the cluster is not yet
    // idle-expired when the clamp lifts
    let config = GuardConfig {
        max_age_ms: 48 * HOUR_MS,
        ..GuardConfig::default()
    };
    let store = store_with(config);
    seed_attack(&store).await;

    // major-tier pickups during the cooldown lift diversity, but the
    // multiplier stays frozen at the attack's 0.0 intensity
    for (i, src) in ["reuters.com", "bloomberg.com", "wsj.com"].iter().enumerate() {
        let ts = T0 + 30_000 + i as i64 * 1_000;
        store
            .ingest(pump_article(&format!("m-{i}"), src, ts), ts)
            .await
            .unwrap();
    }
    let fingerprint = {
        let active = store.list_active(1, T0 + 60_000).await;
        assert_eq!(active.len(), 1);
        let cluster = &active[0];
        assert_eq!(cluster.confidence_multiplier, Some(0.0), "still frozen");
        assert!(cluster.signals.diversity > 0.4);
        cluster.fingerprint.clone()
    };

    let mut updates = store.subscribe();
    let stats = store.sweep(T0 + 25 * HOUR_MS).await;
    assert_eq!(stats.released_cooldowns, 1);

    // recycled wording across a sub-minute burst still reads as suspicious,
    // but the released clamp lets the rule's own multiplier through
    let cluster = store.get(&fingerprint).await.unwrap();
    assert_eq!(cluster.verdict, Verdict::SuspiciousBurst);
    assert_eq!(cluster.confidence_multiplier, Some(0.3));

    let event = updates.recv().await.unwrap();
    assert_eq!(event.fingerprint, fingerprint);
    assert_eq!(event.confidence_multiplier, Some(0.3));
}

#[tokio::test]
async fn sweep_evicts_idle_clusters() {
    let store = store_with(GuardConfig::default());
    let cluster = store
        .ingest(pump_article("p-1", "blog-one.net", T0), T0)
        .await
        .unwrap();
    assert_eq!(cluster.verdict, Verdict::Pending);

    let stats = store.sweep(T0 + 25 * HOUR_MS).await;
    assert_eq!(stats.evicted, 1);
    assert_eq!(stats.released_cooldowns, 0);
    assert!(store.get(&cluster.fingerprint).await.is_none());
    assert_eq!(store.stats().await.total_clusters, 0);
}

#[tokio::test]
async fn idle_adverse_cluster_evicted_once_cooldown_lapses() {
    let store = store_with(GuardConfig::default());
    seed_attack(&store).await;
    assert_eq!(
        store.list_by_verdict(Verdict::ManipulationAttack).await.len(),
        1
    );

    // past both the 24h cooldown and max_age with no new members: the
    // release must not re-cool the cluster and keep it resident forever
    let stats = store.sweep(T0 + 25 * HOUR_MS).await;
    assert_eq!(stats.released_cooldowns, 1);
    assert_eq!(stats.evicted, 1);
    assert_eq!(store.stats().await.total_clusters, 0);

    // repeated sweeps over the following week stay empty
    for day in 2..=7 {
        let stats = store.sweep(T0 + day * 24 * HOUR_MS).await;
        assert_eq!(stats, newsguard_engine::store::SweepStats::default());
    }
    assert_eq!(store.stats().await.total_clusters, 0);
}

#[tokio::test]
async fn cooling_cluster_outlives_max_age() {
    let config = GuardConfig {
        max_age_ms: HOUR_MS,
        ..GuardConfig::default()
    };
    let store = store_with(config);
    seed_attack(&store).await;

    // idle past max_age, but the 24h manipulation cooldown is still running
    let stats = store.sweep(T0 + 2 * HOUR_MS).await;
    assert_eq!(stats.evicted, 0);
    assert_eq!(stats.released_cooldowns, 0);

    let active = store.list_by_verdict(Verdict::ManipulationAttack).await;
    assert_eq!(active.len(), 1);
    assert!(active[0].is_cooling(T0 + 2 * HOUR_MS));
}

#[tokio::test]
async fn background_sweeper_evicts_on_schedule() {
    let config = GuardConfig {
        max_age_ms: 100,
        sweep_interval_ms: 20,
        ..GuardConfig::default()
    };
    let store = Arc::new(store_with(config));

    let now = epoch_ms_now();
    store
        .ingest(pump_article("p-1", "blog-one.net", now), now)
        .await
        .unwrap();
    assert_eq!(store.stats().await.total_clusters, 1);

    let sweeper = CooldownManager::start(store.clone());
    tokio::time::sleep(tokio::time::Duration::from_millis(500)).await;
    sweeper.stop().await;

    assert_eq!(store.stats().await.total_clusters, 0);
}
