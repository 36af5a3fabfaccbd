//! NewsGuard Runtime Engine
//!
//! Async layer around the pure `newsguard-core` kernel: a sharded cluster
//! store with per-fingerprint serialized mutation, bounded-timeout adapters
//! for the source-reputation and economic-calendar services, a broadcast of
//! cluster update events, and a cancellable cooldown/eviction sweeper.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use newsguard_core::article::{ArticleBuilder, SourceTier};
//! use newsguard_core::config::GuardConfig;
//! use newsguard_engine::resolver::{StaticCalendar, StaticTierResolver};
//! use newsguard_engine::store::{epoch_ms_now, ClusterStore};
//! use newsguard_engine::sweeper::CooldownManager;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(ClusterStore::new(
//!     GuardConfig::default(),
//!     Arc::new(StaticTierResolver::new(SourceTier::Minor)),
//!     Arc::new(StaticCalendar::new()),
//! ));
//! let sweeper = CooldownManager::start(store.clone());
//!
//! let article = ArticleBuilder::new()
//!     .id("a-1")
//!     .ticker("AAPL")
//!     .title("Apple beats earnings estimates")
//!     .source("reuters.com")
//!     .published_at(epoch_ms_now())
//!     .build();
//! let cluster = store.ingest(article, epoch_ms_now()).await?;
//! println!("{} -> {}", cluster.fingerprint, cluster.verdict);
//!
//! sweeper.stop().await;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod resolver;
pub mod store;
pub mod sweeper;
pub mod telemetry;

// Re-export main types at crate root
pub use error::{IngestError, IngestResult, ResolverError};
pub use resolver::{
    EventCalendarResolver, SourceTierResolver, StaticCalendar, StaticTierResolver, DEGRADED_TIER,
};
pub use store::{epoch_ms_now, ClusterStore, StoreStats, SweepStats};
pub use sweeper::CooldownManager;
