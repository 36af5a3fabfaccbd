//! NewsGuard Core Engine
//!
//! Pure computational kernel for real-time news-cluster fraud scoring:
//! fingerprinting, the four trust signals, verdict classification, and the
//! NFPI suspicion index. No I/O, no clocks, no hidden state; every function
//! is deterministic over its inputs, which is what makes the verdict
//! pipeline reproducible and testable.
//!
//! # Example
//!
//! ```rust
//! use newsguard_core::article::ArticleBuilder;
//! use newsguard_core::fingerprint::FingerprintGenerator;
//!
//! let article = ArticleBuilder::new()
//!     .id("a-1")
//!     .ticker("AAPL")
//!     .title("Apple beats earnings estimates")
//!     .content("Apple reported quarterly revenue above expectations.")
//!     .source("reuters.com")
//!     .published_at(1_704_067_200_000)
//!     .build();
//!
//! let generator = FingerprintGenerator::default();
//! let fingerprint = generator.fingerprint(&article);
//! assert_eq!(fingerprint, generator.fingerprint(&article.clone()));
//! ```

pub mod article;
pub mod cluster;
pub mod config;
pub mod fingerprint;
pub mod nfpi;
pub mod signal;
pub mod similarity;
pub mod verdict;

// Re-export main types at crate root
pub use article::{Article, ArticleBuilder, ArticleError, SourceTier};
pub use cluster::{Cluster, ClusterUpdateEvent, MAX_MULTIPLIER};
pub use config::{GuardConfig, TemporalThresholds};
pub use fingerprint::{Fingerprint, FingerprintGenerator};
pub use nfpi::{nfpi_band, nfpi_score, NfpiBand};
pub use signal::{
    diversity_score, match_event, narrative_score, temporal_shape, EventKind, EventMatch,
    ResolvedMember, ScheduledEvent, SignalCalculator, SignalSnapshot, TemporalShape,
};
pub use verdict::{classify, Outcome, RuleInput, Verdict, VerdictRule, RULES};
