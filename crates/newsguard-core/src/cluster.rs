//! Cluster state and cooldown semantics
//!
//! A cluster is a time-bounded set of articles sharing a fingerprint. The
//! store owns all mutation; everything here is the data model plus the pure
//! state-transition logic (append, verdict application, cooldown clamping)
//! so the transition rules are testable without a runtime.

use serde::{Deserialize, Serialize};

use crate::article::Article;
use crate::fingerprint::Fingerprint;
use crate::signal::SignalSnapshot;
use crate::verdict::{Outcome, Verdict};

/// Multiplier ceiling; also the no-clamp sentinel for cooling intensity.
pub const MAX_MULTIPLIER: f64 = 1.5;

/// A time-bounded group of near-duplicate articles about one ticker/story.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    pub fingerprint: Fingerprint,
    pub ticker: String,
    /// Free-text theme from the seed article's keywords
    pub theme: String,
    /// Keyword set used for event-affinity scoring
    pub theme_keywords: Vec<String>,
    pub first_seen_ms: i64,
    pub last_seen_ms: i64,
    /// Member articles in arrival order
    pub members: Vec<Article>,
    pub signals: SignalSnapshot,
    pub verdict: Verdict,
    pub verdict_reason: String,
    /// None while Pending
    pub confidence_multiplier: Option<f64>,
    /// Multiplier ceiling frozen at cooldown start; MAX_MULTIPLIER when idle
    pub cooling_intensity: f64,
    /// Cooldown deadline; None when no cooldown is active
    pub cooling_until_ms: Option<i64>,
    /// Suspicion index in [0, 100]
    pub nfpi: f64,
    /// Monotone mutation counter, used as a defensive conflict guard
    pub revision: u64,
}

impl Cluster {
    /// Seed a new cluster from its first article.
    pub fn seed(
        fingerprint: Fingerprint,
        article: Article,
        theme: String,
        theme_keywords: Vec<String>,
    ) -> Self {
        let ts = article.published_at_ms;
        Self {
            fingerprint,
            ticker: article.ticker.clone(),
            theme,
            theme_keywords,
            first_seen_ms: ts,
            last_seen_ms: ts,
            members: vec![article],
            signals: SignalSnapshot::default(),
            verdict: Verdict::Pending,
            verdict_reason: String::new(),
            confidence_multiplier: None,
            cooling_intensity: MAX_MULTIPLIER,
            cooling_until_ms: None,
            nfpi: 0.0,
            revision: 0,
        }
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn contains(&self, article_id: &str) -> bool {
        self.members.iter().any(|m| m.id == article_id)
    }

    /// Append a member article.
    ///
    /// Idempotent on article id: re-ingesting a known id only refreshes
    /// `last_seen`. Returns whether the member set changed.
    pub fn append(&mut self, article: Article) -> bool {
        self.last_seen_ms = self.last_seen_ms.max(article.published_at_ms);
        if self.contains(&article.id) {
            return false;
        }
        self.first_seen_ms = self.first_seen_ms.min(article.published_at_ms);
        self.members.push(article);
        true
    }

    /// Whether a cooldown clamp is active at `now_ms`.
    pub fn is_cooling(&self, now_ms: i64) -> bool {
        self.cooling_until_ms.is_some_and(|until| now_ms < until)
    }

    /// Release an expired cooldown. Returns true if one was released.
    pub fn expire_cooldown(&mut self, now_ms: i64) -> bool {
        match self.cooling_until_ms {
            Some(until) if now_ms >= until => {
                self.cooling_until_ms = None;
                self.cooling_intensity = MAX_MULTIPLIER;
                true
            }
            _ => false,
        }
    }

    /// Commit a recompute: signals, verdict, multiplier, and NFPI together.
    ///
    /// The verdict and reason always refresh; while a cooldown is active the
    /// exposed multiplier is clamped to the intensity frozen at cooldown
    /// start. An adverse outcome during cooldown with a lower multiplier
    /// tightens the freeze and extends the deadline; a friendlier outcome
    /// never loosens it early.
    pub fn apply(
        &mut self,
        signals: SignalSnapshot,
        outcome: Outcome,
        nfpi: f64,
        now_ms: i64,
    ) {
        self.expire_cooldown(now_ms);

        if self.is_cooling(now_ms) {
            if let (Some(duration), Some(multiplier)) = (outcome.cooldown_ms, outcome.multiplier) {
                if multiplier < self.cooling_intensity {
                    self.cooling_intensity = multiplier;
                    let tightened = now_ms + duration;
                    self.cooling_until_ms = self
                        .cooling_until_ms
                        .map(|until| until.max(tightened))
                        .or(Some(tightened));
                }
            }
        } else if let (Some(duration), Some(multiplier)) = (outcome.cooldown_ms, outcome.multiplier)
        {
            self.cooling_until_ms = Some(now_ms + duration);
            self.cooling_intensity = multiplier;
        }

        let clamped = match (outcome.multiplier, self.cooling_until_ms) {
            (Some(m), Some(_)) => Some(m.min(self.cooling_intensity)),
            (multiplier, _) => multiplier,
        };

        self.signals = signals;
        self.nfpi = nfpi;
        self.verdict = outcome.verdict;
        self.verdict_reason = outcome.reason;
        self.confidence_multiplier = clamped;
        self.revision += 1;
    }

    /// Build the update event emitted after a committed mutation.
    pub fn update_event(&self) -> ClusterUpdateEvent {
        ClusterUpdateEvent {
            fingerprint: self.fingerprint.clone(),
            ticker: self.ticker.clone(),
            verdict: self.verdict,
            verdict_reason: self.verdict_reason.clone(),
            confidence_multiplier: self.confidence_multiplier,
            signals: self.signals.clone(),
            nfpi: self.nfpi,
            member_count: self.member_count(),
            revision: self.revision,
        }
    }
}

/// Emitted on every committed cluster mutation; consumed by the downstream
/// trading-signal pipeline and audit sinks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterUpdateEvent {
    pub fingerprint: Fingerprint,
    pub ticker: String,
    pub verdict: Verdict,
    pub verdict_reason: String,
    pub confidence_multiplier: Option<f64>,
    pub signals: SignalSnapshot,
    pub nfpi: f64,
    pub member_count: usize,
    pub revision: u64,
}
