//! Verdict classification
//!
//! An ordered list of predicate rules evaluated over the four signals; the
//! first matching rule wins. The rule table is total: the trailing catch-all
//! accepts anything the earlier rules rejected, so every reachable signal
//! combination produces exactly one verdict.

use serde::{Deserialize, Serialize};

use crate::signal::SignalSnapshot;

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 3_600_000;

/// Trust classification of a cluster.
///
/// Closed set, matched exhaustively everywhere; adding a member forces every
/// consumer site to be updated. `Noise` and `Watch` are reserved for
/// downstream consumers (manual overrides, watchlists) and are not produced
/// by the rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// Below minimum cluster size; no multiplier exposed
    Pending,
    /// Scheduled-event coverage (earnings, FOMC, ...); trusted fast
    EmbargoEvent,
    /// Coordinated manipulation across low-tier copycat sources
    ManipulationAttack,
    /// Machine-like burst or weak sourcing; treat with caution
    SuspiciousBurst,
    /// Broad, independently worded pickup
    OrganicConsensus,
    /// Fast-moving story with no adverse markers
    ViralTrend,
    /// Narrow low-diversity push with recycled text
    PrCampaign,
    /// Discarded as market-irrelevant chatter
    Noise,
    /// Flagged for observation without a trust decision
    Watch,
}

impl Verdict {
    /// All members, for exhaustive enumeration in queries and tests.
    pub fn all() -> [Verdict; 9] {
        [
            Self::Pending,
            Self::EmbargoEvent,
            Self::ManipulationAttack,
            Self::SuspiciousBurst,
            Self::OrganicConsensus,
            Self::ViralTrend,
            Self::PrCampaign,
            Self::Noise,
            Self::Watch,
        ]
    }

    /// Whether this verdict suppresses downstream confidence via cooldown.
    pub fn is_adverse(&self) -> bool {
        matches!(
            self,
            Self::ManipulationAttack | Self::SuspiciousBurst | Self::PrCampaign
        )
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::EmbargoEvent => write!(f, "embargo_event"),
            Self::ManipulationAttack => write!(f, "manipulation_attack"),
            Self::SuspiciousBurst => write!(f, "suspicious_burst"),
            Self::OrganicConsensus => write!(f, "organic_consensus"),
            Self::ViralTrend => write!(f, "viral_trend"),
            Self::PrCampaign => write!(f, "pr_campaign"),
            Self::Noise => write!(f, "noise"),
            Self::Watch => write!(f, "watch"),
        }
    }
}

/// Everything a rule predicate may look at.
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    pub signals: &'a SignalSnapshot,
    pub member_count: usize,
    pub min_cluster_size: usize,
}

/// One (predicate, outcome) pair in the ordered rule table.
pub struct VerdictRule {
    pub name: &'static str,
    pub verdict: Verdict,
    /// None means no multiplier is exposed downstream (Pending only)
    pub multiplier: Option<f64>,
    /// Cooldown duration applied when this rule fires
    pub cooldown_ms: Option<i64>,
    predicate: fn(&RuleInput) -> bool,
}

impl VerdictRule {
    pub fn matches(&self, input: &RuleInput) -> bool {
        (self.predicate)(input)
    }
}

fn below_min_size(input: &RuleInput) -> bool {
    input.member_count < input.min_cluster_size
}

fn embargo_event(input: &RuleInput) -> bool {
    input.signals.event_match && input.signals.event_confidence > 0.7
}

fn manipulation_attack(input: &RuleInput) -> bool {
    let s = input.signals;
    s.diversity < 0.4 && s.narrative < 0.4 && s.temporal < -0.5
}

fn suspicious_burst(input: &RuleInput) -> bool {
    let s = input.signals;
    s.temporal < -0.6 || (s.diversity < 0.5 && s.narrative < 0.5)
}

fn pr_campaign(input: &RuleInput) -> bool {
    let s = input.signals;
    s.diversity < 0.3 && s.narrative < 0.4
}

fn organic_consensus(input: &RuleInput) -> bool {
    let s = input.signals;
    s.diversity > 0.7 && s.narrative > 0.6
}

fn catch_all(_input: &RuleInput) -> bool {
    true
}

/// The ordered rule table. First match wins; order is part of the contract.
pub static RULES: &[VerdictRule] = &[
    VerdictRule {
        name: "below_min_cluster_size",
        verdict: Verdict::Pending,
        multiplier: None,
        cooldown_ms: None,
        predicate: below_min_size,
    },
    VerdictRule {
        name: "scheduled_event_coverage",
        verdict: Verdict::EmbargoEvent,
        multiplier: Some(1.5),
        cooldown_ms: None,
        predicate: embargo_event,
    },
    VerdictRule {
        name: "coordinated_manipulation",
        verdict: Verdict::ManipulationAttack,
        multiplier: Some(0.0),
        cooldown_ms: Some(24 * HOUR_MS),
        predicate: manipulation_attack,
    },
    VerdictRule {
        name: "suspicious_burst",
        verdict: Verdict::SuspiciousBurst,
        multiplier: Some(0.3),
        cooldown_ms: Some(30 * MINUTE_MS),
        predicate: suspicious_burst,
    },
    VerdictRule {
        name: "pr_campaign",
        verdict: Verdict::PrCampaign,
        multiplier: Some(0.5),
        cooldown_ms: Some(6 * HOUR_MS),
        predicate: pr_campaign,
    },
    VerdictRule {
        name: "organic_consensus",
        verdict: Verdict::OrganicConsensus,
        multiplier: Some(1.2),
        cooldown_ms: None,
        predicate: organic_consensus,
    },
    VerdictRule {
        name: "viral_trend",
        verdict: Verdict::ViralTrend,
        multiplier: Some(1.0),
        cooldown_ms: None,
        predicate: catch_all,
    },
];

/// Outcome of classifying a cluster's current signals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub verdict: Verdict,
    /// None while Pending
    pub multiplier: Option<f64>,
    pub cooldown_ms: Option<i64>,
    pub rule_name: &'static str,
    /// Human-readable rule name plus the signal values that triggered it
    pub reason: String,
}

/// Evaluate the rule table; the first matching rule decides.
pub fn classify(input: &RuleInput) -> Outcome {
    let rule = RULES
        .iter()
        .find(|r| r.matches(input))
        .unwrap_or(&RULES[RULES.len() - 1]); // catch-all makes this unreachable

    let s = input.signals;
    let reason = if rule.verdict == Verdict::Pending {
        format!(
            "{}: members={} < min={}",
            rule.name, input.member_count, input.min_cluster_size
        )
    } else {
        format!(
            "{}: DI={:.2} TN={:.2} NI={:.2} EL={}({:.2})",
            rule.name, s.diversity, s.temporal, s.narrative, s.event_match, s.event_confidence
        )
    };

    Outcome {
        verdict: rule.verdict,
        multiplier: rule.multiplier,
        cooldown_ms: rule.cooldown_ms,
        rule_name: rule.name,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn signals(di: f64, tn: f64, ni: f64, el: bool, el_conf: f64) -> SignalSnapshot {
        SignalSnapshot {
            diversity: di,
            temporal: tn,
            narrative: ni,
            event_match: el,
            event_confidence: el_conf,
            event_name: None,
            degraded: false,
        }
    }

    fn classify_sized(s: &SignalSnapshot, members: usize) -> Outcome {
        classify(&RuleInput {
            signals: s,
            member_count: members,
            min_cluster_size: 2,
        })
    }

    #[test]
    fn below_min_size_is_pending_without_multiplier() {
        let s = signals(1.0, 0.8, 1.0, true, 1.0);
        let out = classify_sized(&s, 1);
        assert_eq!(out.verdict, Verdict::Pending);
        assert_eq!(out.multiplier, None);
        assert_eq!(out.cooldown_ms, None);
        assert!(out.reason.contains("members=1"));
    }

    #[test]
    fn strong_event_match_wins_over_everything() {
        // even a manipulation-looking profile is trusted when the calendar
        // confirms a scheduled event above 0.7 confidence
        let s = signals(0.2, -0.8, 0.1, true, 0.95);
        let out = classify_sized(&s, 3);
        assert_eq!(out.verdict, Verdict::EmbargoEvent);
        assert_eq!(out.multiplier, Some(1.5));
    }

    #[test]
    fn weak_event_match_does_not_shortcut() {
        let s = signals(0.2, -0.8, 0.1, true, 0.5);
        let out = classify_sized(&s, 3);
        assert_eq!(out.verdict, Verdict::ManipulationAttack);
    }

    #[test]
    fn manipulation_attack_zeroes_confidence() {
        let s = signals(0.29, -0.8, 0.0, false, 0.0);
        let out = classify_sized(&s, 3);
        assert_eq!(out.verdict, Verdict::ManipulationAttack);
        assert_eq!(out.multiplier, Some(0.0));
        assert_eq!(out.cooldown_ms, Some(24 * HOUR_MS));
        assert!(out.reason.contains("coordinated_manipulation"));
    }

    #[test]
    fn burst_without_copy_text_is_suspicious() {
        // fast burst but diverse sourcing and distinct wording
        let s = signals(0.8, -0.8, 0.9, false, 0.0);
        let out = classify_sized(&s, 3);
        assert_eq!(out.verdict, Verdict::SuspiciousBurst);
        assert_eq!(out.multiplier, Some(0.3));
        assert_eq!(out.cooldown_ms, Some(30 * MINUTE_MS));
    }

    #[test]
    fn weak_sourcing_with_recycled_text_is_suspicious() {
        // DI<0.5 and NI<0.5 arm of rule 4, temporal neutral
        let s = signals(0.45, 0.3, 0.45, false, 0.0);
        let out = classify_sized(&s, 3);
        assert_eq!(out.verdict, Verdict::SuspiciousBurst);
    }

    #[test]
    fn pr_campaign_condition_is_shadowed_by_burst_rule() {
        // every DI<0.3, NI<0.4 profile also satisfies rule 4's
        // (DI<0.5 && NI<0.5) arm, so the burst rule fires first.
        // Table order is the contract; this pins the shadowing down.
        let s = signals(0.29, 0.3, 0.39, false, 0.0);
        let out = classify_sized(&s, 3);
        assert_eq!(out.verdict, Verdict::SuspiciousBurst);
        let campaign = RULES.iter().find(|r| r.name == "pr_campaign").unwrap();
        assert!(campaign.matches(&RuleInput {
            signals: &s,
            member_count: 3,
            min_cluster_size: 2,
        }));
    }

    #[test]
    fn organic_consensus_for_broad_independent_pickup() {
        let s = signals(0.9, 0.5, 0.85, false, 0.0);
        let out = classify_sized(&s, 4);
        assert_eq!(out.verdict, Verdict::OrganicConsensus);
        assert_eq!(out.multiplier, Some(1.2));
        assert_eq!(out.cooldown_ms, None);
    }

    #[test]
    fn everything_else_is_viral_trend() {
        let s = signals(0.6, 0.3, 0.55, false, 0.0);
        let out = classify_sized(&s, 3);
        assert_eq!(out.verdict, Verdict::ViralTrend);
        assert_eq!(out.multiplier, Some(1.0));
    }

    #[test]
    fn reason_names_rule_and_signal_values() {
        let s = signals(0.29, -0.8, 0.0, false, 0.0);
        let out = classify_sized(&s, 3);
        assert!(out.reason.contains("DI=0.29"));
        assert!(out.reason.contains("TN=-0.80"));
        assert!(out.reason.contains("NI=0.00"));
    }

    #[test]
    fn table_is_total_over_signal_grid() {
        // every reachable combination fires at least one rule, and classify
        // picks the first; enumerate a dense grid over all four signals
        let steps: Vec<f64> = (0..=10).map(|i| i as f64 / 10.0).collect();
        for &di in &steps {
            for tn_i in -10..=10 {
                let tn = tn_i as f64 / 10.0;
                for &ni in &steps {
                    for el in [false, true] {
                        for &conf in &[0.0, 0.5, 0.71, 1.0] {
                            let s = signals(di, tn, ni, el, conf);
                            for members in [0, 1, 2, 5] {
                                let input = RuleInput {
                                    signals: &s,
                                    member_count: members,
                                    min_cluster_size: 2,
                                };
                                let matching: Vec<&VerdictRule> =
                                    RULES.iter().filter(|r| r.matches(&input)).collect();
                                assert!(
                                    !matching.is_empty(),
                                    "no rule for DI={di} TN={tn} NI={ni} EL={el}/{conf}"
                                );
                                let out = classify(&input);
                                assert_eq!(out.verdict, matching[0].verdict);
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn noise_and_watch_never_produced_by_table() {
        for rule in RULES {
            assert_ne!(rule.verdict, Verdict::Noise);
            assert_ne!(rule.verdict, Verdict::Watch);
        }
    }

    #[test]
    fn verdict_display_roundtrip_is_stable() {
        for v in Verdict::all() {
            assert!(!v.to_string().is_empty());
        }
        assert_eq!(Verdict::ManipulationAttack.to_string(), "manipulation_attack");
    }
}
