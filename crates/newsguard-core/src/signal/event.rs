//! Event legitimacy signal
//!
//! Checks whether a scheduled calendar event (earnings, FOMC, CPI, ...)
//! plausibly explains a cluster's timing and theme. A synchronized burst of
//! coverage right at an earnings release is legitimate; the same burst with
//! no calendar entry behind it is not.

use serde::{Deserialize, Serialize};

/// Kinds of scheduled market events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    Earnings,
    Fomc,
    Cpi,
    Nfp,
    Gdp,
    /// Anything the calendar carries that has no dedicated lexicon
    Other(String),
}

impl EventKind {
    /// Theme keywords that indicate coverage of this event kind.
    fn lexicon(&self) -> &'static [&'static str] {
        match self {
            Self::Earnings => &[
                "earnings", "eps", "revenue", "guidance", "quarter", "quarterly", "results",
                "profit",
            ],
            Self::Fomc => &["fed", "fomc", "rate", "rates", "powell", "monetary", "fedfunds"],
            Self::Cpi => &["cpi", "inflation", "prices", "price"],
            Self::Nfp => &["payrolls", "jobs", "nfp", "employment", "unemployment", "hiring"],
            Self::Gdp => &["gdp", "growth", "economy", "output"],
            Self::Other(_) => &[],
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Earnings => write!(f, "earnings"),
            Self::Fomc => write!(f, "fomc"),
            Self::Cpi => write!(f, "cpi"),
            Self::Nfp => write!(f, "nfp"),
            Self::Gdp => write!(f, "gdp"),
            Self::Other(name) => write!(f, "other:{name}"),
        }
    }
}

/// A calendar entry returned by the event resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub name: String,
    pub scheduled_at_ms: i64,
    pub kind: EventKind,
}

/// Result of matching a cluster against calendar events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMatch {
    pub matched: bool,
    pub confidence: f64,
    pub event_name: Option<String>,
}

impl EventMatch {
    pub fn none() -> Self {
        Self {
            matched: false,
            confidence: 0.0,
            event_name: None,
        }
    }
}

/// Weight of time proximity vs theme affinity in the match confidence.
const TIME_WEIGHT: f64 = 0.6;
const THEME_WEIGHT: f64 = 0.4;
/// Affinity granted on time proximity alone, without a theme hit.
const TIME_ONLY_AFFINITY: f64 = 0.3;
/// Jaro-Winkler floor for fuzzy event-name vs theme matching.
const NAME_MATCH_FLOOR: f64 = 0.85;

/// Score calendar events against a cluster's first-seen time and theme
/// keywords; the best-scoring event above `threshold` becomes the match.
pub fn match_event(
    events: &[ScheduledEvent],
    first_seen_ms: i64,
    theme_keywords: &[String],
    tolerance_ms: i64,
    threshold: f64,
) -> EventMatch {
    let mut best: Option<(f64, &ScheduledEvent)> = None;

    for event in events {
        let delta = (event.scheduled_at_ms - first_seen_ms).abs();
        if delta > tolerance_ms {
            continue;
        }
        let time_proximity = 1.0 - (delta as f64 / tolerance_ms as f64);
        let affinity = theme_affinity(event, theme_keywords);
        let score = TIME_WEIGHT * time_proximity + THEME_WEIGHT * affinity;

        if best.map_or(true, |(b, _)| score > b) {
            best = Some((score, event));
        }
    }

    match best {
        Some((score, event)) if score > threshold => EventMatch {
            matched: true,
            confidence: score.clamp(0.0, 1.0),
            event_name: Some(event.name.clone()),
        },
        _ => EventMatch::none(),
    }
}

/// How well the cluster's theme fits the event: full credit on a lexicon hit
/// or a fuzzy event-name match, partial credit on timing alone.
fn theme_affinity(event: &ScheduledEvent, theme_keywords: &[String]) -> f64 {
    let lexicon = event.kind.lexicon();
    if theme_keywords
        .iter()
        .any(|kw| lexicon.contains(&kw.as_str()))
    {
        return 1.0;
    }

    let theme = theme_keywords.join(" ");
    if !theme.is_empty()
        && strsim::jaro_winkler(&event.name.to_lowercase(), &theme) >= NAME_MATCH_FLOOR
    {
        return 1.0;
    }

    TIME_ONLY_AFFINITY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::tokenize;

    const TOLERANCE: i64 = 7_200_000; // 2 hours
    const THRESHOLD: f64 = 0.5;
    const T0: i64 = 1_700_000_000_000;

    fn earnings(name: &str, at: i64) -> ScheduledEvent {
        ScheduledEvent {
            name: name.to_string(),
            scheduled_at_ms: at,
            kind: EventKind::Earnings,
        }
    }

    #[test]
    fn no_events_no_match() {
        let m = match_event(&[], T0, &tokenize("apple earnings"), TOLERANCE, THRESHOLD);
        assert_eq!(m, EventMatch::none());
    }

    #[test]
    fn exact_time_with_theme_hit_is_high_confidence() {
        let events = vec![earnings("AAPL Q1 earnings", T0)];
        let m = match_event(
            &events,
            T0,
            &tokenize("apple quarterly earnings beat estimates"),
            TOLERANCE,
            THRESHOLD,
        );
        assert!(m.matched);
        assert!(m.confidence >= 0.9, "confidence={}", m.confidence);
        assert_eq!(m.event_name.as_deref(), Some("AAPL Q1 earnings"));
    }

    #[test]
    fn event_outside_tolerance_ignored() {
        let events = vec![earnings("AAPL Q1 earnings", T0 + TOLERANCE + 1)];
        let m = match_event(
            &events,
            T0,
            &tokenize("apple earnings beat"),
            TOLERANCE,
            THRESHOLD,
        );
        assert!(!m.matched);
    }

    #[test]
    fn unrelated_theme_far_in_window_fails_threshold() {
        // 90% of the way out the tolerance window, no theme overlap:
        // 0.6*0.1 + 0.4*0.3 = 0.18 < 0.5
        let events = vec![earnings("AAPL Q1 earnings", T0 + (TOLERANCE / 10) * 9)];
        let m = match_event(
            &events,
            T0,
            &tokenize("celebrity spotted leaving restaurant"),
            TOLERANCE,
            THRESHOLD,
        );
        assert!(!m.matched);
    }

    #[test]
    fn best_of_multiple_events_wins() {
        let events = vec![
            earnings("MSFT earnings", T0 + TOLERANCE / 2),
            earnings("AAPL Q1 earnings", T0),
        ];
        let m = match_event(
            &events,
            T0,
            &tokenize("quarterly earnings beat"),
            TOLERANCE,
            THRESHOLD,
        );
        assert!(m.matched);
        assert_eq!(m.event_name.as_deref(), Some("AAPL Q1 earnings"));
    }

    #[test]
    fn fomc_lexicon_matches_rate_coverage() {
        let events = vec![ScheduledEvent {
            name: "FOMC statement".to_string(),
            scheduled_at_ms: T0,
            kind: EventKind::Fomc,
        }];
        let m = match_event(
            &events,
            T0 + 600_000,
            &tokenize("fed holds rates steady powell presser"),
            TOLERANCE,
            THRESHOLD,
        );
        assert!(m.matched);
        assert!(m.confidence > 0.9, "confidence={}", m.confidence);
    }

    #[test]
    fn other_kind_relies_on_name_similarity() {
        let events = vec![ScheduledEvent {
            name: "opec production meeting".to_string(),
            scheduled_at_ms: T0,
            kind: EventKind::Other("opec".to_string()),
        }];
        let m = match_event(
            &events,
            T0,
            &tokenize("opec production meeting outcome"),
            TOLERANCE,
            THRESHOLD,
        );
        assert!(m.matched, "name similarity should carry the match");
    }
}
