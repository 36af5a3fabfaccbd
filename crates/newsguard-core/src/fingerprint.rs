//! Cluster fingerprinting
//!
//! Derives a stable cluster key from article text and ticker. Near-duplicate
//! stories from different sources should, with high probability, land on the
//! same fingerprint. The tokenizer, stop-word list, and hash are fixed:
//! changing any of them shifts every fingerprint, so they are treated as part
//! of the wire format.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::article::Article;

/// English stop-words stripped before keyword extraction. Kept deliberately
/// small and frozen; additions would drift fingerprints across deployments.
const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "from", "has", "have", "he",
    "her", "his", "in", "into", "is", "it", "its", "of", "on", "or", "said", "says", "she", "that",
    "the", "their", "this", "to", "was", "were", "will", "with",
];

/// Minimum usable tokens before falling back to title-only fingerprinting.
const MIN_CONTENT_TOKENS: usize = 3;

/// A stable cluster key.
///
/// Hex-encoded truncation of a SHA-256 digest over the ticker and the
/// article's top keywords. Collisions across unrelated stories are an
/// accepted false-grouping risk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Stable lane index for sharded mutation, derived from the leading
    /// digest bytes. Same fingerprint always maps to the same lane.
    pub fn lane(&self, shard_count: usize) -> usize {
        debug_assert!(shard_count > 0);
        let prefix = u64::from_str_radix(&self.0[..16.min(self.0.len())], 16).unwrap_or(0);
        (prefix % shard_count as u64) as usize
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lowercase, strip punctuation, split on whitespace, drop stop-words and
/// single-character fragments.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() > 1 && !STOP_WORDS.contains(t))
        .map(|t| t.to_string())
        .collect()
}

/// Top-K tokens by frequency, ties broken lexicographically so the result is
/// deterministic regardless of map iteration order.
pub fn top_keywords(tokens: &[String], k: usize) -> Vec<String> {
    let mut counts: ahash::AHashMap<&str, usize> = ahash::AHashMap::new();
    for t in tokens {
        *counts.entry(t.as_str()).or_insert(0) += 1;
    }
    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(k);
    // the keyword *set* is what matters, not the frequency order
    let mut keywords: Vec<String> = ranked.into_iter().map(|(t, _)| t.to_string()).collect();
    keywords.sort();
    keywords
}

/// Generates fingerprints with a fixed keyword budget.
#[derive(Debug, Clone)]
pub struct FingerprintGenerator {
    keyword_count: usize,
}

impl FingerprintGenerator {
    pub fn new(keyword_count: usize) -> Self {
        Self { keyword_count }
    }

    /// Derive the cluster fingerprint for an article.
    ///
    /// Content with fewer than [`MIN_CONTENT_TOKENS`] usable tokens is
    /// ignored entirely and the key derives from title tokens alone, so that
    /// headline-only feeds and trivial bodies cluster with each other.
    pub fn fingerprint(&self, article: &Article) -> Fingerprint {
        let tokens = if tokenize(&article.content).len() < MIN_CONTENT_TOKENS {
            tokenize(&article.title)
        } else {
            tokenize(&article.text())
        };
        let keywords = top_keywords(&tokens, self.keyword_count);

        let mut hasher = Sha256::new();
        hasher.update(article.ticker.trim().to_uppercase().as_bytes());
        for kw in &keywords {
            hasher.update(b"|");
            hasher.update(kw.as_bytes());
        }
        let digest = hasher.finalize();

        let mut hex = String::with_capacity(32);
        for byte in &digest[..16] {
            hex.push_str(&format!("{byte:02x}"));
        }
        Fingerprint(hex)
    }

    /// Human-readable theme for a cluster, taken from the seed article's
    /// keywords. Free text, not part of the key.
    pub fn theme(&self, article: &Article) -> String {
        let tokens = tokenize(&article.title);
        let keywords = top_keywords(&tokens, self.keyword_count.min(5));
        if keywords.is_empty() {
            article.title.clone()
        } else {
            keywords.join(" ")
        }
    }
}

impl Default for FingerprintGenerator {
    fn default() -> Self {
        Self::new(8)
    }
}
