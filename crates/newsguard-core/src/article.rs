//! Article type definitions

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for incoming articles.
///
/// Articles failing validation are rejected at the ingestion boundary and
/// never reach the cluster store.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArticleError {
    /// Article has no ticker symbol
    #[error("article '{0}' is missing a ticker")]
    MissingTicker(String),

    /// Article has no title
    #[error("article '{0}' is missing a title")]
    MissingTitle(String),

    /// Article has no id
    #[error("article is missing an id")]
    MissingId,

    /// Sentiment outside [-1, 1]
    #[error("article '{id}' has sentiment {value} outside [-1, 1]")]
    SentimentOutOfRange { id: String, value: f64 },
}

/// A normalized financial news article.
///
/// Produced by an external ingestion/crawling component; immutable once
/// ingested. Timestamps are Unix milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Stable article identifier from the feed
    pub id: String,

    /// Ticker symbol the story is about (e.g. "AAPL")
    pub ticker: String,

    /// Headline
    pub title: String,

    /// Body text (may be empty for headline-only feeds)
    #[serde(default)]
    pub content: String,

    /// Publishing outlet identifier (e.g. "reuters.com")
    pub source: String,

    /// Publication time (Unix timestamp milliseconds)
    pub published_at_ms: i64,

    /// Optional feed-supplied sentiment in [-1, 1]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<f64>,
}

impl Article {
    /// Validate the article at the ingestion boundary.
    ///
    /// Returns the first violation found; a valid article returns `Ok(())`.
    pub fn validate(&self) -> Result<(), ArticleError> {
        if self.id.trim().is_empty() {
            return Err(ArticleError::MissingId);
        }
        if self.ticker.trim().is_empty() {
            return Err(ArticleError::MissingTicker(self.id.clone()));
        }
        if self.title.trim().is_empty() {
            return Err(ArticleError::MissingTitle(self.id.clone()));
        }
        if let Some(s) = self.sentiment {
            if !(-1.0..=1.0).contains(&s) || s.is_nan() {
                return Err(ArticleError::SentimentOutOfRange {
                    id: self.id.clone(),
                    value: s,
                });
            }
        }
        Ok(())
    }

    /// Title and content joined, the text the fingerprint and narrative
    /// signal operate on.
    pub fn text(&self) -> String {
        if self.content.trim().is_empty() {
            self.title.clone()
        } else {
            format!("{} {}", self.title, self.content)
        }
    }
}

impl Default for Article {
    fn default() -> Self {
        Self {
            id: String::new(),
            ticker: String::new(),
            title: String::new(),
            content: String::new(),
            source: String::new(),
            published_at_ms: 0,
            sentiment: None,
        }
    }
}

/// Builder for constructing articles.
#[derive(Debug, Default)]
pub struct ArticleBuilder {
    article: Article,
}

impl ArticleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.article.id = id.into();
        self
    }

    pub fn ticker(mut self, ticker: impl Into<String>) -> Self {
        self.article.ticker = ticker.into();
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.article.title = title.into();
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.article.content = content.into();
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.article.source = source.into();
        self
    }

    pub fn published_at(mut self, ts_ms: i64) -> Self {
        self.article.published_at_ms = ts_ms;
        self
    }

    pub fn sentiment(mut self, sentiment: f64) -> Self {
        self.article.sentiment = Some(sentiment);
        self
    }

    pub fn build(self) -> Article {
        self.article
    }
}

/// Source reputation tiers
///
/// Higher tiers indicate more trustworthy outlets. Used by the diversity
/// signal to weight each member article's source.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[repr(u8)]
pub enum SourceTier {
    /// Social media, forums, anonymous blogs (lowest trust)
    Social = 0,
    /// Smaller outlets, aggregators, PR wires
    #[default]
    Minor = 1,
    /// Established wire services and financial press (highest trust)
    Major = 2,
}

impl SourceTier {
    /// Diversity weight for this tier.
    pub fn weight(&self) -> f64 {
        match self {
            Self::Major => 2.0,
            Self::Minor => 0.5,
            Self::Social => 0.1,
        }
    }
}

impl std::fmt::Display for SourceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Major => write!(f, "major"),
            Self::Minor => write!(f, "minor"),
            Self::Social => write!(f, "social"),
        }
    }
}
