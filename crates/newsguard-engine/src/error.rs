//! Engine error types

use thiserror::Error;

use newsguard_core::article::ArticleError;

/// Errors surfaced by external resolver adapters.
#[derive(Debug, Clone, Error)]
pub enum ResolverError {
    /// The resolver did not answer within the bounded timeout
    #[error("resolver timed out")]
    Timeout,

    /// The backing service reported a failure
    #[error("resolver backend error: {0}")]
    Backend(String),

    /// The resolver is not wired up / permanently unavailable
    #[error("resolver unavailable")]
    Unavailable,
}

/// Errors that can occur during article ingestion.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Article failed boundary validation; it never reached the store
    #[error("invalid article: {0}")]
    InvalidArticle(#[from] ArticleError),

    /// Concurrent-mutation conflict persisted across the retry; the update
    /// was skipped (fail-open)
    #[error("persistent mutation conflict on cluster {fingerprint}")]
    Conflict { fingerprint: String },

    /// The store has been shut down
    #[error("store is shut down")]
    Shutdown,
}

/// Result type for ingestion operations.
pub type IngestResult<T> = Result<T, IngestError>;
