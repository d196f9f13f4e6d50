//! Typed error taxonomy for the query pipeline.
//!
//! [`QueryError`] is the single terminal error for a request; every stage
//! maps its failure into one of its variants. Provider failures are
//! further classified into [`ProviderErrorKind`] sub-kinds so callers can
//! distinguish quota / credential / transient causes.

use thiserror::Error;

/// Terminal error for a single query request. Each variant corresponds to
/// the pipeline stage (or boundary) that failed.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Request rejected before any work — empty or oversized input.
    #[error("validation error: {0}")]
    Validation(String),

    /// The requested document id was not registered.
    #[error("document not found: {0}")]
    NotFound(String),

    /// Object storage could not produce the document bytes.
    #[error("storage error: {0}")]
    Storage(String),

    /// PDF text extraction failed.
    #[error("extraction error: {0}")]
    Extraction(String),

    /// The language-model provider failed; carries the classified cause.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// A database query failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// The classified cause of a [`ProviderError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// The account is out of quota / rate-limited (code `insufficient_quota`
    /// or HTTP 429).
    QuotaExceeded,
    /// The credentials were rejected (code `invalid_api_key` or HTTP
    /// 401/403).
    InvalidCredentials,
    /// A 2xx response was missing the expected answer content.
    MalformedResponse,
    /// Any other non-success status, network failure, or timeout.
    Unavailable,
}

impl std::fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ProviderErrorKind::QuotaExceeded => "quota exceeded",
            ProviderErrorKind::InvalidCredentials => "invalid credentials",
            ProviderErrorKind::MalformedResponse => "malformed response",
            ProviderErrorKind::Unavailable => "unavailable",
        };
        f.write_str(label)
    }
}

/// A provider failure: a sub-kind plus user-facing detail text.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct ProviderError {
    /// The classified cause.
    pub kind: ProviderErrorKind,
    /// User-facing detail text describing the failure.
    pub message: String,
}

impl ProviderError {
    /// Quota exhausted / rate-limited.
    pub fn quota_exceeded(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::QuotaExceeded,
            message: message.into(),
        }
    }

    /// Credentials rejected.
    pub fn invalid_credentials(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::InvalidCredentials,
            message: message.into(),
        }
    }

    /// A success response lacked the expected answer content.
    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::MalformedResponse,
            message: message.into(),
        }
    }

    /// Transient failure: other non-success status, network error, timeout.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::Unavailable,
            message: message.into(),
        }
    }
}
