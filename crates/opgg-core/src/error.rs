//! Error types for the OP.GG client.
//!
//! Upstream failures are classified once, at the response boundary, into the
//! variants below. Nothing in this crate retries on its own; callers can use
//! [`OpggError::is_retryable`] and [`OpggError::retry_after`] to build a retry
//! policy if they want one.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Maximum number of characters of a response body kept on HTTP errors.
pub const MAX_ERROR_BODY_CHARS: usize = 1000;

/// Maximum number of characters of an undecodable body kept on decode errors.
pub const MAX_DECODE_BODY_CHARS: usize = 500;

/// Main error type for the OP.GG client.
#[derive(Debug, Error)]
pub enum OpggError {
    // Classified upstream responses
    #[error("Resource not found at {url}")]
    NotFound { url: String, body: Option<String> },

    #[error("Rate limited by {url}, retry after {retry_after_secs:?} seconds")]
    RateLimited {
        url: String,
        retry_after_secs: Option<u64>,
        body: Option<String>,
    },

    #[error("Client error {status} from {url}")]
    ClientFault {
        status: u16,
        url: String,
        body: Option<String>,
    },

    #[error("Server error {status} from {url}")]
    ServerFault {
        status: u16,
        url: String,
        body: Option<String>,
    },

    #[error("Transport failure for {url}: {message}")]
    Transport {
        url: String,
        message: String,
        /// True when the request timed out rather than failing to connect.
        timed_out: bool,
    },

    #[error("Failed to decode JSON from {url}: {message}")]
    Decode {
        url: String,
        message: String,
        raw_body: Option<String>,
    },

    #[error("Invalid response structure from {url}: expected {expected}, got {got}")]
    ShapeMismatch {
        url: String,
        expected: String,
        got: String,
    },

    // Local store
    #[error("Cache error: {message}")]
    Cache {
        message: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    // Operation control
    #[error("Operation cancelled")]
    Cancelled,

    #[error("Operation exceeded its deadline of {0:?}")]
    DeadlineExceeded(Duration),

    // Setup and input
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid input for {field}: {message}")]
    InvalidInput { field: String, message: String },

    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },
}

/// Result type alias for OP.GG operations.
pub type Result<T> = std::result::Result<T, OpggError>;

impl From<rusqlite::Error> for OpggError {
    fn from(err: rusqlite::Error) -> Self {
        OpggError::Cache {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<std::io::Error> for OpggError {
    fn from(err: std::io::Error) -> Self {
        OpggError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for OpggError {
    fn from(err: serde_json::Error) -> Self {
        OpggError::Cache {
            message: format!("Failed to (de)serialize cached payload: {}", err),
            source: None,
        }
    }
}

impl OpggError {
    /// Create a cache error with a message and no underlying source.
    pub fn cache(message: impl Into<String>) -> Self {
        OpggError::Cache {
            message: message.into(),
            source: None,
        }
    }

    /// Create an invalid-input error.
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        OpggError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// HTTP status associated with this error, if the upstream produced one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            OpggError::NotFound { .. } => Some(404),
            OpggError::RateLimited { .. } => Some(429),
            OpggError::ClientFault { status, .. } | OpggError::ServerFault { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// URL of the request that failed, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            OpggError::NotFound { url, .. }
            | OpggError::RateLimited { url, .. }
            | OpggError::ClientFault { url, .. }
            | OpggError::ServerFault { url, .. }
            | OpggError::Transport { url, .. }
            | OpggError::Decode { url, .. }
            | OpggError::ShapeMismatch { url, .. } => Some(url),
            _ => None,
        }
    }

    /// Seconds the upstream asked us to wait, for rate-limit errors.
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            OpggError::RateLimited {
                retry_after_secs, ..
            } => *retry_after_secs,
            _ => None,
        }
    }

    /// Whether a caller-side retry could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            OpggError::RateLimited { .. }
                | OpggError::ServerFault { .. }
                | OpggError::Transport { .. }
        )
    }

    /// Whether this error came from the local cache store.
    pub fn is_cache_error(&self) -> bool {
        matches!(self, OpggError::Cache { .. })
    }
}

/// Truncate a body excerpt to at most `max_chars` characters.
pub(crate) fn truncate_body(body: &str, max_chars: usize) -> String {
    match body.char_indices().nth(max_chars) {
        Some((idx, _)) => body[..idx].to_string(),
        None => body.to_string(),
    }
}
