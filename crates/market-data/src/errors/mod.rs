//! Error types and retry classification for the market data crate.
//!
//! This module provides:
//! - [`UpstreamError`]: The error enum for a single upstream request
//! - [`RetryClass`]: Classification for determining retry behavior
//! - [`FailureKind`]: Coarse category used when reporting degraded coverage

mod retry;

pub use retry::{FailureKind, RetryClass};

use thiserror::Error;

/// Errors that can occur while talking to the upstream market-data API.
///
/// None of these are fatal to a pipeline run. They are handled at the
/// smallest scope (one request, one partition or one record) and turned into
/// degraded coverage. Each variant is classified into a [`RetryClass`] via
/// [`retry_class`](Self::retry_class).
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// The upstream throttled the request (HTTP 429 or a rate-limit marker in the body).
    #[error("Rate limited: {endpoint}")]
    RateLimited {
        /// The endpoint that was throttled
        endpoint: String,
    },

    /// The request did not complete within its timeout.
    #[error("Timeout: {endpoint}")]
    Timeout {
        /// The endpoint that timed out
        endpoint: String,
    },

    /// A network-level failure (DNS, connection reset, TLS).
    #[error("Transport error: {endpoint} - {message}")]
    Transport {
        /// The endpoint being called
        endpoint: String,
        /// The underlying error message
        message: String,
    },

    /// The upstream answered with a non-success status that is not a throttle.
    #[error("HTTP {status} from {endpoint}")]
    Status {
        /// The endpoint being called
        endpoint: String,
        /// The HTTP status code
        status: u16,
    },

    /// The body was not the JSON shape we expected.
    #[error("Decode error: {endpoint} - {message}")]
    Decode {
        /// The endpoint being called
        endpoint: String,
        /// The deserializer message
        message: String,
    },

    /// The upstream returned an empty result where one item was expected.
    #[error("No data returned for {0}")]
    Empty(String),

    /// The source does not implement this operation.
    #[error("Operation '{operation}' not supported by {provider}")]
    NotSupported {
        /// The unsupported operation
        operation: String,
        /// The source that rejected it
        provider: String,
    },
}

impl UpstreamError {
    /// Returns the retry classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use capranker_market_data::errors::{RetryClass, UpstreamError};
    ///
    /// let error = UpstreamError::RateLimited { endpoint: "/v3/stock-screener".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    ///
    /// let error = UpstreamError::Decode {
    ///     endpoint: "/v3/stock-screener".to_string(),
    ///     message: "expected array".to_string(),
    /// };
    /// assert_eq!(error.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::RateLimited { .. } => RetryClass::WithBackoff,
            Self::Timeout { .. }
            | Self::Transport { .. }
            | Self::Status { .. }
            | Self::Decode { .. }
            | Self::Empty(_)
            | Self::NotSupported { .. } => RetryClass::Never,
        }
    }

    /// Coarse category for run summaries.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::RateLimited { .. } => FailureKind::RateLimited,
            Self::Timeout { .. } | Self::Transport { .. } | Self::Status { .. } => {
                FailureKind::Transport
            }
            Self::Decode { .. } | Self::Empty(_) => FailureKind::Decode,
            Self::NotSupported { .. } => FailureKind::Unsupported,
        }
    }

    pub(crate) fn from_reqwest(endpoint: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                endpoint: endpoint.to_string(),
            }
        } else if error.is_decode() {
            Self::Decode {
                endpoint: endpoint.to_string(),
                message: error.to_string(),
            }
        } else {
            Self::Transport {
                endpoint: endpoint.to_string(),
                message: error.to_string(),
            }
        }
    }
}
