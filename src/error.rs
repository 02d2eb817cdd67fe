use std::result;

use crate::retry::RetryableError;
use thiserror::Error;

/// Error types for proxy operations
#[derive(Error, Debug)]
pub enum PubMedError {
    /// HTTP request to E-utilities failed
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Upstream answered with a non-success status, or reported an error in-band
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    /// The EFetch payload held no parseable article blocks
    #[error("No abstracts available for ids: {ids}")]
    AbstractsNotFound { ids: String },

    /// Invalid query structure or parameters
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

pub type Result<T> = result::Result<T, PubMedError>;

impl PubMedError {
    /// Whether this error originated upstream rather than in the caller's input or the payload
    pub fn is_upstream_failure(&self) -> bool {
        matches!(
            self,
            PubMedError::RequestError(_) | PubMedError::ApiError { .. }
        )
    }
}

impl RetryableError for PubMedError {
    fn is_retryable(&self) -> bool {
        match self {
            PubMedError::RequestError(err) => {
                if err.is_timeout() || err.is_connect() {
                    return true;
                }

                if let Some(status) = err.status() {
                    return status.is_server_error() || status.as_u16() == 429;
                }

                // DNS and other network errors
                !err.is_builder() && !err.is_redirect() && !err.is_decode()
            }

            // 5xx and 429 are transient; 200 with an in-band ERROR is not
            PubMedError::ApiError { status, .. } => {
                (500..600).contains(status) || *status == 429
            }

            PubMedError::JsonError(_)
            | PubMedError::AbstractsNotFound { .. }
            | PubMedError::InvalidQuery(_) => false,
        }
    }

    fn retry_reason(&self) -> &str {
        if self.is_retryable() {
            match self {
                PubMedError::RequestError(err) if err.is_timeout() => "Request timeout",
                PubMedError::RequestError(err) if err.is_connect() => "Connection error",
                PubMedError::RequestError(_) => "Network error",
                PubMedError::ApiError { status, .. } => match status {
                    429 => "Rate limit exceeded",
                    _ => "Server error",
                },
                _ => "Transient error",
            }
        } else {
            match self {
                PubMedError::JsonError(_) => "Invalid JSON response",
                PubMedError::AbstractsNotFound { .. } => "Content not available",
                PubMedError::InvalidQuery(_) => "Invalid query",
                PubMedError::ApiError { .. } => "Client error",
                _ => "Non-transient error",
            }
        }
    }
}
