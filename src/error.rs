//! Error types for the reqwest-dispatch crate.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

/// Error code reported for requests that exceeded their deadline.
pub const ETIMEDOUT: &str = "ETIMEDOUT";

/// Error returned by deadline-bound fetches.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The deadline elapsed before the response headers arrived.
    #[error("Request timed out after {}ms", .timeout.as_millis())]
    TimedOut {
        /// The deadline that was exceeded.
        timeout: Duration,
    },
    /// The transport failed; the original error is kept as the source.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    /// The installed dispatcher could not build its client.
    #[error("{0}")]
    Dispatcher(#[source] Arc<reqwest::Error>),
}

impl FetchError {
    /// Short error code, if this failure has one.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            FetchError::TimedOut { .. } => Some(ETIMEDOUT),
            _ => None,
        }
    }

    /// Whether this error was caused by the deadline firing.
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::TimedOut { .. })
    }
}
