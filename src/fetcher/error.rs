//! Error types for remote calls.

use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Failures raised by a [`Transport`](crate::fetcher::Transport) implementation.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be sent or the response could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote service answered with a non-success status.
    #[error("{method} {uri} returned {status}")]
    Status {
        method: &'static str,
        uri: String,
        status: StatusCode,
    },

    /// The body was not JSON, or did not match the expected shape.
    #[error("Invalid response body: {0}")]
    Body(#[from] serde_json::Error),

    /// Any other transport-specific failure.
    #[error("Transport error: {0}")]
    Other(String),
}

/// Failures observed when issuing or joining a fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The join bound elapsed before the fetch completed.
    #[error("Timed out after {0:?}")]
    TimedOut(Duration),

    /// Transport error or response-shape mismatch.
    #[error("Fetch failed: {0}")]
    FetchFailed(#[source] TransportError),

    /// The worker pool refused the task.
    #[error("Worker pool exhausted: {0}")]
    ResourceExhausted(String),

    /// The task panicked or was aborted before producing a result.
    #[error("Fetch task aborted: {0}")]
    TaskAborted(String),
}

impl From<TransportError> for FetchError {
    fn from(e: TransportError) -> Self {
        FetchError::FetchFailed(e)
    }
}
