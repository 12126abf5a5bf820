//! Errors raised by document store calls

use thiserror::Error;

/// Failure of a single persistence call. Never retried.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} {url} returned {status}: {message}")]
    Status {
        method: &'static str,
        url: String,
        status: u16,
        message: String,
    },

    #[error("unexpected response from document store: {0}")]
    InvalidResponse(String),

    #[error("failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("invalid document store configuration: {0}")]
    Config(String),
}
