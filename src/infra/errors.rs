// src/infra/errors.rs — Error types for Tandem

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TandemError {
    /// A backend could not be reached or is missing the configured model.
    /// Fatal before any round runs.
    #[error("Backend '{backend}' unavailable: {reason}")]
    Connectivity { backend: String, reason: String },

    /// A generate/review request failed at the transport level.
    #[error("Backend '{backend}' transport error: {source}")]
    Transport {
        backend: String,
        #[source]
        source: reqwest::Error,
    },

    /// A generate/review request came back with a non-success status.
    /// Not retried; rounds recorded before the failure are kept.
    #[error("Backend '{backend}' request failed (HTTP {status}): {detail}")]
    Request {
        backend: String,
        status: u16,
        detail: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
