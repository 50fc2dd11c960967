// src/error.rs

use thiserror::Error;

/// Failure taxonomy for the collectors. Nothing recovers locally; every
/// variant propagates straight to the caller and aborts the collection.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Transport failure or non-2xx status.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Expected HTML structure absent, table shape unexpected, or an
    /// undecodable JSON body.
    #[error("parse error: {0}")]
    Parse(String),

    /// A post-condition over the collected data did not hold.
    #[error("data invariant violated: {0}")]
    DataInvariant(String),
}

impl From<serde_json::Error> for ScrapeError {
    fn from(e: serde_json::Error) -> Self {
        ScrapeError::Parse(format!("malformed JSON body: {}", e))
    }
}
