use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

/// Everything that can go wrong talking to the trend provider.
///
/// None of these reach the caller; the handler substitutes synthetic data instead.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned status {status} for {endpoint}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("could not decode upstream payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("upstream payload had no JSON body")]
    MissingBody,

    #[error("upstream returned no related-query widgets")]
    MissingWidgets,

    #[error("upstream did not answer within {0:?}")]
    Timeout(Duration),

    #[error("upstream client unavailable: {0}")]
    Unavailable(String),
}
