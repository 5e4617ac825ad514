//! Error types for the model client

use thiserror::Error;

/// What went wrong while asking the model for findings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("no API key configured for the generative model")]
    MissingApiKey,

    #[error("invalid model client configuration: {0}")]
    Config(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("provider timeout")]
    Timeout,

    #[error("provider auth failed (status {0})")]
    Auth(u16),

    #[error("provider rate limited")]
    RateLimited,

    #[error("provider invalid response: {0}")]
    InvalidResponse(String),

    #[error("model reply is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("model reply is not a JSON array (got {0})")]
    NotAnArray(&'static str),

    #[error("finding {index} is malformed: {reason}")]
    InvalidFinding { index: usize, reason: String },
}

/// The single error kind surfaced by [`crate::ModelClient`].
///
/// The underlying [`ModelError`] stays reachable through `source()` and is
/// part of the message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Model client error ({model}): {source}")]
pub struct ModelClientError {
    pub model: String,
    #[source]
    pub source: ModelError,
}
