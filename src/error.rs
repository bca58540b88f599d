//! Error types surfaced by the search pipeline.
//!
//! Extraction problems never show up here: they degrade to empty data.
//! Only generation faults, bad configuration and rejected input abort a search.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScoutError>;

/// Failure of the text-generation capability
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Connection failed, timed out, or the request could not be sent
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response from the model endpoint
    #[error("API error: {0}")]
    Api(String),

    /// Response body did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Model returned no content")]
    EmptyResponse,
}

#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Narrative generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("Invalid search criteria: {0}")]
    InvalidCriteria(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
