//! Error types shared across the pulse crates

use thiserror::Error;

/// Workspace-wide error type
#[derive(Error, Debug)]
pub enum PulseError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    /// The LLM response did not match the sentiment profile schema
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A required setting is missing or malformed; fatal at startup
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PulseError {
    pub fn api(msg: impl Into<String>) -> Self {
        PulseError::Api(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        PulseError::Network(msg.into())
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        PulseError::Auth(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        PulseError::Parse(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        PulseError::NotFound(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        PulseError::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        PulseError::Internal(msg.into())
    }

    /// Whether this error came from schema validation of a model response
    pub fn is_parse(&self) -> bool {
        matches!(self, PulseError::Parse(_))
    }
}

/// Result type alias for pulse operations
pub type PulseResult<T> = Result<T, PulseError>;
