//! Common error types.

use thiserror::Error;

/// Error type for fallible operations outside the upgrade pipeline
/// (configuration loading, host setup, explicit lookups).
#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Player not found: {0}")]
    NotFound(String),
}

pub type PlayerResult<T> = Result<T, PlayerError>;

impl PlayerError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}
