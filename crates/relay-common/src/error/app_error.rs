//! Application error types
//!
//! Unified error handling for process-level concerns (startup, broker,
//! configuration). Per-connection failures use the domain errors in
//! relay-core instead; see the gateway's close-code mapping.

use relay_core::AuthError;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Authentication errors
    #[error(transparent)]
    Auth(#[from] AuthError),

    // Queue broker errors
    #[error("Queue error: {0}")]
    Queue(String),

    // Redis errors
    #[error("Cache error: {0}")]
    Cache(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Internal errors
    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),
}

impl AppError {
    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
