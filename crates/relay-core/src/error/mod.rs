//! Domain error types

use thiserror::Error;

/// Credential verification failures.
///
/// All variants are terminal for the connection attempt: the transport is
/// closed with an authentication-failure code and no gateway state mutates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No credential was supplied with the connection request
    #[error("No token provided")]
    MissingToken,

    /// Credential is malformed or its signature/claims do not validate
    #[error("Invalid token")]
    InvalidToken,

    /// Credential has expired
    #[error("Token expired")]
    TokenExpired,

    /// Decoded claims lack a usable user identifier
    #[error("Token has no user identifier")]
    MissingSubject,
}

/// Chat store failures, as seen by the persistence worker.
///
/// Non-terminal per attempt; the retry policy decides whether a failed write
/// is rescheduled or buried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Store could not be reached or timed out
    #[error("Chat store unavailable: {0}")]
    Unavailable(String),

    /// Store rejected the write (constraint violation, unknown room, ...)
    #[error("Chat store rejected the write: {0}")]
    Rejected(String),
}
