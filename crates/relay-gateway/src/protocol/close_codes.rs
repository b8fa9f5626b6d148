//! WebSocket close codes
//!
//! Application-specific close codes distinguish an authentication rejection
//! from a session takeover from an ordinary peer-initiated close (which uses
//! the standard 1000 path and carries no application code).

use serde::{Deserialize, Serialize};

/// Gateway WebSocket close codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum CloseCode {
    /// Unknown error occurred
    UnknownError = 4000,
    /// Token absent or invalid at connection time
    AuthenticationFailed = 4001,
    /// Superseded by a newer connection for the same user
    SessionReplaced = 4002,
}

impl CloseCode {
    /// Create a `CloseCode` from a raw u16 value
    #[must_use]
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            4000 => Some(Self::UnknownError),
            4001 => Some(Self::AuthenticationFailed),
            4002 => Some(Self::SessionReplaced),
            _ => None,
        }
    }

    /// Get the raw u16 value
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Check if the client should attempt to reconnect after this close code
    #[must_use]
    pub const fn should_reconnect(self) -> bool {
        // A replaced session has a live successor; a rejected token will be
        // rejected again.
        matches!(self, Self::UnknownError)
    }

    /// Get the description for this close code
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::UnknownError => "Unknown error occurred",
            Self::AuthenticationFailed => "Authentication failed",
            Self::SessionReplaced => "Session replaced by a newer connection",
        }
    }

    /// Get the name of this close code
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::UnknownError => "UnknownError",
            Self::AuthenticationFailed => "AuthenticationFailed",
            Self::SessionReplaced => "SessionReplaced",
        }
    }
}

impl std::fmt::Display for CloseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.name(), self.as_u16(), self.description())
    }
}

impl From<CloseCode> for u16 {
    fn from(code: CloseCode) -> Self {
        code.as_u16()
    }
}
