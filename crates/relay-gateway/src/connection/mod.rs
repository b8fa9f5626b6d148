//! Connection state
//!
//! One [`Session`] per live WebSocket, indexed by user in the
//! [`ConnectionRegistry`]. A user has at most one session; registering a
//! second one evicts the first.

mod registry;
mod session;

pub use registry::ConnectionRegistry;
pub use session::{DeliverError, Session, SessionCommand};

/// Per-session outbound channel capacity
pub const SESSION_BUFFER_SIZE: usize = 256;
