//! WebSocket session
//!
//! A session owns the sending half of the per-connection outbound channel and
//! tracks which rooms the connection has joined. The writer task on the other
//! end of the channel is the only code that touches the socket.

use crate::protocol::CloseCode;
use parking_lot::RwLock;
use relay_core::{RoomId, UserId};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;

/// Commands consumed by a session's writer task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Deliver an encoded text frame
    Deliver(String),
    /// Close the socket with an application close code
    Close(CloseCode),
}

/// Errors from delivering a frame to a session
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DeliverError {
    /// Outbound buffer is full
    #[error("Session buffer full")]
    BufferFull,
    /// Writer task has gone away
    #[error("Session closed")]
    Closed,
}

/// A live WebSocket connection for one authenticated user
pub struct Session {
    /// Unique session ID (UUID v4)
    id: String,
    /// Verified identity of the connected user
    user_id: UserId,
    /// Outbound command channel to the writer task
    sender: mpsc::Sender<SessionCommand>,
    /// Rooms this session has joined
    joined_rooms: RwLock<HashSet<RoomId>>,
    /// Set once by teardown; dispatch rejects events after this
    terminated: AtomicBool,
}

impl Session {
    /// Create a session with a fresh ID
    #[must_use]
    pub fn new(user_id: UserId, sender: mpsc::Sender<SessionCommand>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            sender,
            joined_rooms: RwLock::new(HashSet::new()),
            terminated: AtomicBool::new(false),
        }
    }

    /// Get the session ID
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the user this session belongs to
    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Deliver a frame without waiting.
    ///
    /// A full buffer means the client is not draining its socket; the frame
    /// is dropped rather than blocking the caller.
    pub fn try_deliver(&self, frame: String) -> Result<(), DeliverError> {
        self.sender
            .try_send(SessionCommand::Deliver(frame))
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => DeliverError::BufferFull,
                mpsc::error::TrySendError::Closed(_) => DeliverError::Closed,
            })
    }

    /// Ask the writer task to close the socket with `code`
    pub fn request_close(&self, code: CloseCode) {
        // A dropped writer task has already closed the socket.
        let _ = self.sender.try_send(SessionCommand::Close(code));
    }

    /// Check whether the writer task has gone away
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Mark the session terminated.
    ///
    /// Teardown sets this before purging state; any event still in flight
    /// for this session is rejected from then on.
    pub fn mark_terminated(&self) {
        self.terminated.store(true, Ordering::SeqCst);
    }

    /// Check whether teardown has run for this session
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::SeqCst)
    }

    /// Record a room join; returns false if already joined
    pub fn track_join(&self, room_id: RoomId) -> bool {
        self.joined_rooms.write().insert(room_id)
    }

    /// Record a room leave; returns false if not joined
    pub fn track_leave(&self, room_id: &RoomId) -> bool {
        self.joined_rooms.write().remove(room_id)
    }

    /// Check membership in a room
    #[must_use]
    pub fn is_in_room(&self, room_id: &RoomId) -> bool {
        self.joined_rooms.read().contains(room_id)
    }

    /// Number of rooms this session has joined
    #[must_use]
    pub fn room_count(&self) -> usize {
        self.joined_rooms.read().len()
    }

    /// Take all joined rooms for teardown
    pub fn drain_rooms(&self) -> Vec<RoomId> {
        self.joined_rooms.write().drain().collect()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("rooms", &self.room_count())
            .finish()
    }
}
