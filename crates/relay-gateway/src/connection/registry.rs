//! Connection registry
//!
//! Maps each user to their single live session. Registering a session for a
//! user who already has one returns the old session so the caller can close
//! it; the map always points at the newest connection.

use super::Session;
use dashmap::DashMap;
use relay_core::UserId;
use std::sync::Arc;

/// All active sessions, keyed by user
pub struct ConnectionRegistry {
    sessions: DashMap<UserId, Arc<Session>>,
}

impl ConnectionRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Create a registry wrapped in Arc
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a session, returning the evicted one if the user was
    /// already connected
    pub fn register(&self, session: Arc<Session>) -> Option<Arc<Session>> {
        let user_id = session.user_id().clone();
        let evicted = self.sessions.insert(user_id.clone(), session);

        match &evicted {
            Some(old) => tracing::info!(
                user_id = %user_id,
                old_session = %old.id(),
                "Session replaced by newer connection"
            ),
            None => tracing::debug!(user_id = %user_id, "Session registered"),
        }

        evicted
    }

    /// Remove the user's session only if it is still the given one.
    ///
    /// A session evicted by takeover has already been replaced in the map;
    /// its teardown must not remove the successor.
    pub fn remove(&self, user_id: &UserId, session_id: &str) -> Option<Arc<Session>> {
        let removed = self
            .sessions
            .remove_if(user_id, |_, current| current.id() == session_id)
            .map(|(_, session)| session);

        if removed.is_some() {
            tracing::debug!(user_id = %user_id, session_id = %session_id, "Session removed");
        }

        removed
    }

    /// Get a user's live session
    pub fn get(&self, user_id: &UserId) -> Option<Arc<Session>> {
        self.sessions.get(user_id).map(|r| r.clone())
    }

    /// Check whether a user is connected
    #[must_use]
    pub fn is_connected(&self, user_id: &UserId) -> bool {
        self.sessions.contains_key(user_id)
    }

    /// Number of connected users
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConnectionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionRegistry")
            .field("sessions", &self.sessions.len())
            .finish()
    }
}
