//! Room membership index
//!
//! Maps each room to the set of users currently in it. Membership is keyed by
//! user, not session: a takeover leaves the membership row in place until the
//! evicted session's teardown purges it.

use dashmap::DashMap;
use relay_core::{RoomId, UserId};
use std::collections::HashSet;

/// Room ID to member set mapping
pub struct RoomIndex {
    rooms: DashMap<RoomId, HashSet<UserId>>,
}

impl RoomIndex {
    /// Create an empty index
    #[must_use]
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
        }
    }

    /// Add a user to a room; returns false if already a member
    pub fn join(&self, room_id: RoomId, user_id: UserId) -> bool {
        let inserted = self
            .rooms
            .entry(room_id.clone())
            .or_default()
            .insert(user_id.clone());

        if inserted {
            tracing::debug!(room_id = %room_id, user_id = %user_id, "User joined room");
        }

        inserted
    }

    /// Remove a user from a room; returns false if not a member.
    ///
    /// The room entry is dropped when its last member leaves.
    pub fn leave(&self, room_id: &RoomId, user_id: &UserId) -> bool {
        let removed = match self.rooms.get_mut(room_id) {
            Some(mut members) => members.remove(user_id),
            None => false,
        };

        if removed {
            // The get_mut guard is released above; remove_if re-checks under
            // the shard lock so a concurrent join is not lost.
            self.rooms.remove_if(room_id, |_, members| members.is_empty());
            tracing::debug!(room_id = %room_id, user_id = %user_id, "User left room");
        }

        removed
    }

    /// Remove a user from every given room
    pub fn purge_user(&self, user_id: &UserId, rooms: &[RoomId]) {
        for room_id in rooms {
            self.leave(room_id, user_id);
        }
    }

    /// Get the members of a room
    pub fn members_of(&self, room_id: &RoomId) -> Vec<UserId> {
        self.rooms
            .get(room_id)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Check whether a user is in a room
    #[must_use]
    pub fn contains(&self, room_id: &RoomId, user_id: &UserId) -> bool {
        self.rooms
            .get(room_id)
            .is_some_and(|members| members.contains(user_id))
    }

    /// Number of rooms with at least one member
    #[must_use]
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Number of members in a room
    #[must_use]
    pub fn member_count(&self, room_id: &RoomId) -> usize {
        self.rooms.get(room_id).map_or(0, |members| members.len())
    }
}

impl Default for RoomIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RoomIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomIndex")
            .field("rooms", &self.rooms.len())
            .finish()
    }
}
