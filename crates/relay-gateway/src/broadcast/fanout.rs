//! Room fan-out
//!
//! Snapshots the member list, encodes the event once, and hands the frame to
//! each live session's outbound channel. Delivery to one member never blocks
//! or fails delivery to another: a member with no live session is skipped and
//! a member with a full buffer has the frame dropped.

use crate::connection::{ConnectionRegistry, DeliverError};
use crate::protocol::ServerEvent;
use crate::rooms::RoomIndex;
use relay_core::RoomId;
use std::sync::Arc;

/// Fans out server events to room members
pub struct Broadcaster {
    registry: Arc<ConnectionRegistry>,
    rooms: Arc<RoomIndex>,
}

impl Broadcaster {
    /// Create a broadcaster over the given registry and room index
    #[must_use]
    pub fn new(registry: Arc<ConnectionRegistry>, rooms: Arc<RoomIndex>) -> Self {
        Self { registry, rooms }
    }

    /// Deliver an event to every live member of a room.
    ///
    /// Returns the number of sessions the frame was handed to.
    pub fn broadcast(&self, room_id: &RoomId, event: &ServerEvent) -> usize {
        let members = self.rooms.members_of(room_id);
        if members.is_empty() {
            return 0;
        }

        let frame = event.to_json();
        let mut delivered = 0;

        for user_id in &members {
            let Some(session) = self.registry.get(user_id) else {
                // Membership can outlive a session briefly during teardown
                continue;
            };

            match session.try_deliver(frame.clone()) {
                Ok(()) => delivered += 1,
                Err(DeliverError::BufferFull) => {
                    tracing::warn!(
                        user_id = %user_id,
                        room_id = %room_id,
                        "Dropped frame for slow consumer"
                    );
                }
                Err(DeliverError::Closed) => {
                    tracing::trace!(
                        user_id = %user_id,
                        room_id = %room_id,
                        "Skipped closed session"
                    );
                }
            }
        }

        tracing::trace!(
            room_id = %room_id,
            members = members.len(),
            delivered = delivered,
            "Event broadcast to room"
        );

        delivered
    }
}

impl std::fmt::Debug for Broadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broadcaster")
            .field("registry", &self.registry)
            .field("rooms", &self.rooms)
            .finish()
    }
}
