//! Client event handlers
//!
//! Routes decoded client events against gateway state. Handlers never close
//! the connection: bad or unexpected frames are logged and dropped so one
//! malformed event cannot take down an otherwise healthy session.

use crate::broadcast::Broadcaster;
use crate::connection::Session;
use crate::protocol::{ClientEvent, ServerEvent};
use crate::rooms::RoomIndex;
use relay_core::PersistenceJob;
use relay_queue::JobBroker;
use std::sync::Arc;

/// Dispatches client events to their handlers
pub struct EventRouter {
    rooms: Arc<RoomIndex>,
    broadcaster: Arc<Broadcaster>,
    broker: Arc<dyn JobBroker>,
}

impl EventRouter {
    /// Create a router over the shared gateway collaborators
    #[must_use]
    pub fn new(
        rooms: Arc<RoomIndex>,
        broadcaster: Arc<Broadcaster>,
        broker: Arc<dyn JobBroker>,
    ) -> Self {
        Self {
            rooms,
            broadcaster,
            broker,
        }
    }

    /// Handle one decoded client event for a session
    pub async fn dispatch(&self, session: &Session, event: ClientEvent) {
        // A frame can still be in flight from a socket whose teardown
        // already purged this session's state; acting on it would leave
        // membership rows nothing cleans up.
        if session.is_terminated() {
            tracing::debug!(
                session_id = %session.id(),
                user_id = %session.user_id(),
                "Dropped event for terminated session"
            );
            return;
        }

        match event {
            ClientEvent::JoinRoom { room_id } => self.handle_join(session, room_id),
            ClientEvent::LeaveRoom { room_id } => self.handle_leave(session, &room_id),
            ClientEvent::SendData { room_id, message } => {
                self.handle_send(session, room_id, message).await;
            }
            ClientEvent::Unknown => {
                tracing::debug!(
                    session_id = %session.id(),
                    user_id = %session.user_id(),
                    "Dropped frame with unknown event type"
                );
            }
        }
    }

    fn handle_join(&self, session: &Session, room_id: relay_core::RoomId) {
        session.track_join(room_id.clone());
        self.rooms.join(room_id, session.user_id().clone());
    }

    fn handle_leave(&self, session: &Session, room_id: &relay_core::RoomId) {
        session.track_leave(room_id);
        self.rooms.leave(room_id, session.user_id());
    }

    /// Fan out a chat message and enqueue its persistence job.
    ///
    /// Unconditional for any well-formed frame: the envelope goes to the
    /// room's current members whether or not the sender is one of them, and
    /// delivery is not gated on the enqueue (the message reaches live members
    /// even when the queue is down, with the loss logged).
    async fn handle_send(&self, session: &Session, room_id: relay_core::RoomId, message: String) {
        let event = ServerEvent::Message {
            sender_id: session.user_id().clone(),
            room_id: room_id.clone(),
            message: message.clone(),
        };
        let delivered = self.broadcaster.broadcast(&room_id, &event);

        tracing::debug!(
            room_id = %room_id,
            sender_id = %session.user_id(),
            delivered = delivered,
            "Message fanned out"
        );

        let job = PersistenceJob::new(session.user_id().clone(), room_id.clone(), message);
        if let Err(e) = self.broker.enqueue(&job).await {
            tracing::error!(
                room_id = %room_id,
                error = %e,
                "Failed to enqueue persistence job"
            );
        }
    }
}

impl std::fmt::Debug for EventRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRouter")
            .field("rooms", &self.rooms)
            .finish()
    }
}
