//! Wire events
//!
//! Events travel as JSON text frames tagged by a `type` field. Client frames
//! that fail to parse, or that carry a `type` the gateway does not know, are
//! logged and dropped without closing the connection.

use relay_core::RoomId;
use serde::{Deserialize, Serialize};

/// Events a client may send to the gateway
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    /// Subscribe to a room
    JoinRoom { room_id: RoomId },
    /// Unsubscribe from a room
    LeaveRoom { room_id: RoomId },
    /// Send a chat message to a room
    SendData { room_id: RoomId, message: String },
    /// Recognized frame with an unrecognized `type` tag
    #[serde(other)]
    Unknown,
}

impl ClientEvent {
    /// Parse a text frame into a client event
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Events the gateway sends to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    /// A chat message fanned out to room members
    Message {
        sender_id: relay_core::UserId,
        room_id: RoomId,
        message: String,
    },
}

impl ServerEvent {
    /// Encode the event as a JSON text frame
    #[must_use]
    pub fn to_json(&self) -> String {
        // The enum has no map keys or non-string payloads that can fail to
        // serialize.
        serde_json::to_string(self).unwrap_or_default()
    }
}
