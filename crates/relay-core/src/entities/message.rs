//! Message persistence types
//!
//! A `send-data` event produces a [`PersistenceJob`] on the durable queue;
//! the worker turns it into a [`NewChatRecord`] write against the chat store.
//! [`ChatRecord`] is the store's persisted representation - the gateway only
//! ever produces write requests and never reads records back.

use crate::value_objects::{RoomId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A queued message-persistence job.
///
/// Owned by the queue from enqueue until terminal resolution (stored, or
/// buried after the retry budget is exhausted). `attempt` is 1-based and
/// increments each time the worker picks the job up. `id` is unique per
/// job, so two jobs carrying the same message stay distinct on the broker
/// even in set-shaped storage like the delayed zset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistenceJob {
    pub id: String,
    pub user_id: UserId,
    pub room_id: RoomId,
    pub message: String,
    pub attempt: u32,
}

impl PersistenceJob {
    /// Create a first-attempt job for a freshly sent message
    pub fn new(user_id: UserId, room_id: RoomId, message: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            room_id,
            message: message.into(),
            attempt: 1,
        }
    }

    /// Copy of this job with the attempt counter advanced; keeps its `id`
    #[must_use]
    pub fn next_attempt(&self) -> Self {
        Self {
            attempt: self.attempt + 1,
            ..self.clone()
        }
    }
}

/// Write request handed to the chat store by the persistence worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewChatRecord {
    pub user_id: UserId,
    pub room_id: RoomId,
    pub content: String,
}

impl From<&PersistenceJob> for NewChatRecord {
    fn from(job: &PersistenceJob) -> Self {
        Self {
            user_id: job.user_id.clone(),
            room_id: job.room_id.clone(),
            content: job.message.clone(),
        }
    }
}

/// Persisted chat record, as returned by the store's list operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRecord {
    pub id: String,
    pub user_id: UserId,
    pub room_id: RoomId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
