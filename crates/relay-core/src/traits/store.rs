//! Chat store collaborator interface

use crate::entities::{ChatRecord, NewChatRecord};
use crate::error::StoreError;
use crate::value_objects::RoomId;
use async_trait::async_trait;

/// Result type for chat store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Interface to the relational message store.
///
/// The persistence worker is the only gateway component that writes through
/// this trait; `list_for_room` exists for the history-serving CRUD layer,
/// which shares the same store.
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Persist one chat record
    async fn create(&self, record: NewChatRecord) -> StoreResult<()>;

    /// List the most recent records for a room, newest first
    async fn list_for_room(&self, room_id: &RoomId, limit: u32) -> StoreResult<Vec<ChatRecord>>;
}
