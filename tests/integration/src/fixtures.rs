//! Test fixtures and data generators
//!
//! Token minting for the auth scenarios and an in-memory chat store with
//! scripted failures for the persistence pipeline.

use async_trait::async_trait;
use jsonwebtoken::{encode, EncodingKey, Header};
use parking_lot::Mutex;
use relay_core::{ChatRecord, ChatStore, NewChatRecord, RoomId, StoreError, StoreResult};
use serde::Serialize;
use std::sync::Arc;

/// JWT secret shared by helpers and token fixtures
pub const TEST_SECRET: &str = "integration-test-secret";

/// Claims shape the gateway's verifier expects
#[derive(Debug, Serialize)]
struct TokenClaims {
    #[serde(rename = "userId")]
    user_id: String,
    iat: i64,
    exp: i64,
}

/// Sign a valid one-hour token for a user
pub fn sign_token(user_id: &str) -> String {
    sign_token_with(TEST_SECRET, user_id, chrono::Utc::now().timestamp() + 3600)
}

/// Sign a token that expired an hour ago
pub fn expired_token(user_id: &str) -> String {
    sign_token_with(TEST_SECRET, user_id, chrono::Utc::now().timestamp() - 3600)
}

/// Sign a token with an arbitrary secret and expiry
pub fn sign_token_with(secret: &str, user_id: &str, exp: i64) -> String {
    let claims = TokenClaims {
        user_id: user_id.to_string(),
        iat: chrono::Utc::now().timestamp(),
        exp,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("token encoding should not fail")
}

/// In-memory chat store with a scripted number of leading write failures
pub struct MemoryChatStore {
    failures: Mutex<u32>,
    records: Mutex<Vec<NewChatRecord>>,
}

impl MemoryChatStore {
    /// Store that accepts every write
    pub fn new() -> Arc<Self> {
        Self::failing(0)
    }

    /// Store that rejects the first `times` writes
    pub fn failing(times: u32) -> Arc<Self> {
        Arc::new(Self {
            failures: Mutex::new(times),
            records: Mutex::new(Vec::new()),
        })
    }

    /// Number of records written so far
    pub fn record_count(&self) -> usize {
        self.records.lock().len()
    }

    /// Snapshot of the written records
    pub fn records(&self) -> Vec<NewChatRecord> {
        self.records.lock().clone()
    }
}

#[async_trait]
impl ChatStore for MemoryChatStore {
    async fn create(&self, record: NewChatRecord) -> StoreResult<()> {
        let mut failures = self.failures.lock();
        if *failures > 0 {
            *failures -= 1;
            return Err(StoreError::Unavailable("scripted outage".to_string()));
        }
        self.records.lock().push(record);
        Ok(())
    }

    async fn list_for_room(&self, room_id: &RoomId, limit: u32) -> StoreResult<Vec<ChatRecord>> {
        let _ = (room_id, limit);
        Ok(Vec::new())
    }
}
