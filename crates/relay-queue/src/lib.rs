//! # relay-queue
//!
//! Write-behind persistence queue for chat messages.
//!
//! The gateway enqueues a [`PersistenceJob`](relay_core::PersistenceJob) per
//! `send-data` event; the [`PersistenceWorker`] drains the queue and writes
//! through the [`ChatStore`](relay_core::ChatStore) collaborator. Failed
//! writes are rescheduled with exponential backoff and buried in a dead-letter
//! list once the attempt budget is exhausted. Live delivery never waits on
//! any of this.
//!
//! Two broker implementations are provided:
//!
//! - [`RedisJobBroker`]: durable, survives process restart (production)
//! - [`MemoryJobBroker`]: in-process, deterministic under `tokio::time::pause`
//!   (tests)

pub mod broker;
pub mod pool;
pub mod retry;
pub mod worker;

// Re-export broker types
pub use broker::{BrokerError, BrokerResult, JobBroker, MemoryJobBroker, RedisJobBroker};

// Re-export pool types
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError};

pub use retry::RetryPolicy;
pub use worker::PersistenceWorker;
