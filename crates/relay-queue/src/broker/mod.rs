//! Job broker abstraction
//!
//! The queue's durability lives behind this narrow interface so the retry
//! logic and worker are testable without a real broker. `dequeue` hands a job
//! to exactly one worker; the job stays claimed until `ack`, giving
//! at-least-once delivery on the durable implementation.

mod memory;
mod redis;

pub use memory::MemoryJobBroker;
pub use redis::RedisJobBroker;

use async_trait::async_trait;
use relay_core::PersistenceJob;
use std::time::Duration;
use thiserror::Error;

/// Broker operation errors
#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("Broker connection error: {0}")]
    Connection(String),

    #[error("Broker command error: {0}")]
    Command(String),

    #[error("Job serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for broker operations
pub type BrokerResult<T> = Result<T, BrokerError>;

/// Durable job store for the persistence queue.
#[async_trait]
pub trait JobBroker: Send + Sync {
    /// Append a job to the ready queue
    async fn enqueue(&self, job: &PersistenceJob) -> BrokerResult<()>;

    /// Schedule a job to become ready after `delay` (retry path)
    async fn enqueue_delayed(&self, job: &PersistenceJob, delay: Duration) -> BrokerResult<()>;

    /// Claim the next ready job, waiting up to `timeout`.
    ///
    /// Returns `None` when no job became ready within the timeout.
    async fn dequeue(&self, timeout: Duration) -> BrokerResult<Option<PersistenceJob>>;

    /// Release a claimed job after terminal handling (stored, rescheduled,
    /// or buried)
    async fn ack(&self, _job: &PersistenceJob) -> BrokerResult<()> {
        Ok(())
    }

    /// Move a job to the dead-letter list; it will not be retried again
    async fn bury(&self, job: &PersistenceJob) -> BrokerResult<()>;

    /// Number of jobs currently ready for pickup
    async fn ready_len(&self) -> BrokerResult<usize>;

    /// Number of permanently failed jobs
    async fn dead_len(&self) -> BrokerResult<usize>;

    /// Inspect up to `limit` dead-lettered jobs for operational follow-up
    async fn peek_dead(&self, limit: usize) -> BrokerResult<Vec<PersistenceJob>>;
}
