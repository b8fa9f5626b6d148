//! Redis-backed job broker
//!
//! Key layout, derived from the configured queue name (default
//! `chat-message`, shared with the worker process):
//!
//! - `{name}:ready` - list of jobs awaiting pickup (LPUSH / BLMOVE)
//! - `{name}:processing` - jobs claimed by a worker, removed on ack
//! - `{name}:delayed` - zset of rescheduled jobs scored by due time (ms)
//! - `{name}:dead` - list of permanently failed jobs
//!
//! Delayed jobs are promoted on each dequeue; the ZREM result arbitrates
//! which instance claims a due job when several promote concurrently.
//! Zset members are whole serialized jobs; the job's unique `id` keeps
//! same-content jobs from collapsing into one member.

use super::{BrokerError, BrokerResult, JobBroker};
use crate::pool::{RedisPool, RedisPoolError};
use async_trait::async_trait;
use chrono::Utc;
use relay_core::PersistenceJob;
use std::time::Duration;

/// Number of due delayed jobs promoted per dequeue pass
const PROMOTE_BATCH: usize = 128;

/// Durable job broker on top of Redis lists and sorted sets.
#[derive(Clone)]
pub struct RedisJobBroker {
    pool: RedisPool,
    ready_key: String,
    processing_key: String,
    delayed_key: String,
    dead_key: String,
}

impl RedisJobBroker {
    /// Create a broker for the named queue
    #[must_use]
    pub fn new(pool: RedisPool, queue_name: &str) -> Self {
        Self {
            pool,
            ready_key: format!("{queue_name}:ready"),
            processing_key: format!("{queue_name}:processing"),
            delayed_key: format!("{queue_name}:delayed"),
            dead_key: format!("{queue_name}:dead"),
        }
    }

    async fn connection(&self) -> BrokerResult<deadpool_redis::Connection> {
        self.pool.get().await.map_err(|e| match e {
            RedisPoolError::GetConnection(e) => BrokerError::Connection(e.to_string()),
            other => BrokerError::Connection(other.to_string()),
        })
    }

    /// Move due delayed jobs onto the ready list.
    async fn promote_due(&self, conn: &mut deadpool_redis::Connection) -> BrokerResult<()> {
        let now_ms = Utc::now().timestamp_millis();

        let due: Vec<String> = redis::cmd("ZRANGEBYSCORE")
            .arg(&self.delayed_key)
            .arg("-inf")
            .arg(now_ms)
            .arg("LIMIT")
            .arg(0)
            .arg(PROMOTE_BATCH)
            .query_async(conn)
            .await
            .map_err(|e| BrokerError::Command(e.to_string()))?;

        for payload in due {
            // ZREM returning 1 means this instance claimed the job
            let removed: i64 = redis::cmd("ZREM")
                .arg(&self.delayed_key)
                .arg(&payload)
                .query_async(conn)
                .await
                .map_err(|e| BrokerError::Command(e.to_string()))?;

            if removed == 1 {
                redis::cmd("LPUSH")
                    .arg(&self.ready_key)
                    .arg(&payload)
                    .query_async::<i64>(conn)
                    .await
                    .map_err(|e| BrokerError::Command(e.to_string()))?;
            }
        }

        Ok(())
    }

    async fn list_len(&self, key: &str) -> BrokerResult<usize> {
        let mut conn = self.connection().await?;
        let len: i64 = redis::cmd("LLEN")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| BrokerError::Command(e.to_string()))?;
        Ok(len.max(0) as usize)
    }
}

#[async_trait]
impl JobBroker for RedisJobBroker {
    async fn enqueue(&self, job: &PersistenceJob) -> BrokerResult<()> {
        let payload = serde_json::to_string(job)?;
        let mut conn = self.connection().await?;

        redis::cmd("LPUSH")
            .arg(&self.ready_key)
            .arg(&payload)
            .query_async::<i64>(&mut conn)
            .await
            .map_err(|e| BrokerError::Command(e.to_string()))?;

        tracing::trace!(
            room_id = %job.room_id,
            attempt = job.attempt,
            "Job enqueued"
        );

        Ok(())
    }

    async fn enqueue_delayed(&self, job: &PersistenceJob, delay: Duration) -> BrokerResult<()> {
        let payload = serde_json::to_string(job)?;
        let due_ms = Utc::now().timestamp_millis() + delay.as_millis() as i64;
        let mut conn = self.connection().await?;

        redis::cmd("ZADD")
            .arg(&self.delayed_key)
            .arg(due_ms)
            .arg(&payload)
            .query_async::<i64>(&mut conn)
            .await
            .map_err(|e| BrokerError::Command(e.to_string()))?;

        tracing::trace!(
            room_id = %job.room_id,
            attempt = job.attempt,
            delay_ms = delay.as_millis() as u64,
            "Job scheduled for retry"
        );

        Ok(())
    }

    async fn dequeue(&self, timeout: Duration) -> BrokerResult<Option<PersistenceJob>> {
        let mut conn = self.connection().await?;

        self.promote_due(&mut conn).await?;

        // Claim into the processing list so a crashed worker leaves the job
        // recoverable instead of lost.
        let payload: Option<String> = redis::cmd("BLMOVE")
            .arg(&self.ready_key)
            .arg(&self.processing_key)
            .arg("RIGHT")
            .arg("LEFT")
            .arg(timeout.as_secs_f64())
            .query_async(&mut conn)
            .await
            .map_err(|e| BrokerError::Command(e.to_string()))?;

        let Some(payload) = payload else {
            return Ok(None);
        };

        match serde_json::from_str::<PersistenceJob>(&payload) {
            Ok(job) => Ok(Some(job)),
            Err(e) => {
                // Unparseable payload: drop the claim and keep draining
                tracing::error!(error = %e, "Discarding undecodable job payload");
                redis::cmd("LREM")
                    .arg(&self.processing_key)
                    .arg(1)
                    .arg(&payload)
                    .query_async::<i64>(&mut conn)
                    .await
                    .map_err(|e| BrokerError::Command(e.to_string()))?;
                Ok(None)
            }
        }
    }

    async fn ack(&self, job: &PersistenceJob) -> BrokerResult<()> {
        let payload = serde_json::to_string(job)?;
        let mut conn = self.connection().await?;

        redis::cmd("LREM")
            .arg(&self.processing_key)
            .arg(1)
            .arg(&payload)
            .query_async::<i64>(&mut conn)
            .await
            .map_err(|e| BrokerError::Command(e.to_string()))?;

        Ok(())
    }

    async fn bury(&self, job: &PersistenceJob) -> BrokerResult<()> {
        let payload = serde_json::to_string(job)?;
        let mut conn = self.connection().await?;

        redis::cmd("LPUSH")
            .arg(&self.dead_key)
            .arg(&payload)
            .query_async::<i64>(&mut conn)
            .await
            .map_err(|e| BrokerError::Command(e.to_string()))?;

        Ok(())
    }

    async fn ready_len(&self) -> BrokerResult<usize> {
        self.list_len(&self.ready_key).await
    }

    async fn dead_len(&self) -> BrokerResult<usize> {
        self.list_len(&self.dead_key).await
    }

    async fn peek_dead(&self, limit: usize) -> BrokerResult<Vec<PersistenceJob>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mut conn = self.connection().await?;
        let payloads: Vec<String> = redis::cmd("LRANGE")
            .arg(&self.dead_key)
            .arg(0)
            .arg(limit as i64 - 1)
            .query_async(&mut conn)
            .await
            .map_err(|e| BrokerError::Command(e.to_string()))?;

        payloads
            .iter()
            .map(|p| serde_json::from_str(p).map_err(BrokerError::Serialization))
            .collect()
    }
}

impl std::fmt::Debug for RedisJobBroker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisJobBroker")
            .field("ready_key", &self.ready_key)
            .field("delayed_key", &self.delayed_key)
            .field("dead_key", &self.dead_key)
            .finish()
    }
}
