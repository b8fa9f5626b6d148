//! In-memory job broker
//!
//! Process-local stand-in for the Redis broker. Not durable; exists so the
//! worker and retry logic can be exercised deterministically in tests
//! (timers use `tokio::time`, so `tokio::time::pause` controls the clock).

use super::{BrokerResult, JobBroker};
use async_trait::async_trait;
use parking_lot::Mutex;
use relay_core::PersistenceJob;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::Instant;

#[derive(Default)]
struct Queues {
    ready: VecDeque<PersistenceJob>,
    delayed: Vec<(Instant, PersistenceJob)>,
    dead: Vec<PersistenceJob>,
}

impl Queues {
    /// Move due delayed jobs onto the ready queue, earliest first.
    fn promote(&mut self, now: Instant) {
        self.delayed.sort_by_key(|(due, _)| *due);
        while let Some((due, _)) = self.delayed.first() {
            if *due > now {
                break;
            }
            let (_, job) = self.delayed.remove(0);
            self.ready.push_back(job);
        }
    }

    fn next_due(&self) -> Option<Instant> {
        self.delayed.iter().map(|(due, _)| *due).min()
    }
}

/// In-process job broker for tests and local development.
#[derive(Default)]
pub struct MemoryJobBroker {
    queues: Mutex<Queues>,
    notify: Notify,
}

impl MemoryJobBroker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of jobs parked in the delayed set
    pub fn delayed_len(&self) -> usize {
        self.queues.lock().delayed.len()
    }
}

#[async_trait]
impl JobBroker for MemoryJobBroker {
    async fn enqueue(&self, job: &PersistenceJob) -> BrokerResult<()> {
        self.queues.lock().ready.push_back(job.clone());
        self.notify.notify_one();
        Ok(())
    }

    async fn enqueue_delayed(&self, job: &PersistenceJob, delay: Duration) -> BrokerResult<()> {
        let due = Instant::now() + delay;
        self.queues.lock().delayed.push((due, job.clone()));
        // Wake any waiter so it can recompute its next deadline
        self.notify.notify_one();
        Ok(())
    }

    async fn dequeue(&self, timeout: Duration) -> BrokerResult<Option<PersistenceJob>> {
        let deadline = Instant::now() + timeout;

        loop {
            let next_due = {
                let mut queues = self.queues.lock();
                queues.promote(Instant::now());
                if let Some(job) = queues.ready.pop_front() {
                    return Ok(Some(job));
                }
                queues.next_due()
            };

            if Instant::now() >= deadline {
                return Ok(None);
            }

            let wake = next_due.map_or(deadline, |due| due.min(deadline));
            tokio::select! {
                () = self.notify.notified() => {}
                () = tokio::time::sleep_until(wake) => {}
            }
        }
    }

    async fn bury(&self, job: &PersistenceJob) -> BrokerResult<()> {
        self.queues.lock().dead.push(job.clone());
        Ok(())
    }

    async fn ready_len(&self) -> BrokerResult<usize> {
        Ok(self.queues.lock().ready.len())
    }

    async fn dead_len(&self) -> BrokerResult<usize> {
        Ok(self.queues.lock().dead.len())
    }

    async fn peek_dead(&self, limit: usize) -> BrokerResult<Vec<PersistenceJob>> {
        Ok(self.queues.lock().dead.iter().take(limit).cloned().collect())
    }
}

impl std::fmt::Debug for MemoryJobBroker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let queues = self.queues.lock();
        f.debug_struct("MemoryJobBroker")
            .field("ready", &queues.ready.len())
            .field("delayed", &queues.delayed.len())
            .field("dead", &queues.dead.len())
            .finish()
    }
}
