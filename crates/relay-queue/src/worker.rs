//! Persistence worker
//!
//! Drains the job broker and writes chat records through the `ChatStore`
//! collaborator. A failed write reschedules the job per the retry policy;
//! a job that exhausts its budget is buried in the dead-letter list and
//! never surfaced to the sender or to room members.

use crate::broker::JobBroker;
use crate::retry::RetryPolicy;
use relay_core::{ChatStore, NewChatRecord, PersistenceJob};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Pause after a broker error before polling again
const ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// Consumes persistence jobs and writes them to the chat store.
pub struct PersistenceWorker {
    broker: Arc<dyn JobBroker>,
    store: Arc<dyn ChatStore>,
    policy: RetryPolicy,
    poll_timeout: Duration,
    running: Arc<AtomicBool>,
}

impl PersistenceWorker {
    /// Create a worker with a 5 second dequeue poll timeout
    #[must_use]
    pub fn new(broker: Arc<dyn JobBroker>, store: Arc<dyn ChatStore>, policy: RetryPolicy) -> Self {
        Self {
            broker,
            store,
            policy,
            poll_timeout: Duration::from_secs(5),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Override the dequeue poll timeout
    #[must_use]
    pub fn with_poll_timeout(mut self, poll_timeout: Duration) -> Self {
        self.poll_timeout = poll_timeout;
        self
    }

    /// Start the worker loop on a background task
    pub fn start(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let worker = self.clone();
        tokio::spawn(async move {
            worker.run().await;
        })
    }

    /// Stop the worker after its current poll completes
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Check if the worker loop is active
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Run the worker loop until [`stop`](Self::stop) is called
    pub async fn run(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            tracing::warn!("Persistence worker is already running");
            return;
        }

        tracing::info!(
            max_attempts = self.policy.max_attempts,
            "Persistence worker started"
        );

        while self.running.load(Ordering::SeqCst) {
            match self.broker.dequeue(self.poll_timeout).await {
                Ok(Some(job)) => self.process(job).await,
                Ok(None) => {}
                Err(e) => {
                    tracing::error!(error = %e, "Failed to dequeue job");
                    tokio::time::sleep(ERROR_BACKOFF).await;
                }
            }
        }

        tracing::info!("Persistence worker stopped");
    }

    /// Handle one claimed job to a terminal or rescheduled state.
    async fn process(&self, job: PersistenceJob) {
        match self.store.create(NewChatRecord::from(&job)).await {
            Ok(()) => {
                tracing::info!(
                    user_id = %job.user_id,
                    room_id = %job.room_id,
                    attempt = job.attempt,
                    "Message persisted"
                );
            }
            Err(e) => match self.policy.delay_after(job.attempt) {
                Some(delay) => {
                    tracing::warn!(
                        room_id = %job.room_id,
                        attempt = job.attempt,
                        retry_in_ms = delay.as_millis() as u64,
                        error = %e,
                        "Chat store write failed, rescheduling"
                    );
                    if let Err(e) = self.broker.enqueue_delayed(&job.next_attempt(), delay).await {
                        tracing::error!(error = %e, "Failed to reschedule job");
                    }
                }
                None => {
                    tracing::error!(
                        user_id = %job.user_id,
                        room_id = %job.room_id,
                        attempts = job.attempt,
                        error = %e,
                        "Job permanently failed, moving to dead letter"
                    );
                    if let Err(e) = self.broker.bury(&job).await {
                        tracing::error!(error = %e, "Failed to bury job");
                    }
                }
            },
        }

        // Release the processing-list claim regardless of outcome
        if let Err(e) = self.broker.ack(&job).await {
            tracing::error!(error = %e, "Failed to ack job");
        }
    }
}

impl std::fmt::Debug for PersistenceWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceWorker")
            .field("policy", &self.policy)
            .field("poll_timeout", &self.poll_timeout)
            .field("running", &self.running.load(Ordering::SeqCst))
            .finish()
    }
}
