//! Persistence pipeline tests
//!
//! Full write-behind path: a sent message becomes a broker job, the worker
//! drains it into the chat store, failures back off exponentially, and an
//! exhausted job lands in the dead-letter list. Paused time makes the
//! backoff delays instantaneous.
//!
//! Run with: cargo test -p integration-tests --test persistence_tests

use integration_tests::{MemoryChatStore, TestGateway};
use relay_core::{RoomId, UserId};
use relay_queue::{JobBroker, PersistenceWorker, RetryPolicy};
use std::sync::Arc;
use std::time::Duration;

async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(120), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

fn spawn_worker(
    gateway: &TestGateway,
    store: Arc<MemoryChatStore>,
) -> (Arc<PersistenceWorker>, tokio::task::JoinHandle<()>) {
    let worker = Arc::new(
        PersistenceWorker::new(gateway.broker.clone(), store, RetryPolicy::default())
            .with_poll_timeout(Duration::from_millis(50)),
    );
    let handle = worker.start();
    (worker, handle)
}

#[tokio::test(start_paused = true)]
async fn test_sent_message_reaches_the_store() {
    let gateway = TestGateway::new();
    let alice = gateway.connect("alice");
    alice.join("r1").await;
    alice.send("r1", "persist me").await;

    let store = MemoryChatStore::new();
    let (worker, handle) = spawn_worker(&gateway, store.clone());

    wait_until(|| store.record_count() == 1).await;

    let records = store.records();
    assert_eq!(records[0].user_id, UserId::from("alice"));
    assert_eq!(records[0].room_id, RoomId::from("r1"));
    assert_eq!(records[0].content, "persist me");

    worker.stop();
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("worker should stop")
        .unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_transient_store_outage_is_retried() {
    let gateway = TestGateway::new();
    let alice = gateway.connect("alice");
    alice.join("r1").await;
    alice.send("r1", "eventually").await;

    // Two failed attempts, then the store recovers
    let store = MemoryChatStore::failing(2);
    let (worker, _handle) = spawn_worker(&gateway, store.clone());

    wait_until(|| store.record_count() == 1).await;

    assert_eq!(store.records()[0].content, "eventually");
    assert_eq!(gateway.broker.dead_len().await.unwrap(), 0);
    worker.stop();
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_job_is_buried_not_stored() {
    let gateway = TestGateway::new();
    let alice = gateway.connect("alice");
    alice.join("r1").await;
    alice.send("r1", "doomed").await;

    let store = MemoryChatStore::failing(u32::MAX);
    let (worker, _handle) = spawn_worker(&gateway, store.clone());

    wait_until_dead(&gateway).await;

    assert_eq!(store.record_count(), 0);
    assert_eq!(gateway.broker.ready_len().await.unwrap(), 0);

    let dead = gateway.broker.peek_dead(10).await.unwrap();
    assert_eq!(dead.len(), 1);
    assert_eq!(dead[0].message, "doomed");
    assert_eq!(dead[0].attempt, 5);
    worker.stop();
}

async fn wait_until_dead(gateway: &TestGateway) {
    tokio::time::timeout(Duration::from_secs(120), async {
        loop {
            if gateway.broker.dead_len().await.unwrap() == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("job was not buried in time");
}

#[tokio::test(start_paused = true)]
async fn test_delivery_does_not_wait_on_persistence() {
    let gateway = TestGateway::new();
    let mut alice = gateway.connect("alice");
    let mut bob = gateway.connect("bob");
    alice.join("r1").await;
    bob.join("r1").await;

    // No worker running at all; live delivery still happens
    alice.send("r1", "instant").await;

    assert_eq!(alice.recv_json().await["message"], "instant");
    assert_eq!(bob.recv_json().await["message"], "instant");
    assert_eq!(gateway.broker.ready_len().await.unwrap(), 1);
}
