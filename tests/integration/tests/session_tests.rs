//! Session takeover tests
//!
//! A user reconnecting evicts their previous session with close code 4002;
//! the evicted session's teardown must not disturb the successor.
//!
//! Run with: cargo test -p integration-tests --test session_tests

use integration_tests::TestGateway;
use relay_core::UserId;
use relay_gateway::protocol::{ClientEvent, CloseCode};

#[tokio::test]
async fn test_reconnect_closes_previous_session_with_4002() {
    let gateway = TestGateway::new();
    let mut first = gateway.connect("alice");
    let _second = gateway.connect("alice");

    first.expect_close(CloseCode::SessionReplaced).await;
    assert_eq!(gateway.state.registry().session_count(), 1);
}

#[tokio::test]
async fn test_messages_flow_to_the_new_session_only() {
    let gateway = TestGateway::new();
    let bob = gateway.connect("bob");
    bob.join("r1").await;

    let mut old = gateway.connect("alice");
    old.join("r1").await;

    let mut new = gateway.connect("alice");
    old.expect_close(CloseCode::SessionReplaced).await;
    new.join("r1").await;

    bob.send("r1", "hi alice").await;

    assert_eq!(new.recv_json().await["message"], "hi alice");
    old.assert_no_frames();
}

#[tokio::test]
async fn test_evicted_teardown_leaves_successor_connected() {
    let gateway = TestGateway::new();
    let old = gateway.connect("alice");
    old.join("r1").await;

    let new = gateway.connect("alice");
    new.join("r1").await;

    // The evicted socket's handler runs its normal teardown
    old.disconnect();

    let registered = gateway.state.registry().get(&UserId::from("alice")).unwrap();
    assert_eq!(registered.id(), new.session.id());
}

#[tokio::test]
async fn test_late_frame_after_disconnect_leaves_no_membership() {
    let gateway = TestGateway::new();
    let alice = gateway.connect("alice");
    alice.join("r1").await;

    alice.disconnect();

    // A join that was already in flight when the socket went away
    alice
        .dispatch(ClientEvent::JoinRoom {
            room_id: relay_core::RoomId::from("r1"),
        })
        .await;

    assert_eq!(gateway.state.rooms().room_count(), 0);
    assert!(!gateway.state.registry().is_connected(&UserId::from("alice")));
}
