//! Test helpers for integration tests
//!
//! Drives the gateway entirely in-process: sessions are opened through the
//! same functions the socket handler uses, with the test holding the
//! receiving end of each session channel in place of a socket writer task.

use std::sync::Arc;
use std::time::Duration;

use relay_common::JwtVerifier;
use relay_core::{IdentityVerifier, RoomId};
use relay_gateway::connection::{Session, SessionCommand};
use relay_gateway::protocol::{ClientEvent, CloseCode};
use relay_gateway::server::{close_session, open_session, GatewayState};
use relay_queue::MemoryJobBroker;
use tokio::sync::mpsc;

use crate::fixtures::{sign_token, TEST_SECRET};

/// Timeout for frames the test expects to arrive
const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// In-process gateway with an inspectable job broker
pub struct TestGateway {
    pub state: GatewayState,
    pub broker: Arc<MemoryJobBroker>,
}

impl TestGateway {
    /// Create a gateway wired to a memory broker and the test JWT secret
    pub fn new() -> Self {
        let broker = Arc::new(MemoryJobBroker::new());
        let verifier = Arc::new(JwtVerifier::new(TEST_SECRET));
        let state = GatewayState::new(verifier, broker.clone());
        Self { state, broker }
    }

    /// Connect a client through the real verify-then-register path
    pub fn connect(&self, user: &str) -> TestClient {
        let token = sign_token(user);
        let user_id = self
            .state
            .verifier()
            .verify(&token)
            .expect("test token should verify");

        let (session, rx) = open_session(&self.state, user_id);
        TestClient {
            session,
            rx,
            state: self.state.clone(),
        }
    }
}

impl Default for TestGateway {
    fn default() -> Self {
        Self::new()
    }
}

/// A connected client: a session plus the channel a writer task would drain
pub struct TestClient {
    pub session: Arc<Session>,
    rx: mpsc::Receiver<SessionCommand>,
    state: GatewayState,
}

impl TestClient {
    /// Join a room
    pub async fn join(&self, room: &str) {
        self.dispatch(ClientEvent::JoinRoom {
            room_id: RoomId::from(room),
        })
        .await;
    }

    /// Leave a room
    pub async fn leave(&self, room: &str) {
        self.dispatch(ClientEvent::LeaveRoom {
            room_id: RoomId::from(room),
        })
        .await;
    }

    /// Send a chat message to a room
    pub async fn send(&self, room: &str, message: &str) {
        self.dispatch(ClientEvent::SendData {
            room_id: RoomId::from(room),
            message: message.to_string(),
        })
        .await;
    }

    /// Dispatch a raw client event
    pub async fn dispatch(&self, event: ClientEvent) {
        self.state.router().dispatch(&self.session, event).await;
    }

    /// Wait for the next delivered frame and parse it as JSON
    pub async fn recv_json(&mut self) -> serde_json::Value {
        match tokio::time::timeout(RECV_TIMEOUT, self.rx.recv()).await {
            Ok(Some(SessionCommand::Deliver(frame))) => {
                serde_json::from_str(&frame).expect("delivered frame should be JSON")
            }
            Ok(Some(SessionCommand::Close(code))) => {
                panic!("expected a frame, got close {code}")
            }
            Ok(None) => panic!("session channel closed"),
            Err(_) => panic!("timed out waiting for a frame"),
        }
    }

    /// Wait for a close command and assert its code
    pub async fn expect_close(&mut self, expected: CloseCode) {
        match tokio::time::timeout(RECV_TIMEOUT, self.rx.recv()).await {
            Ok(Some(SessionCommand::Close(code))) => assert_eq!(code, expected),
            Ok(Some(SessionCommand::Deliver(frame))) => {
                panic!("expected close {expected}, got frame {frame}")
            }
            Ok(None) => panic!("session channel closed"),
            Err(_) => panic!("timed out waiting for close"),
        }
    }

    /// Assert nothing is pending on the session channel
    pub fn assert_no_frames(&mut self) {
        assert!(
            self.rx.try_recv().is_err(),
            "expected no pending frames for {}",
            self.session.user_id()
        );
    }

    /// Run the disconnect teardown the socket handler would run
    pub fn disconnect(&self) {
        close_session(&self.state, &self.session);
    }
}
