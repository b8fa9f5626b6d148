//! WebSocket handler
//!
//! Verifies the credential from the upgrade request, registers the session,
//! and pumps frames between the socket and the session channel. All gateway
//! state for a connection is torn down when either pump ends.

use crate::connection::{Session, SessionCommand, SESSION_BUFFER_SIZE};
use crate::protocol::{ClientEvent, CloseCode};
use crate::server::GatewayState;
use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use relay_core::{AuthError, IdentityVerifier, UserId};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Query parameters on the upgrade request
#[derive(Debug, Deserialize)]
pub struct ConnectParams {
    /// Signed credential identifying the user
    token: Option<String>,
}

/// WebSocket gateway handler
pub async fn gateway_handler(
    State(state): State<GatewayState>,
    Query(params): Query<ConnectParams>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(state, socket, params.token))
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(state: GatewayState, socket: WebSocket, token: Option<String>) {
    // Verify before touching any gateway state
    let verified = token
        .as_deref()
        .map_or(Err(AuthError::MissingToken), |t| state.verifier().verify(t));

    let user_id = match verified {
        Ok(user_id) => user_id,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected unauthenticated connection");
            close_socket(socket, CloseCode::AuthenticationFailed).await;
            return;
        }
    };

    let (session, mut rx) = open_session(&state, user_id);
    let session_id = session.id().to_string();

    tracing::info!(
        session_id = %session_id,
        user_id = %session.user_id(),
        "WebSocket connection established"
    );

    let (mut ws_sink, mut ws_stream) = socket.split();

    // Pump inbound frames through the event router
    let state_recv = state.clone();
    let session_recv = session.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = ws_stream.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    handle_text_frame(&state_recv, &session_recv, &text).await;
                }
                Ok(Message::Binary(_)) => {
                    tracing::debug!(
                        session_id = %session_recv.id(),
                        "Dropped unsupported binary frame"
                    );
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {}
                Ok(Message::Close(_)) => {
                    tracing::info!(
                        session_id = %session_recv.id(),
                        "Client closed connection"
                    );
                    return;
                }
                Err(e) => {
                    tracing::warn!(
                        session_id = %session_recv.id(),
                        error = %e,
                        "WebSocket error"
                    );
                    return;
                }
            }
        }
    });

    // Pump session commands out to the socket
    let session_id_send = session_id.clone();
    let mut send_task = tokio::spawn(async move {
        while let Some(cmd) = rx.recv().await {
            match cmd {
                SessionCommand::Deliver(frame) => {
                    if ws_sink.send(Message::Text(frame.into())).await.is_err() {
                        tracing::warn!(
                            session_id = %session_id_send,
                            "Failed to send frame to WebSocket"
                        );
                        break;
                    }
                }
                SessionCommand::Close(code) => {
                    tracing::info!(
                        session_id = %session_id_send,
                        close_code = code.as_u16(),
                        "Closing connection"
                    );
                    let _ = ws_sink
                        .send(Message::Close(Some(CloseFrame {
                            code: code.as_u16(),
                            reason: code.description().into(),
                        })))
                        .await;
                    break;
                }
            }
        }

        let _ = ws_sink.close().await;
    });

    // The losing task is aborted: once teardown runs, no buffered inbound
    // frame may keep dispatching against purged state.
    tokio::select! {
        _ = &mut recv_task => {
            tracing::debug!(session_id = %session_id, "Receive task ended");
            send_task.abort();
        }
        _ = &mut send_task => {
            tracing::debug!(session_id = %session_id, "Send task ended");
            recv_task.abort();
        }
    }

    close_session(&state, &session);
}

/// Register a session for a verified user, evicting any prior one.
///
/// The evicted session is told to close with [`CloseCode::SessionReplaced`];
/// its own handler performs the teardown.
pub fn open_session(
    state: &GatewayState,
    user_id: UserId,
) -> (Arc<Session>, mpsc::Receiver<SessionCommand>) {
    let (tx, rx) = mpsc::channel(SESSION_BUFFER_SIZE);
    let session = Arc::new(Session::new(user_id, tx));

    if let Some(evicted) = state.registry().register(session.clone()) {
        evicted.request_close(CloseCode::SessionReplaced);
    }

    (session, rx)
}

/// Tear down a session: purge its room memberships and unregister it.
///
/// The registry removal is guarded by session ID, so teardown of an evicted
/// session never touches its successor. The session is marked terminated
/// first, so an event racing with teardown is rejected by the router instead
/// of re-creating membership state.
pub fn close_session(state: &GatewayState, session: &Arc<Session>) {
    session.mark_terminated();
    let rooms = session.drain_rooms();
    state.rooms().purge_user(session.user_id(), &rooms);
    state.registry().remove(session.user_id(), session.id());

    tracing::info!(
        session_id = %session.id(),
        user_id = %session.user_id(),
        purged_rooms = rooms.len(),
        "Session torn down"
    );
}

/// Decode and dispatch one text frame
async fn handle_text_frame(state: &GatewayState, session: &Session, text: &str) {
    match ClientEvent::parse(text) {
        Ok(event) => state.router().dispatch(session, event).await,
        Err(e) => {
            tracing::debug!(
                session_id = %session.id(),
                error = %e,
                "Dropped malformed frame"
            );
        }
    }
}

/// Close a socket that never became a session
async fn close_socket(mut socket: WebSocket, code: CloseCode) {
    let _ = socket
        .send(Message::Close(Some(CloseFrame {
            code: code.as_u16(),
            reason: code.description().into(),
        })))
        .await;
}
