//! # relay-gateway
//!
//! WebSocket gateway for real-time room messaging. Authenticates connections,
//! tracks presence and room membership, fans out messages to live members,
//! and enqueues write-behind persistence jobs.

pub mod broadcast;
pub mod connection;
pub mod handlers;
pub mod protocol;
pub mod rooms;
pub mod server;

pub use server::{create_app, create_gateway_state, run, GatewayState};
