//! Gateway wire protocol
//!
//! Defines the text-encoded event shapes and the application close codes.

mod close_codes;
mod events;

pub use close_codes::CloseCode;
pub use events::{ClientEvent, ServerEvent};
