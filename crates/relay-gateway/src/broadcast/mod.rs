//! Broadcast fan-out
//!
//! Delivers server events to every live member of a room.

mod fanout;

pub use fanout::Broadcaster;
