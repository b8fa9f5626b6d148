//! Domain entities
//!
//! The gateway's own data shapes: the write-behind persistence job and the
//! chat record types exchanged with the external store.

mod message;

pub use message::{ChatRecord, NewChatRecord, PersistenceJob};
