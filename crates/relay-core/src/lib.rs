//! # relay-core
//!
//! Domain layer containing identifiers, persistence job types, and the traits
//! the gateway's external collaborators implement (chat store, identity
//! verifier). This crate has zero dependencies on infrastructure (Redis, web
//! framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{ChatRecord, NewChatRecord, PersistenceJob};
pub use error::{AuthError, StoreError};
pub use traits::{ChatStore, IdentityVerifier, StoreResult};
pub use value_objects::{RoomId, UserId};
