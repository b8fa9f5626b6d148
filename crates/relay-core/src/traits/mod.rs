//! Collaborator traits
//!
//! Narrow interfaces for the external services the gateway depends on. The
//! concrete implementations live in infrastructure crates (or in test fakes);
//! the core logic only ever sees these traits.

mod store;
mod verifier;

pub use store::{ChatStore, StoreResult};
pub use verifier::IdentityVerifier;
