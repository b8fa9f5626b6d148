//! Identity verification

mod verifier;

pub use verifier::{Claims, JwtVerifier};
