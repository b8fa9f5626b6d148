//! Identity verifier collaborator interface

use crate::error::AuthError;
use crate::value_objects::UserId;

/// Validates a bearer credential and extracts the stable user identifier.
///
/// Pure function of the credential - no side effects, no I/O. The same
/// verifier is shared with the CRUD/auth layer so identity claims stay
/// consistent across surfaces.
pub trait IdentityVerifier: Send + Sync {
    /// Verify a credential, returning the user it identifies
    fn verify(&self, token: &str) -> Result<UserId, AuthError>;
}
