//! JWT identity verification
//!
//! Decodes and validates bearer tokens using the `jsonwebtoken` crate. Tokens
//! are issued by the account service; this side only verifies them and pulls
//! out the `userId` claim.

use jsonwebtoken::{decode, DecodingKey, Validation};
use relay_core::{AuthError, IdentityVerifier, UserId};
use serde::{Deserialize, Serialize};

/// JWT claims structure
///
/// The identity claim is `userId`, matching what the account service signs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User identifier
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Verifier for HS256-signed bearer tokens
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
}

impl JwtVerifier {
    /// Create a new verifier with the shared signing secret
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Decode and validate a token, returning its claims
    pub fn decode_token(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::default();

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })?;

        Ok(token_data.claims)
    }
}

impl IdentityVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<UserId, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let claims = self.decode_token(token)?;

        if claims.user_id.is_empty() {
            return Err(AuthError::MissingSubject);
        }

        Ok(UserId::from(claims.user_id))
    }
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier").finish_non_exhaustive()
    }
}
