//! Identity verification tests
//!
//! The gateway verifies the credential once, before any state mutates.
//!
//! Run with: cargo test -p integration-tests --test auth_tests

use integration_tests::{expired_token, sign_token, sign_token_with, TEST_SECRET};
use relay_common::JwtVerifier;
use relay_core::{AuthError, IdentityVerifier, UserId};

#[test]
fn test_valid_token_yields_the_user_id() {
    let verifier = JwtVerifier::new(TEST_SECRET);
    let token = sign_token("alice");

    assert_eq!(verifier.verify(&token), Ok(UserId::from("alice")));
}

#[test]
fn test_expired_token_is_rejected() {
    let verifier = JwtVerifier::new(TEST_SECRET);
    let token = expired_token("alice");

    assert_eq!(verifier.verify(&token), Err(AuthError::TokenExpired));
}

#[test]
fn test_garbage_token_is_rejected() {
    let verifier = JwtVerifier::new(TEST_SECRET);

    assert_eq!(
        verifier.verify("not-a-jwt"),
        Err(AuthError::InvalidToken)
    );
}

#[test]
fn test_empty_token_is_rejected() {
    let verifier = JwtVerifier::new(TEST_SECRET);

    assert_eq!(verifier.verify(""), Err(AuthError::MissingToken));
}

#[test]
fn test_wrong_secret_is_rejected() {
    let verifier = JwtVerifier::new(TEST_SECRET);
    let token = sign_token_with(
        "some-other-secret",
        "alice",
        chrono::Utc::now().timestamp() + 3600,
    );

    assert_eq!(verifier.verify(&token), Err(AuthError::InvalidToken));
}

#[test]
fn test_blank_subject_is_rejected() {
    let verifier = JwtVerifier::new(TEST_SECRET);
    let token = sign_token("");

    assert_eq!(verifier.verify(&token), Err(AuthError::MissingSubject));
}
