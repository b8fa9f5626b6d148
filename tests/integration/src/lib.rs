//! Integration test utilities for the relay gateway
//!
//! This crate provides helpers for driving gateway sessions in-process
//! (no network, no Redis) plus fixtures for tokens and a fake chat store.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
