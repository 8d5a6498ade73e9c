//! Storage error types.

use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by a [`Store`](super::Store) implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend could not be reached or refused the operation
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Operation did not finish within the configured timeout
    #[error("storage operation '{operation}' timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    /// A commit was built against an inconsistent sequence
    #[error("invalid commit for hauler {hauler_id}: event sequence {event_sequence} does not follow {expected_sequence}")]
    InvalidCommit {
        hauler_id: String,
        expected_sequence: u64,
        event_sequence: u64,
    },

    /// An in-process lock was poisoned by a panicking writer
    #[error("lock poisoned")]
    LockPoisoned,
}
