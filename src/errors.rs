//! Typed error hierarchy for the agent-factory coordinator.
//!
//! Three top-level enums cover the three subsystems:
//! - `LockError` — advisory lock acquisition failures
//! - `QueueError` — task board lookup and transition failures
//! - `PhaseError` — phase record load/store failures
//!
//! None of these are retried internally; the failure boundary is the
//! operation call itself.

use thiserror::Error;

use crate::queue::QueueName;

/// Errors from the lock manager.
#[derive(Debug, Error)]
pub enum LockError {
    #[error("Resource '{0}' is locked by another worker")]
    Held(String),

    #[error("Failed to create lock marker at {path}: {source}")]
    MarkerFailed {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from the task queue engine.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Task '{filename}' not found in queue '{queue}'")]
    TaskNotFound { filename: String, queue: QueueName },

    #[error("Failed to read task file at {path}: {source}")]
    ReadFailed {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write task file at {path}: {source}")]
    WriteFailed {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to move task from {from} to {to}: {source}")]
    MoveFailed {
        from: std::path::PathBuf,
        to: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Lock(#[from] LockError),
}

/// Errors from the phase engine.
#[derive(Debug, Error)]
pub enum PhaseError {
    #[error("Phase index {0} is out of range (expected 0-5)")]
    OutOfRange(usize),

    #[error("Phase record not found at {path}: {source}")]
    MissingRecord {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write phase record at {path}: {source}")]
    WriteFailed {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Lock(#[from] LockError),
}

/// Error for parsing a queue name from user input.
#[derive(Debug, Error)]
#[error("Unknown queue '{0}' (expected backlog, todo, in-progress, review, done)")]
pub struct ParseQueueError(pub String);
