//! Error types for nextup.
//!
//! Everything here is recoverable: callers report these to whoever drives the
//! scheduler, and the in-memory schedule stays intact.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Bad input on add/edit (non-numeric priority, unparseable deadline,
    /// empty description). The store is never touched when this is returned.
    #[error("invalid input: {0}")]
    Validation(String),

    /// A task id that no longer resolves to a live task (stale selection).
    #[error("task not found: {0}")]
    TaskNotFound(String),

    /// The schedule file does not exist.
    #[error("schedule file not found: {0}")]
    FileNotFound(String),

    /// Malformed persisted data. Load aborts and prior in-memory state is kept.
    #[error("malformed schedule data: {0}")]
    Parse(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
