//! Error types for log store operations

use std::fmt;

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during log store operations
#[derive(Debug)]
pub enum StoreError {
    /// The store file could not be opened (unwritable path, corrupt or
    /// incompatible database)
    OpenFailed(String),

    /// An insert, mark-reported or flush failed; the store is unchanged
    WriteFailed(String),

    /// A listing query failed
    ReadFailed(String),

    /// The store was closed; no further operations are possible
    Closed,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::OpenFailed(msg) => write!(f, "failed to open log store: {}", msg),
            StoreError::WriteFailed(msg) => write!(f, "log store write failed: {}", msg),
            StoreError::ReadFailed(msg) => write!(f, "log store read failed: {}", msg),
            StoreError::Closed => write!(f, "log store is closed"),
        }
    }
}

impl std::error::Error for StoreError {}
