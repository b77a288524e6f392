//! Error types for linmach-core

use thiserror::Error;

use crate::store::StoreError;

/// Result type for linmach-core operations
pub type Result<T> = std::result::Result<T, MachineError>;

/// linmach-core error types
///
/// Every variant rejects the operation that produced it; a machine is never
/// left partially updated.
#[derive(Error, Debug)]
pub enum MachineError {
    #[error("Invalid shape: {rows} x {cols} ({reason})")]
    InvalidShape {
        rows: usize,
        cols: usize,
        reason: String,
    },

    #[error("Input count mismatch: expected {expected}, got {actual}")]
    InputCountMismatch { expected: usize, actual: usize },

    #[error("Output count mismatch: expected {expected}, got {actual}")]
    OutputCountMismatch { expected: usize, actual: usize },

    #[error("Malformed record entry '{entry}': {reason}")]
    MalformedRecord { entry: String, reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl MachineError {
    pub(crate) fn malformed(entry: impl Into<String>, reason: impl Into<String>) -> Self {
        MachineError::MalformedRecord {
            entry: entry.into(),
            reason: reason.into(),
        }
    }
}
