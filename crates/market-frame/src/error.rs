//! Frame Error Types

use crate::frame::ColumnKind;
use thiserror::Error;

/// Errors raised by frame construction and access
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameError {
    /// No column matched any of the tried names
    #[error("no column found matching any of {candidates:?}")]
    MissingColumn { candidates: Vec<String> },

    /// Column length disagrees with the frame's row count
    #[error("column '{column}' holds {actual} values but the frame has {expected} rows")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Column exists but holds a different kind of data
    #[error("column '{column}' is {actual}, expected {expected}")]
    KindMismatch {
        column: String,
        expected: ColumnKind,
        actual: ColumnKind,
    },

    /// Frames cannot be concatenated because their schemas differ
    #[error("frame schemas differ: {0}")]
    SchemaMismatch(String),
}

impl FrameError {
    /// Convenience constructor for a single missing column name
    pub fn missing(name: &str) -> Self {
        FrameError::MissingColumn {
            candidates: vec![name.to_string()],
        }
    }
}
