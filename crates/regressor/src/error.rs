//! Error Types for the Regressor

use ingestion::IngestError;
use market_frame::FrameError;
use thiserror::Error;

/// Regressor errors
#[derive(Debug, Error)]
pub enum RegressorError {
    /// Frame-level failure (missing column, kind mismatch)
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// Failure reading processed storage
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// The processed directory holds nothing to train or serve from
    #[error("no processed files found")]
    NoProcessedFiles,

    /// Artifact whose column names and weights disagree
    #[error("artifact declares {columns} columns but {weights} weights")]
    MalformedArtifact { columns: usize, weights: usize },

    /// Design matrix whose width disagrees with the model
    #[error("design matrix has {actual} columns, model expects {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Unreadable artifact JSON
    #[error("model artifact error: {0}")]
    Artifact(#[from] serde_json::Error),

    /// Filesystem failure
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
