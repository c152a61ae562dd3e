//! Error Types for Ingestion

use market_frame::FrameError;
use thiserror::Error;

/// Ingestion errors
#[derive(Debug, Error)]
pub enum IngestError {
    /// Frame-level failure (missing column, kind mismatch)
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// Filesystem failure
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV input
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Bad cleaning configuration
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
