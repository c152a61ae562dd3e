//! Feature Engine Error Types

use market_frame::FrameError;
use thiserror::Error;

/// Errors during feature construction
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FeatureError {
    /// A required input column is missing or has the wrong kind
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// The configuration cannot produce features
    #[error("invalid feature config: {0}")]
    InvalidConfig(String),
}
