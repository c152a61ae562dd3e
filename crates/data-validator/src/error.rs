//! Validation Error Types

use market_frame::FrameError;
use thiserror::Error;

/// Errors raised before any rule can be scored.
///
/// These mean the frame could not be profiled at all; a frame that profiles
/// fine but breaks rules is reported through
/// [`ValidationReport`](crate::ValidationReport), not through this type.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    /// A column a rule needs is missing or has the wrong kind
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// A rule's tolerance is not a fraction
    #[error("rule '{rule_id}' has mostly {mostly}, expected a value in [0, 1]")]
    InvalidTolerance { rule_id: String, mostly: f64 },
}
