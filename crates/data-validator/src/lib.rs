//! Data-Quality Validation for Market Frames
//!
//! Profiles a cleaned observation frame and checks it against fixed
//! domain-knowledge bounds plus statistically-derived per-segment bounds.
//! The result is a full report of every rule scored, so a failing batch
//! shows all of its problems at once.

mod error;
mod predicate;
mod profile;
mod rule;
mod validator;

pub use error::ValidationError;
pub use predicate::Predicate;
pub use profile::SegmentBound;
pub use rule::{Check, Rule, RuleOutcome, ValidationReport};
pub use validator::{Validator, ValidatorConfig};
