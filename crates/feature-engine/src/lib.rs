//! Feature Engineering Engine
//!
//! Pure transformation from a cleaned market observation frame to a
//! feature frame: positional lag features, trailing rolling statistics,
//! and cyclical calendar encodings, followed by pruning of unusable
//! columns and rows.

mod calendar;
mod config;
mod engine;
mod error;
mod rolling;

pub use calendar::CyclicalFeatures;
pub use config::FeatureConfig;
pub use engine::FeatureEngine;
pub use error::FeatureError;
pub use rolling::{rolling_mean, rolling_std, shift};
