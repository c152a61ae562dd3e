//! Price Forecast Regressor
//!
//! Assembles model-ready datasets from processed frames and scores them
//! with a coefficient artifact exported by the training job. Training
//! itself happens outside this workspace; serving only needs the weights.

mod dataset;
mod error;
mod metrics;
mod model;

pub use dataset::{
    design_matrix, feature_columns, load_processed, target_vector, time_split, TARGET_COLUMN,
};
pub use error::RegressorError;
pub use metrics::{mae, rmse};
pub use model::{Forecaster, ModelArtifact};
