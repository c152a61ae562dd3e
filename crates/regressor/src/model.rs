//! Forecast Model Artifacts
//!
//! The model itself is trained elsewhere and exported as a JSON artifact
//! of named coefficients. [`Forecaster`] only scores: it never learns, so
//! serving carries no training stack.

use std::path::Path;

use market_frame::{Column, Frame};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::RegressorError;

/// Named linear coefficients exported by the training job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Feature names, one per weight, in weight order
    pub columns: Vec<String>,
    /// Coefficient per feature
    pub weights: Vec<f64>,
    /// Additive bias
    pub intercept: f64,
}

/// A loaded, arity-checked scoring model
#[derive(Debug)]
pub struct Forecaster {
    artifact: ModelArtifact,
}

impl Forecaster {
    /// Wrap an artifact, rejecting one whose names and weights disagree
    pub fn new(artifact: ModelArtifact) -> Result<Self, RegressorError> {
        if artifact.columns.len() != artifact.weights.len() {
            return Err(RegressorError::MalformedArtifact {
                columns: artifact.columns.len(),
                weights: artifact.weights.len(),
            });
        }
        Ok(Self { artifact })
    }

    /// Load an artifact from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegressorError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let artifact: ModelArtifact = serde_json::from_str(&raw)?;
        info!(
            path = %path.display(),
            features = artifact.columns.len(),
            "loaded model artifact"
        );
        Self::new(artifact)
    }

    /// Write the artifact as JSON, creating parent directories as needed
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RegressorError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(&self.artifact)?)?;
        Ok(())
    }

    /// Create a small fixed model for testing
    pub fn mock() -> Self {
        info!("creating mock forecaster");
        Self {
            artifact: ModelArtifact {
                columns: vec![
                    "lmp_lag_1h".to_string(),
                    "lmp_rolling_mean_24h".to_string(),
                    "hour_sin".to_string(),
                ],
                weights: vec![0.6, 0.35, 2.0],
                intercept: 1.5,
            },
        }
    }

    /// Feature names the model expects, in weight order
    pub fn columns(&self) -> &[String] {
        &self.artifact.columns
    }

    /// Score one frame row. A feature the frame lacks, a non-numeric
    /// column, or a null cell contributes 0.0.
    pub fn predict_row(&self, frame: &Frame, row: usize) -> f64 {
        let mut y = self.artifact.intercept;
        for (name, weight) in self.artifact.columns.iter().zip(&self.artifact.weights) {
            y += weight * feature_value(frame, name, row);
        }
        y
    }

    /// Score a dense matrix whose columns align with [`Forecaster::columns`]
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, RegressorError> {
        if x.ncols() != self.artifact.weights.len() {
            return Err(RegressorError::ShapeMismatch {
                expected: self.artifact.weights.len(),
                actual: x.ncols(),
            });
        }
        let weights = Array1::from_vec(self.artifact.weights.clone());
        Ok(x.dot(&weights) + self.artifact.intercept)
    }
}

fn feature_value(frame: &Frame, name: &str, row: usize) -> f64 {
    match frame.column(name) {
        Some(Column::Float(values)) => values.get(row).copied().flatten().unwrap_or(0.0),
        _ => 0.0,
    }
}
