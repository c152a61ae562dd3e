//! Feature Engineering Configuration

use market_frame::schema;
use serde::{Deserialize, Serialize};

/// Tunables for [`FeatureEngine`](crate::FeatureEngine).
///
/// Lags and windows are expressed in nominal hours and converted to row
/// counts via `steps_per_hour`. The conversion assumes a regular cadence;
/// on irregular data the offsets stay positional ("k rows back") rather
/// than time-aware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Rows per hour at the nominal cadence (12 for 5-minute data)
    pub steps_per_hour: usize,
    /// Lag offsets in nominal hours
    pub lag_hours: Vec<usize>,
    /// Trailing window for rolling stats, in nominal hours
    pub rolling_window_hours: usize,
    /// Columns whose missing fraction exceeds this are dropped
    pub max_missing_fraction: f64,
    /// Column the lag and rolling features are derived from
    pub value_column: String,
    /// Prefix for derived feature column names
    pub feature_prefix: String,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            steps_per_hour: 12,
            lag_hours: vec![1, 24, 168],
            rolling_window_hours: 24,
            max_missing_fraction: 0.99,
            value_column: schema::TOTAL_LMP.to_string(),
            feature_prefix: "lmp".to_string(),
        }
    }
}

impl FeatureConfig {
    /// Rolling window length in rows
    pub fn window_rows(&self) -> usize {
        self.rolling_window_hours * self.steps_per_hour
    }

    /// Rows of lead-in a frame needs before any row survives pruning
    pub fn min_leadin_rows(&self) -> usize {
        let max_lag = self
            .lag_hours
            .iter()
            .map(|h| h * self.steps_per_hour)
            .max()
            .unwrap_or(0);
        max_lag.max(self.window_rows().saturating_sub(1))
    }
}
