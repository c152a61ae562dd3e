//! Cleaning Configuration

use serde::{Deserialize, Serialize};

/// Knobs for [`clean_frame`](crate::etl::clean_frame)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanConfig {
    /// Inclusive `(low, high)` clamp applied to `total_lmp` after numeric
    /// coercion. Vendor exports occasionally carry sentinel prices far
    /// outside the plausible market range.
    pub price_clip: (f64, f64),
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            price_clip: (-200.0, 5000.0),
        }
    }
}
