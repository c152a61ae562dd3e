//! Feature Frame Assembly
//!
//! `build_features` is the whole public surface: a pure transformation from
//! a cleaned observation frame to a feature frame. Steps run in a fixed
//! order because later ones depend on earlier derived columns and on time
//! ordering: sort, lags, rolling stats, calendar encodings, then column and
//! row pruning.

use crate::calendar::CyclicalFeatures;
use crate::config::FeatureConfig;
use crate::error::FeatureError;
use crate::rolling;
use market_frame::{schema, Column, Frame};
use tracing::debug;

/// Derives lag, rolling-window, and cyclical time features from a cleaned
/// observation frame
pub struct FeatureEngine {
    config: FeatureConfig,
}

impl FeatureEngine {
    /// Create an engine with the given configuration
    pub fn new(config: FeatureConfig) -> Self {
        Self { config }
    }

    /// The engine's configuration
    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Build the feature frame.
    ///
    /// The input is never mutated. The output keeps every surviving input
    /// column, appends the derived feature columns, drops columns that are
    /// almost entirely missing, and finally drops every row still holding a
    /// missing value. Too little history is not an error: the result is
    /// simply empty, and callers must check for that.
    pub fn build_features(&self, frame: &Frame) -> Result<Frame, FeatureError> {
        if self.config.steps_per_hour == 0 {
            return Err(FeatureError::InvalidConfig(
                "steps_per_hour must be at least 1".to_string(),
            ));
        }
        if self.config.rolling_window_hours == 0 {
            return Err(FeatureError::InvalidConfig(
                "rolling_window_hours must be at least 1".to_string(),
            ));
        }

        let ts_col = frame.resolve_required(&schema::TIMESTAMP_CANDIDATES)?;
        frame.floats(&self.config.value_column)?;

        let mut out = frame.sort_by_time(ts_col)?;
        let values = out.floats(&self.config.value_column)?.to_vec();
        let prefix = &self.config.feature_prefix;

        for &hours in &self.config.lag_hours {
            let steps = hours * self.config.steps_per_hour;
            out.set_column(
                format!("{prefix}_lag_{hours}h"),
                Column::Float(rolling::shift(&values, steps)),
            )?;
        }

        let window = self.config.window_rows();
        out.set_column(
            format!("{prefix}_rolling_mean_{}h", self.config.rolling_window_hours),
            Column::Float(rolling::rolling_mean(&values, window)),
        )?;
        out.set_column(
            format!("{prefix}_rolling_std_{}h", self.config.rolling_window_hours),
            Column::Float(rolling::rolling_std(&values, window)),
        )?;

        let times = out.timestamps(ts_col)?.to_vec();
        let calendar = CyclicalFeatures::compute(&times);
        out.set_column("hour", Column::Float(calendar.hour))?;
        out.set_column("dow", Column::Float(calendar.dow))?;
        out.set_column("hour_sin", Column::Float(calendar.hour_sin))?;
        out.set_column("hour_cos", Column::Float(calendar.hour_cos))?;
        out.set_column("dow_sin", Column::Float(calendar.dow_sin))?;
        out.set_column("dow_cos", Column::Float(calendar.dow_cos))?;

        let sparse: Vec<String> = out
            .iter()
            .filter(|(_, column)| column.missing_fraction() > self.config.max_missing_fraction)
            .map(|(name, _)| name.to_string())
            .collect();
        if !sparse.is_empty() {
            debug!("Dropping {} mostly-missing columns: {:?}", sparse.len(), sparse);
            let names: Vec<&str> = sparse.iter().map(String::as_str).collect();
            out.drop_columns(&names);
        }

        let complete = out.filter_rows(|row| out.iter().all(|(_, column)| !column.is_null(row)));
        debug!(
            "Built features: {} rows in, {} rows out, {} columns",
            frame.len(),
            complete.len(),
            complete.width()
        );
        Ok(complete)
    }
}

impl Default for FeatureEngine {
    fn default() -> Self {
        Self::new(FeatureConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use market_frame::FrameError;

    fn ts(i: usize) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(5 * i as i64)
    }

    /// The 500-row, 5-minute fixture: prices cycle 30..44 at one node.
    fn fixture(n: usize) -> Frame {
        let mut frame = Frame::new();
        frame
            .set_column(
                schema::TIMESTAMP,
                Column::Timestamp((0..n).map(|i| Some(ts(i))).collect()),
            )
            .unwrap();
        frame
            .set_column(
                schema::NODE_NAME,
                Column::Text(vec![Some("SomeNode".to_string()); n]),
            )
            .unwrap();
        frame
            .set_column(
                schema::TOTAL_LMP,
                Column::Float((0..n).map(|i| Some(30.0 + (i % 15) as f64)).collect()),
            )
            .unwrap();
        frame
            .set_column(
                schema::SOURCE,
                Column::Text(vec![Some("rt_lmp".to_string()); n]),
            )
            .unwrap();
        frame
    }

    /// Small positional config: 1 row per "hour", one 2-hour lag, 3-row
    /// window, keep all columns.
    fn tiny_config() -> FeatureConfig {
        FeatureConfig {
            steps_per_hour: 1,
            lag_hours: vec![2],
            rolling_window_hours: 3,
            max_missing_fraction: 0.99,
            value_column: schema::TOTAL_LMP.to_string(),
            feature_prefix: "lmp".to_string(),
        }
    }

    #[test]
    fn test_output_is_sorted_by_timestamp() {
        let engine = FeatureEngine::new(tiny_config());
        let mut frame = Frame::new();
        let order = [3usize, 0, 4, 1, 5, 2, 6, 7, 8, 9];
        frame
            .set_column(
                schema::TIMESTAMP,
                Column::Timestamp(order.iter().map(|&i| Some(ts(i))).collect()),
            )
            .unwrap();
        frame
            .set_column(
                schema::TOTAL_LMP,
                Column::Float(order.iter().map(|&i| Some(i as f64)).collect()),
            )
            .unwrap();

        let features = engine.build_features(&frame).unwrap();
        let times = features.timestamps(schema::TIMESTAMP).unwrap();
        assert!(times.windows(2).all(|w| w[0] <= w[1]));
        // Values follow their timestamps through the sort.
        let values = features.floats(schema::TOTAL_LMP).unwrap();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_lag_is_positional_not_time_aware() {
        let engine = FeatureEngine::new(tiny_config());
        let mut frame = Frame::new();
        // An 8-day gap between rows 2 and 3; the lag ignores it.
        let times = vec![
            Some(ts(0)),
            Some(ts(1)),
            Some(ts(2)),
            Some(ts(2) + Duration::days(8)),
            Some(ts(2) + Duration::days(8) + Duration::minutes(5)),
            Some(ts(2) + Duration::days(8) + Duration::minutes(10)),
        ];
        frame
            .set_column(schema::TIMESTAMP, Column::Timestamp(times))
            .unwrap();
        frame
            .set_column(
                schema::TOTAL_LMP,
                Column::Float((0..6).map(|i| Some(10.0 * i as f64)).collect()),
            )
            .unwrap();

        let features = engine.build_features(&frame).unwrap();
        assert_eq!(features.len(), 4);
        let lag = features.floats("lmp_lag_2h").unwrap();
        let values = features.floats(schema::TOTAL_LMP).unwrap();
        // Rows 0 and 1 were pruned for missing lag. Each surviving lag is
        // the value two rows back in sorted order, gap or no gap.
        for (i, lagged) in lag.iter().enumerate() {
            let original_row = i + 2;
            assert_eq!(lagged.unwrap(), 10.0 * (original_row - 2) as f64);
            assert_eq!(values[i].unwrap(), 10.0 * original_row as f64);
        }
    }

    #[test]
    fn test_rolling_stats_match_window_slices() {
        let engine = FeatureEngine::new(tiny_config());
        let frame = fixture(10);
        let features = engine.build_features(&frame).unwrap();
        let mean = features.floats("lmp_rolling_mean_3h").unwrap();
        let std = features.floats("lmp_rolling_std_3h").unwrap();
        let raw: Vec<f64> = (0..10).map(|i| 30.0 + (i % 15) as f64).collect();

        // First surviving row is original row 2 (lag 2 + window 3).
        for (i, (m, s)) in mean.iter().zip(std).enumerate() {
            let end = i + 2;
            let window = &raw[end - 2..=end];
            let expect_mean = window.iter().sum::<f64>() / 3.0;
            let ss: f64 = window.iter().map(|v| (v - expect_mean).powi(2)).sum();
            let expect_std = (ss / 2.0).sqrt();
            assert!((m.unwrap() - expect_mean).abs() < 1e-9);
            assert!((s.unwrap() - expect_std).abs() < 1e-9);
        }
    }

    #[test]
    fn test_cyclical_features_are_unit_vectors() {
        let engine = FeatureEngine::new(tiny_config());
        let features = engine.build_features(&fixture(20)).unwrap();
        let hs = features.floats("hour_sin").unwrap();
        let hc = features.floats("hour_cos").unwrap();
        let ds = features.floats("dow_sin").unwrap();
        let dc = features.floats("dow_cos").unwrap();
        for i in 0..features.len() {
            let h = hs[i].unwrap().powi(2) + hc[i].unwrap().powi(2);
            let d = ds[i].unwrap().powi(2) + dc[i].unwrap().powi(2);
            assert!((h - 1.0).abs() < 1e-9);
            assert!((d - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_end_to_end_five_hundred_rows() {
        let engine = FeatureEngine::default();
        let features = engine.build_features(&fixture(500)).unwrap();

        // The 168h lag (2016 rows) never fills on 500 rows, so its column
        // is dropped; the 24h lag and rolling stats leave rows 288..499.
        assert_eq!(features.len(), 212);
        assert!(features.len() < 500);
        assert!(!features.has_column("lmp_lag_168h"));
        for column in [
            "lmp_lag_1h",
            "lmp_lag_24h",
            "lmp_rolling_mean_24h",
            "lmp_rolling_std_24h",
            "hour",
            "dow",
            "hour_sin",
            "hour_cos",
            "dow_sin",
            "dow_cos",
        ] {
            assert!(features.has_column(column), "missing {column}");
        }
        // Original columns survive alongside the features.
        assert!(features.has_column(schema::NODE_NAME));
        assert!(features.has_column(schema::SOURCE));

        // First surviving row is original row 288: its 24h lag is the very
        // first value of the series.
        let times = features.timestamps(schema::TIMESTAMP).unwrap();
        assert_eq!(times[0], Some(ts(288)));
        let lag_24 = features.floats("lmp_lag_24h").unwrap();
        assert_eq!(lag_24[0], Some(30.0));

        // No nulls anywhere in the output.
        for (name, column) in features.iter() {
            assert_eq!(column.null_count(), 0, "nulls left in {name}");
        }
    }

    #[test]
    fn test_column_pruning_boundary_is_strict() {
        // A column missing in exactly 99% of rows sits at the threshold
        // and must be kept.
        let engine = FeatureEngine::new(FeatureConfig {
            steps_per_hour: 1,
            lag_hours: vec![],
            rolling_window_hours: 1,
            ..FeatureConfig::default()
        });
        let n = 100;
        let mut frame = fixture(n);
        let mut extra = vec![None; n];
        extra[40] = Some(7.0);
        frame
            .set_column("outage_flag", Column::Float(extra))
            .unwrap();

        let features = engine.build_features(&frame).unwrap();
        // 99/100 missing == threshold, not above it.
        assert!(features.has_column("outage_flag"));
        // A window of 1 gives no degrees of freedom, so the rolling std is
        // entirely null and gets dropped.
        assert!(!features.has_column("lmp_rolling_std_1h"));
        // Row pruning then keeps only the row where the sparse column is
        // populated.
        assert_eq!(features.len(), 1);
        assert_eq!(features.floats("outage_flag").unwrap()[0], Some(7.0));
    }

    #[test]
    fn test_too_little_data_yields_empty_frame_not_error() {
        let engine = FeatureEngine::new(FeatureConfig {
            steps_per_hour: 12,
            lag_hours: vec![1],
            rolling_window_hours: 1,
            ..FeatureConfig::default()
        });
        let n = 13;
        let mut frame = fixture(n);
        let mut values: Vec<Option<f64>> = (0..n).map(|i| Some(30.0 + i as f64)).collect();
        values[12] = None;
        frame
            .set_column(schema::TOTAL_LMP, Column::Float(values))
            .unwrap();

        let features = engine.build_features(&frame).unwrap();
        assert!(features.is_empty());
    }

    #[test]
    fn test_input_frame_is_untouched() {
        let engine = FeatureEngine::default();
        let frame = fixture(500);
        let before = frame.clone();
        let _ = engine.build_features(&frame).unwrap();
        assert_eq!(frame, before);
    }

    #[test]
    fn test_missing_value_column_is_an_error() {
        let engine = FeatureEngine::default();
        let mut frame = fixture(10);
        frame.drop_columns(&[schema::TOTAL_LMP]);
        let err = engine.build_features(&frame).unwrap_err();
        assert!(matches!(
            err,
            FeatureError::Frame(FrameError::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_missing_timestamp_column_is_an_error() {
        let engine = FeatureEngine::default();
        let mut frame = fixture(10);
        frame.drop_columns(&[schema::TIMESTAMP]);
        let err = engine.build_features(&frame).unwrap_err();
        assert!(matches!(
            err,
            FeatureError::Frame(FrameError::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_zero_window_config_is_rejected() {
        let engine = FeatureEngine::new(FeatureConfig {
            rolling_window_hours: 0,
            ..FeatureConfig::default()
        });
        let err = engine.build_features(&fixture(10)).unwrap_err();
        assert!(matches!(err, FeatureError::InvalidConfig(_)));
    }
}
