//! Cyclical Calendar Encodings
//!
//! Hour-of-day and day-of-week are periodic, so each is encoded as a
//! sine/cosine pair: adjacency survives the wrap-around (hour 23 sits next
//! to hour 0). Purely a function of the UTC timestamp, independent of row
//! order.

use chrono::{DateTime, Datelike, Timelike, Utc};
use std::f64::consts::TAU;

/// Calendar features for one timestamp column, null where the timestamp is
/// null
#[derive(Debug, Clone)]
pub struct CyclicalFeatures {
    /// Hour of day, 0-23
    pub hour: Vec<Option<f64>>,
    /// Day of week, 0-6 with Monday = 0
    pub dow: Vec<Option<f64>>,
    pub hour_sin: Vec<Option<f64>>,
    pub hour_cos: Vec<Option<f64>>,
    pub dow_sin: Vec<Option<f64>>,
    pub dow_cos: Vec<Option<f64>>,
}

impl CyclicalFeatures {
    /// Compute all six encodings for a timestamp column
    pub fn compute(times: &[Option<DateTime<Utc>>]) -> Self {
        let n = times.len();
        let mut features = Self {
            hour: vec![None; n],
            dow: vec![None; n],
            hour_sin: vec![None; n],
            hour_cos: vec![None; n],
            dow_sin: vec![None; n],
            dow_cos: vec![None; n],
        };
        for (i, time) in times.iter().enumerate() {
            let Some(time) = time else { continue };
            let hour = f64::from(time.hour());
            let dow = f64::from(time.weekday().num_days_from_monday());
            features.hour[i] = Some(hour);
            features.dow[i] = Some(dow);
            features.hour_sin[i] = Some((TAU * hour / 24.0).sin());
            features.hour_cos[i] = Some((TAU * hour / 24.0).cos());
            features.dow_sin[i] = Some((TAU * dow / 7.0).sin());
            features.dow_cos[i] = Some((TAU * dow / 7.0).cos());
        }
        features
    }
}
