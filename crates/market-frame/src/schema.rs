//! Canonical Column Names and Source Tags
//!
//! The cleaned-data schema every downstream stage programs against, plus the
//! ordered candidate lists used to locate columns in vendor exports. Lookups
//! are case-sensitive and first-match-wins.

use crate::frame::ColumnKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const TIMESTAMP: &str = "interval_start_utc";
pub const SOURCE: &str = "source";
pub const NODE_ID: &str = "node_id";
pub const NODE_NAME: &str = "node_name";
pub const TOTAL_LMP: &str = "total_lmp";
pub const CONGESTION_PRICE: &str = "congestion_price";
pub const MARGINAL_LOSS_PRICE: &str = "marginal_loss_price";
pub const LOAD: &str = "load";
pub const LOAD_FORECAST: &str = "load_forecast";

/// Timestamp column candidates, cleaned name first, then vendor spellings
pub const TIMESTAMP_CANDIDATES: [&str; 5] = [
    TIMESTAMP,
    "interval_start",
    "Interval Start",
    "Time",
    "Forecast Time",
];

pub const LOCATION_CANDIDATES: [&str; 2] = [NODE_NAME, "Location Name"];
pub const LMP_CANDIDATES: [&str; 2] = [TOTAL_LMP, "LMP"];
pub const LOAD_CANDIDATES: [&str; 2] = [LOAD, "Load"];
pub const LOAD_FORECAST_CANDIDATES: [&str; 2] = [LOAD_FORECAST, "Load Forecast"];

/// Vendor header → cleaned name renames applied during ETL
pub const RAW_RENAMES: [(&str, &str); 7] = [
    ("Location", NODE_ID),
    ("Location Name", NODE_NAME),
    ("LMP", TOTAL_LMP),
    ("Congestion", CONGESTION_PRICE),
    ("Loss", MARGINAL_LOSS_PRICE),
    ("Load", LOAD),
    ("Load Forecast", LOAD_FORECAST),
];

/// Columns (and their kinds) a cleaned frame carries, in output order
pub const PROCESSED_COLUMNS: [(&str, ColumnKind); 9] = [
    (TIMESTAMP, ColumnKind::Timestamp),
    (NODE_ID, ColumnKind::Text),
    (NODE_NAME, ColumnKind::Text),
    (TOTAL_LMP, ColumnKind::Float),
    (CONGESTION_PRICE, ColumnKind::Float),
    (MARGINAL_LOSS_PRICE, ColumnKind::Float),
    (LOAD, ColumnKind::Float),
    (LOAD_FORECAST, ColumnKind::Float),
    (SOURCE, ColumnKind::Text),
];

/// Where an observation came from. The ingestion layer tags every row with
/// exactly one of these; anything else is a data-quality violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Real-time locational marginal price (5-minute market)
    RtLmp,
    /// Day-ahead locational marginal price (hourly market)
    DaLmp,
    /// Published load forecast
    LoadForecast,
    /// Metered actual load
    LoadMetered,
}

/// A source tag outside the fixed enumeration
#[derive(Debug, Clone, Error, PartialEq)]
#[error("unknown source tag '{0}'")]
pub struct UnknownSource(pub String);

impl Source {
    pub const ALL: [Source; 4] = [
        Source::RtLmp,
        Source::DaLmp,
        Source::LoadForecast,
        Source::LoadMetered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::RtLmp => "rt_lmp",
            Source::DaLmp => "da_lmp",
            Source::LoadForecast => "load_forecast",
            Source::LoadMetered => "load_metered",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = UnknownSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Source::ALL
            .into_iter()
            .find(|src| src.as_str() == s)
            .ok_or_else(|| UnknownSource(s.to_string()))
    }
}
