//! Raw Export Cleaning
//!
//! Turns a heterogeneous vendor export into the fixed processed schema:
//! one canonical UTC timestamp column, vendor headers renamed to cleaned
//! names, every processed column present (all-null when the export lacks
//! it), and prices clamped to a plausible market range. Cells that refuse
//! to coerce become nulls rather than errors; only a structurally unusable
//! export (no timestamp column at all) is rejected.

use chrono::{DateTime, NaiveDateTime, Utc};
use market_frame::{schema, Column, ColumnKind, Frame};
use tracing::debug;

use crate::config::CleanConfig;
use crate::error::IngestError;

/// Normalize a raw vendor export into the processed schema.
///
/// The input frame is left untouched; the returned frame carries exactly
/// [`schema::PROCESSED_COLUMNS`], in order.
pub fn clean_frame(raw: &Frame, config: &CleanConfig) -> Result<Frame, IngestError> {
    let (low, high) = config.price_clip;
    if !(low <= high) {
        return Err(IngestError::InvalidConfig(format!(
            "price_clip low {} exceeds high {}",
            low, high
        )));
    }

    let ts_name = raw.resolve_required(&schema::TIMESTAMP_CANDIDATES)?;
    let times = coerce_timestamp_values(raw.require(ts_name)?);

    let mut work = raw.clone();
    for (from, to) in schema::RAW_RENAMES {
        // Skip a rename that would shadow an already-cleaned column.
        if !work.has_column(to) {
            work.rename_column(from, to);
        }
    }

    let rows = work.len();
    let mut out = Frame::new();
    for (name, kind) in schema::PROCESSED_COLUMNS {
        let column = if name == schema::TIMESTAMP {
            Column::Timestamp(times.clone())
        } else {
            match work.column(name) {
                Some(col) => coerce_to_kind(col, kind),
                None => null_of_kind(kind, rows),
            }
        };
        out.set_column(name, column)?;
    }

    let clipped: Vec<Option<f64>> = out
        .floats(schema::TOTAL_LMP)?
        .iter()
        .map(|cell| cell.map(|v| v.clamp(low, high)))
        .collect();
    out.set_column(schema::TOTAL_LMP, Column::Float(clipped))?;

    debug!(
        rows,
        null_timestamps = out.require(schema::TIMESTAMP)?.null_count(),
        "cleaned raw export into processed schema"
    );
    Ok(out)
}

/// Timestamp values of a column of any kind, unparseable cells as nulls
pub(crate) fn coerce_timestamp_values(column: &Column) -> Vec<Option<DateTime<Utc>>> {
    match column {
        Column::Timestamp(v) => v.clone(),
        Column::Text(v) => v
            .iter()
            .map(|cell| cell.as_deref().and_then(parse_timestamp))
            .collect(),
        Column::Float(v) => vec![None; v.len()],
    }
}

/// Parse a timestamp cell: RFC 3339 first, then a naive
/// `YYYY-MM-DD HH:MM:SS` treated as UTC
pub(crate) fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Parse a float cell, rejecting non-finite values
pub(crate) fn parse_float(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn coerce_to_kind(column: &Column, kind: ColumnKind) -> Column {
    if column.kind() == kind {
        return column.clone();
    }
    match kind {
        ColumnKind::Float => Column::Float(match column {
            Column::Text(v) => v
                .iter()
                .map(|cell| cell.as_deref().and_then(parse_float))
                .collect(),
            Column::Timestamp(v) => vec![None; v.len()],
            Column::Float(v) => v.clone(),
        }),
        ColumnKind::Timestamp => Column::Timestamp(coerce_timestamp_values(column)),
        ColumnKind::Text => Column::Text(match column {
            Column::Float(v) => v.iter().map(|cell| cell.map(|x| x.to_string())).collect(),
            Column::Timestamp(v) => v
                .iter()
                .map(|cell| cell.map(|t| t.to_rfc3339()))
                .collect(),
            Column::Text(v) => v.clone(),
        }),
    }
}

fn null_of_kind(kind: ColumnKind, len: usize) -> Column {
    match kind {
        ColumnKind::Timestamp => Column::null_timestamp(len),
        ColumnKind::Float => Column::null_float(len),
        ColumnKind::Text => Column::null_text(len),
    }
}
