//! Dataset Assembly
//!
//! Bridges processed frames to the dense matrices the model consumes.
//! Everything here is chronological: splits cut along the sorted time
//! axis, never at random, so evaluation rows all come after training
//! rows.

use std::path::Path;

use market_frame::{schema, Column, Frame};
use ndarray::{Array1, Array2};
use tracing::debug;

use crate::error::RegressorError;

/// Column the model predicts
pub const TARGET_COLUMN: &str = schema::TOTAL_LMP;

/// Identity and target columns, never fed to the model
const NON_FEATURE_COLUMNS: [&str; 5] = [
    schema::TIMESTAMP,
    schema::NODE_ID,
    schema::NODE_NAME,
    schema::SOURCE,
    TARGET_COLUMN,
];

/// Names of the columns the model trains on, in frame order
pub fn feature_columns(frame: &Frame) -> Vec<String> {
    frame
        .column_names()
        .into_iter()
        .filter(|name| !NON_FEATURE_COLUMNS.contains(name))
        .map(str::to_string)
        .collect()
}

/// Split a frame into train and test halves along the time axis.
///
/// Rows are sorted by timestamp first; the cut lands at
/// `len * (1 - test_ratio)` so the test half is strictly the most recent
/// data.
pub fn time_split(frame: &Frame, test_ratio: f64) -> Result<(Frame, Frame), RegressorError> {
    let sorted = frame.sort_by_time(schema::TIMESTAMP)?;
    let cutoff = (sorted.len() as f64 * (1.0 - test_ratio)) as usize;
    let cutoff = cutoff.min(sorted.len());
    let train_rows: Vec<usize> = (0..cutoff).collect();
    let test_rows: Vec<usize> = (cutoff..sorted.len()).collect();
    Ok((sorted.select_rows(&train_rows), sorted.select_rows(&test_rows)))
}

/// Dense feature matrix for the named columns, one row per frame row.
///
/// Nulls fill as 0.0. Text cells coerce to numbers where they parse and
/// 0.0 where they do not; timestamp columns contribute zeros.
pub fn design_matrix(frame: &Frame, columns: &[String]) -> Result<Array2<f64>, RegressorError> {
    let mut matrix = Array2::zeros((frame.len(), columns.len()));
    for (j, name) in columns.iter().enumerate() {
        match frame.require(name)? {
            Column::Float(values) => {
                for (i, cell) in values.iter().enumerate() {
                    matrix[[i, j]] = cell.unwrap_or(0.0);
                }
            }
            Column::Text(values) => {
                for (i, cell) in values.iter().enumerate() {
                    matrix[[i, j]] = cell
                        .as_deref()
                        .and_then(|s| s.parse::<f64>().ok())
                        .unwrap_or(0.0);
                }
            }
            Column::Timestamp(_) => {}
        }
    }
    Ok(matrix)
}

/// Target values with nulls repaired by forward fill, then backward fill
/// for any leading run. An all-null target degenerates to zeros.
pub fn target_vector(frame: &Frame) -> Result<Array1<f64>, RegressorError> {
    let mut filled: Vec<Option<f64>> = frame.floats(TARGET_COLUMN)?.to_vec();

    let mut last = None;
    for cell in filled.iter_mut() {
        match *cell {
            Some(v) => last = Some(v),
            None => *cell = last,
        }
    }
    let mut next = None;
    for cell in filled.iter_mut().rev() {
        match *cell {
            Some(v) => next = Some(v),
            None => *cell = next,
        }
    }

    Ok(filled.into_iter().map(|cell| cell.unwrap_or(0.0)).collect())
}

/// Concatenate the newest `limit_files` processed files under `dir` into
/// one frame (all of them when `None`).
pub fn load_processed(
    dir: impl AsRef<Path>,
    prefix: &str,
    limit_files: Option<usize>,
) -> Result<Frame, RegressorError> {
    let mut files = ingestion::processed_files(dir, prefix)?;
    if files.is_empty() {
        return Err(RegressorError::NoProcessedFiles);
    }
    if let Some(limit) = limit_files {
        let skip = files.len().saturating_sub(limit);
        files.drain(..skip);
    }

    let mut frames = Vec::with_capacity(files.len());
    for file in &files {
        frames.push(ingestion::read_csv(file)?);
    }
    let merged = Frame::concat(&frames)?;
    debug!(files = files.len(), rows = merged.len(), "loaded processed history");
    Ok(merged)
}
