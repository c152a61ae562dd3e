//! CSV Storage for Frames
//!
//! Reading infers a kind per column: names from the processed schema take
//! their schema kind, anything else is classified from its non-empty cells
//! (float first, then timestamp, then text). Empty cells are nulls in both
//! directions, and timestamps travel as RFC 3339.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use market_frame::{schema, Column, ColumnKind, Frame};
use tracing::debug;

use crate::error::IngestError;
use crate::etl::{parse_float, parse_timestamp};

/// Read a CSV file into a frame.
pub fn read_csv(path: impl AsRef<Path>) -> Result<Frame, IngestError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record?;
        for (idx, slot) in cells.iter_mut().enumerate() {
            let cell = record.get(idx).unwrap_or("");
            slot.push((!cell.is_empty()).then(|| cell.to_string()));
        }
    }

    let mut frame = Frame::new();
    for (name, raw) in headers.into_iter().zip(cells) {
        let kind = schema_kind(&name).unwrap_or_else(|| infer_kind(&raw));
        frame.set_column(name, materialize(raw, kind))?;
    }
    debug!(
        rows = frame.len(),
        columns = frame.width(),
        path = %path.display(),
        "read csv"
    );
    Ok(frame)
}

/// Write a frame as CSV, creating parent directories as needed. Nulls
/// serialize as empty cells.
pub fn write_csv(frame: &Frame, path: impl AsRef<Path>) -> Result<(), IngestError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = WriterBuilder::new().from_path(path)?;
    writer.write_record(frame.column_names())?;
    for row in 0..frame.len() {
        let record: Vec<String> = frame
            .iter()
            .map(|(_, column)| render_cell(column, row))
            .collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;
    debug!(rows = frame.len(), path = %path.display(), "wrote csv");
    Ok(())
}

/// Processed CSV files under `dir` whose names start with `prefix`, sorted
/// ascending by file name. A missing directory is just an empty listing.
pub fn processed_files(dir: impl AsRef<Path>, prefix: &str) -> Result<Vec<PathBuf>, IngestError> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let matches = path.is_file()
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(prefix) && n.ends_with(".csv"));
        if matches {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// The newest processed file for `prefix`, by lexical file-name order.
/// Date-stamped names make that chronological order as well.
pub fn latest_processed(
    dir: impl AsRef<Path>,
    prefix: &str,
) -> Result<Option<PathBuf>, IngestError> {
    Ok(processed_files(dir, prefix)?.pop())
}

/// Processed-file name for a raw export, e.g. `pjm_raw_2025-03-01.csv`
/// becomes `pjm_processed_2025-03-01.csv`
pub fn processed_file_name(raw_name: &str) -> String {
    raw_name.replace("raw", "processed")
}

fn schema_kind(name: &str) -> Option<ColumnKind> {
    schema::PROCESSED_COLUMNS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, kind)| *kind)
}

fn infer_kind(cells: &[Option<String>]) -> ColumnKind {
    let mut saw_value = false;
    let mut all_floats = true;
    let mut all_timestamps = true;
    for cell in cells.iter().flatten() {
        saw_value = true;
        if all_floats && parse_float(cell).is_none() {
            all_floats = false;
        }
        if all_timestamps && parse_timestamp(cell).is_none() {
            all_timestamps = false;
        }
        if !all_floats && !all_timestamps {
            return ColumnKind::Text;
        }
    }
    if !saw_value || all_floats {
        ColumnKind::Float
    } else if all_timestamps {
        ColumnKind::Timestamp
    } else {
        ColumnKind::Text
    }
}

fn materialize(cells: Vec<Option<String>>, kind: ColumnKind) -> Column {
    match kind {
        ColumnKind::Float => Column::Float(
            cells
                .iter()
                .map(|cell| cell.as_deref().and_then(parse_float))
                .collect(),
        ),
        ColumnKind::Timestamp => Column::Timestamp(
            cells
                .iter()
                .map(|cell| cell.as_deref().and_then(parse_timestamp))
                .collect(),
        ),
        ColumnKind::Text => Column::Text(cells),
    }
}

fn render_cell(column: &Column, row: usize) -> String {
    match column {
        Column::Timestamp(v) => v[row].map(|t| t.to_rfc3339()).unwrap_or_default(),
        Column::Float(v) => v[row].map(|x| x.to_string()).unwrap_or_default(),
        Column::Text(v) => v[row].clone().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    fn processed_fixture() -> Frame {
        let base = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let mut frame = Frame::new();
        frame
            .set_column(
                schema::TIMESTAMP,
                Column::Timestamp(vec![
                    Some(base),
                    Some(base + chrono::Duration::minutes(5)),
                    None,
                ]),
            )
            .unwrap();
        frame
            .set_column(
                schema::NODE_NAME,
                Column::Text(vec![
                    Some("WESTERN HUB".to_string()),
                    None,
                    Some("WESTERN HUB".to_string()),
                ]),
            )
            .unwrap();
        frame
            .set_column(
                schema::TOTAL_LMP,
                Column::Float(vec![Some(30.25), Some(-12.5), None]),
            )
            .unwrap();
        frame
            .set_column(schema::LOAD, Column::null_float(3))
            .unwrap();
        frame
    }

    #[test]
    fn test_csv_round_trip_preserves_values_and_kinds() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("processed").join("pjm_processed_2025-03-01.csv");

        let frame = processed_fixture();
        write_csv(&frame, &path).unwrap();
        let back = read_csv(&path).unwrap();

        assert_eq!(back, frame);
        // The all-null load column keeps its schema kind across the trip.
        assert_eq!(back.require(schema::LOAD).unwrap().kind(), ColumnKind::Float);
    }

    #[test]
    fn test_inference_orders_float_timestamp_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mystery.csv");
        std::fs::write(
            &path,
            "a,b,c\n1.5,2025-03-01T00:00:00Z,apple\n2,2025-03-01 00:05:00,7\n,,\n",
        )
        .unwrap();

        let frame = read_csv(&path).unwrap();
        assert_eq!(frame.len(), 3);
        assert_eq!(frame.floats("a").unwrap(), &[Some(1.5), Some(2.0), None]);
        let b = frame.timestamps("b").unwrap();
        assert_eq!(b[0], Some(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()));
        assert_eq!(b[2], None);
        // Mixed numeric and word cells fall back to text.
        assert_eq!(
            frame.texts("c").unwrap(),
            &[Some("apple".to_string()), Some("7".to_string()), None]
        );
    }

    #[test]
    fn test_latest_processed_is_lexically_last() {
        let dir = tempdir().unwrap();
        for name in [
            "pjm_processed_2025-03-02.csv",
            "pjm_processed_2025-03-01.csv",
            "pjm_raw_2025-03-03.csv",
            "other_processed_2025-03-04.csv",
        ] {
            std::fs::write(dir.path().join(name), "a\n1\n").unwrap();
        }

        let latest = latest_processed(dir.path(), "pjm_processed_").unwrap();
        assert_eq!(
            latest,
            Some(dir.path().join("pjm_processed_2025-03-02.csv"))
        );

        let all = processed_files(dir.path(), "pjm_processed_").unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].ends_with("pjm_processed_2025-03-01.csv"));
    }

    #[test]
    fn test_missing_directory_lists_nothing() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("never_made");
        assert_eq!(latest_processed(&missing, "pjm_processed_").unwrap(), None);
    }

    #[test]
    fn test_processed_file_name_mirrors_raw_name() {
        assert_eq!(
            processed_file_name("pjm_raw_2025-03-01.csv"),
            "pjm_processed_2025-03-01.csv"
        );
    }
}
