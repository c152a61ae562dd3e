//! Column-Oriented Observation Table

use crate::error::FrameError;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::fmt;

/// Kind tag for a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// UTC instants
    Timestamp,
    /// Real-valued measurements
    Float,
    /// Categorical / identifier strings
    Text,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Timestamp => write!(f, "timestamp"),
            ColumnKind::Float => write!(f, "float"),
            ColumnKind::Text => write!(f, "text"),
        }
    }
}

/// A single named column's data. Missing values are `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Timestamp(Vec<Option<DateTime<Utc>>>),
    Float(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl Column {
    /// Kind of this column
    pub fn kind(&self) -> ColumnKind {
        match self {
            Column::Timestamp(_) => ColumnKind::Timestamp,
            Column::Float(_) => ColumnKind::Float,
            Column::Text(_) => ColumnKind::Text,
        }
    }

    /// Number of values (rows)
    pub fn len(&self) -> usize {
        match self {
            Column::Timestamp(v) => v.len(),
            Column::Float(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    /// Whether the column has no rows
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All-null float column of the given length
    pub fn null_float(len: usize) -> Column {
        Column::Float(vec![None; len])
    }

    /// All-null text column of the given length
    pub fn null_text(len: usize) -> Column {
        Column::Text(vec![None; len])
    }

    /// All-null timestamp column of the given length
    pub fn null_timestamp(len: usize) -> Column {
        Column::Timestamp(vec![None; len])
    }

    /// Whether the value at `row` is missing
    pub fn is_null(&self, row: usize) -> bool {
        match self {
            Column::Timestamp(v) => v[row].is_none(),
            Column::Float(v) => v[row].is_none(),
            Column::Text(v) => v[row].is_none(),
        }
    }

    /// Number of missing values
    pub fn null_count(&self) -> usize {
        match self {
            Column::Timestamp(v) => v.iter().filter(|x| x.is_none()).count(),
            Column::Float(v) => v.iter().filter(|x| x.is_none()).count(),
            Column::Text(v) => v.iter().filter(|x| x.is_none()).count(),
        }
    }

    /// Fraction of missing values, 0.0 for an empty column
    pub fn missing_fraction(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.null_count() as f64 / self.len() as f64
        }
    }

    /// New column holding the values at `rows`, in that order
    pub fn take(&self, rows: &[usize]) -> Column {
        match self {
            Column::Timestamp(v) => Column::Timestamp(rows.iter().map(|&i| v[i]).collect()),
            Column::Float(v) => Column::Float(rows.iter().map(|&i| v[i]).collect()),
            Column::Text(v) => Column::Text(rows.iter().map(|&i| v[i].clone()).collect()),
        }
    }
}

/// Ordered table of named columns of equal length.
///
/// Column order is preserved through every operation; downstream consumers
/// rely on stable column names, so renames are breaking changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    columns: Vec<(String, Column)>,
}

impl Frame {
    /// Empty frame with no columns
    pub fn new() -> Self {
        Frame::default()
    }

    /// Number of rows (length of the first column, 0 when column-less)
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, |(_, c)| c.len())
    }

    /// Whether the frame has no rows
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Column names in order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Iterate columns in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.columns.iter().map(|(n, c)| (n.as_str(), c))
    }

    /// Whether a column with this exact name exists (case-sensitive)
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|(n, _)| n == name)
    }

    /// Look up a column by exact name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
    }

    /// Look up a column, erroring when absent
    pub fn require(&self, name: &str) -> Result<&Column, FrameError> {
        self.column(name).ok_or_else(|| FrameError::missing(name))
    }

    /// Float values of a column
    pub fn floats(&self, name: &str) -> Result<&[Option<f64>], FrameError> {
        match self.require(name)? {
            Column::Float(v) => Ok(v),
            other => Err(FrameError::KindMismatch {
                column: name.to_string(),
                expected: ColumnKind::Float,
                actual: other.kind(),
            }),
        }
    }

    /// Text values of a column
    pub fn texts(&self, name: &str) -> Result<&[Option<String>], FrameError> {
        match self.require(name)? {
            Column::Text(v) => Ok(v),
            other => Err(FrameError::KindMismatch {
                column: name.to_string(),
                expected: ColumnKind::Text,
                actual: other.kind(),
            }),
        }
    }

    /// Timestamp values of a column
    pub fn timestamps(&self, name: &str) -> Result<&[Option<DateTime<Utc>>], FrameError> {
        match self.require(name)? {
            Column::Timestamp(v) => Ok(v),
            other => Err(FrameError::KindMismatch {
                column: name.to_string(),
                expected: ColumnKind::Timestamp,
                actual: other.kind(),
            }),
        }
    }

    /// Insert or replace a column. Replacement keeps the original position;
    /// a new column is appended. Length must match the frame unless the
    /// frame is still column-less.
    pub fn set_column(
        &mut self,
        name: impl Into<String>,
        column: Column,
    ) -> Result<(), FrameError> {
        let name = name.into();
        if self.width() > 0 && column.len() != self.len() {
            return Err(FrameError::LengthMismatch {
                column: name,
                expected: self.len(),
                actual: column.len(),
            });
        }
        if let Some(slot) = self.columns.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = column;
        } else {
            self.columns.push((name, column));
        }
        Ok(())
    }

    /// Rename a column in place; returns false when `from` does not exist
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        match self.columns.iter_mut().find(|(n, _)| n == from) {
            Some(slot) => {
                slot.0 = to.to_string();
                true
            }
            None => false,
        }
    }

    /// Drop the named columns; unknown names are ignored
    pub fn drop_columns(&mut self, names: &[&str]) {
        self.columns.retain(|(n, _)| !names.contains(&n.as_str()));
    }

    /// First candidate that names an existing column, in candidate order
    pub fn resolve<'a>(&self, candidates: &[&'a str]) -> Option<&'a str> {
        candidates.iter().copied().find(|c| self.has_column(c))
    }

    /// Like [`Frame::resolve`] but a miss is a typed error, never a sentinel
    pub fn resolve_required<'a>(&self, candidates: &[&'a str]) -> Result<&'a str, FrameError> {
        self.resolve(candidates).ok_or(FrameError::MissingColumn {
            candidates: candidates.iter().map(|c| c.to_string()).collect(),
        })
    }

    /// New frame holding the rows at `rows`, in that order
    pub fn select_rows(&self, rows: &[usize]) -> Frame {
        Frame {
            columns: self
                .columns
                .iter()
                .map(|(n, c)| (n.clone(), c.take(rows)))
                .collect(),
        }
    }

    /// New frame keeping only rows where `keep(row)` is true
    pub fn filter_rows(&self, keep: impl Fn(usize) -> bool) -> Frame {
        let rows: Vec<usize> = (0..self.len()).filter(|&i| keep(i)).collect();
        self.select_rows(&rows)
    }

    /// New frame sorted ascending by the given timestamp column.
    ///
    /// The sort is stable (ties keep input order) and null timestamps go
    /// last.
    pub fn sort_by_time(&self, time_column: &str) -> Result<Frame, FrameError> {
        let ts = self.timestamps(time_column)?;
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by(|&a, &b| match (ts[a], ts[b]) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        Ok(self.select_rows(&order))
    }

    /// Concatenate frames row-wise. All frames must carry identical column
    /// names and kinds in identical order.
    pub fn concat(frames: &[Frame]) -> Result<Frame, FrameError> {
        let Some(first) = frames.first() else {
            return Ok(Frame::new());
        };
        let template: Vec<(&str, ColumnKind)> = first
            .columns
            .iter()
            .map(|(n, c)| (n.as_str(), c.kind()))
            .collect();
        for frame in &frames[1..] {
            let shape: Vec<(&str, ColumnKind)> = frame
                .columns
                .iter()
                .map(|(n, c)| (n.as_str(), c.kind()))
                .collect();
            if shape != template {
                return Err(FrameError::SchemaMismatch(format!(
                    "expected columns {:?}, found {:?}",
                    template.iter().map(|(n, _)| n).collect::<Vec<_>>(),
                    shape.iter().map(|(n, _)| n).collect::<Vec<_>>(),
                )));
            }
        }
        let mut columns = first.columns.clone();
        for frame in &frames[1..] {
            for (slot, (_, incoming)) in columns.iter_mut().zip(&frame.columns) {
                match (&mut slot.1, incoming) {
                    (Column::Timestamp(dst), Column::Timestamp(src)) => {
                        dst.extend_from_slice(src)
                    }
                    (Column::Float(dst), Column::Float(src)) => dst.extend_from_slice(src),
                    (Column::Text(dst), Column::Text(src)) => dst.extend_from_slice(src),
                    // Unreachable after the schema check above
                    _ => unreachable!("schema checked before merge"),
                }
            }
        }
        Ok(Frame { columns })
    }
}
