//! Typed Row Predicates
//!
//! Conditional rules restrict themselves to a subset of rows. The subset is
//! described by a small expression tree instead of a filter string, so there
//! is no quoting or escaping to get wrong and evaluation is a direct walk
//! over the frame's columns.

use market_frame::{Frame, FrameError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A row filter over text columns.
///
/// A row matches only when every referenced column is non-null and the
/// comparisons hold; a null in any referenced column takes the row out of
/// scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    /// Column value equals `value`
    Equals { column: String, value: String },
    /// Column value is one of `values`
    In { column: String, values: Vec<String> },
    /// Every inner predicate matches
    And(Vec<Predicate>),
}

impl Predicate {
    /// Equality test against one text value
    pub fn equals(column: impl Into<String>, value: impl Into<String>) -> Self {
        Predicate::Equals {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Membership test against a list of text values
    pub fn is_in<I, S>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Predicate::In {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Conjunction of `self` and `other`
    pub fn and(self, other: Predicate) -> Self {
        match self {
            Predicate::And(mut parts) => {
                parts.push(other);
                Predicate::And(parts)
            }
            first => Predicate::And(vec![first, other]),
        }
    }

    /// Names of the columns this predicate reads
    pub fn referenced_columns(&self) -> Vec<&str> {
        match self {
            Predicate::Equals { column, .. } | Predicate::In { column, .. } => {
                vec![column.as_str()]
            }
            Predicate::And(parts) => {
                let mut cols: Vec<&str> = parts
                    .iter()
                    .flat_map(|p| p.referenced_columns())
                    .collect();
                cols.dedup();
                cols
            }
        }
    }

    /// Per-row match mask over the whole frame
    pub fn mask(&self, frame: &Frame) -> Result<Vec<bool>, FrameError> {
        match self {
            Predicate::Equals { column, value } => {
                let values = frame.texts(column)?;
                Ok(values
                    .iter()
                    .map(|v| v.as_deref() == Some(value.as_str()))
                    .collect())
            }
            Predicate::In { column, values } => {
                let col = frame.texts(column)?;
                Ok(col
                    .iter()
                    .map(|v| {
                        v.as_deref()
                            .is_some_and(|s| values.iter().any(|w| w == s))
                    })
                    .collect())
            }
            Predicate::And(parts) => {
                let mut mask = vec![true; frame.len()];
                for part in parts {
                    for (slot, hit) in mask.iter_mut().zip(part.mask(frame)?) {
                        *slot = *slot && hit;
                    }
                }
                Ok(mask)
            }
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Equals { column, value } => write!(f, "{column} == \"{value}\""),
            Predicate::In { column, values } => {
                write!(f, "{column} in [")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "\"{v}\"")?;
                }
                write!(f, "]")
            }
            Predicate::And(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, " && ")?;
                    }
                    write!(f, "{part}")?;
                }
                Ok(())
            }
        }
    }
}
