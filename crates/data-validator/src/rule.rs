//! Quality Rules and Scored Outcomes
//!
//! A rule names a column, a check, an optional row condition, and a
//! `mostly` tolerance. Scoring a rule never short-circuits: every in-scope
//! row is counted so the report can carry the observed pass rate.

use crate::error::ValidationError;
use crate::predicate::Predicate;
use market_frame::Frame;
use serde::{Deserialize, Serialize};

/// The check a rule applies to its column.
///
/// Null handling differs per check: `NotNull` exists to flag nulls, `InSet`
/// leaves nulls to a separate `NotNull` rule, and `Between` counts an
/// in-scope null as a failing row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Check {
    /// Value must be present
    NotNull,
    /// Non-null value must be one of the given strings
    InSet(Vec<String>),
    /// Value must be present and inside the inclusive bounds; a `None`
    /// side is unbounded
    Between { min: Option<f64>, max: Option<f64> },
}

/// One data-quality rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Stable identifier carried into the report
    pub id: String,
    /// Column the check reads
    pub column: String,
    /// The check to apply
    pub check: Check,
    /// Row filter; `None` puts every row in scope
    pub condition: Option<Predicate>,
    /// Minimum fraction of in-scope rows that must pass
    pub mostly: f64,
}

impl Rule {
    /// Unconditional rule requiring every row to pass
    pub fn new(id: impl Into<String>, column: impl Into<String>, check: Check) -> Self {
        Self {
            id: id.into(),
            column: column.into(),
            check,
            condition: None,
            mostly: 1.0,
        }
    }

    /// Restrict the rule to rows matching `condition`
    pub fn with_condition(mut self, condition: Predicate) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Allow up to `1 - mostly` of in-scope rows to fail
    pub fn with_mostly(mut self, mostly: f64) -> Self {
        self.mostly = mostly;
        self
    }

    /// Score this rule against a frame.
    ///
    /// A rule with no in-scope rows passes vacuously with a pass rate of 1.
    pub fn evaluate(&self, frame: &Frame) -> Result<RuleOutcome, ValidationError> {
        if !(0.0..=1.0).contains(&self.mostly) {
            return Err(ValidationError::InvalidTolerance {
                rule_id: self.id.clone(),
                mostly: self.mostly,
            });
        }
        let mask = match &self.condition {
            Some(predicate) => predicate.mask(frame)?,
            None => vec![true; frame.len()],
        };

        let (rows_in_scope, passing) = match &self.check {
            Check::NotNull => {
                let column = frame.require(&self.column)?;
                let mut in_scope = 0usize;
                let mut pass = 0usize;
                for (row, &hit) in mask.iter().enumerate() {
                    if !hit {
                        continue;
                    }
                    in_scope += 1;
                    if !column.is_null(row) {
                        pass += 1;
                    }
                }
                (in_scope, pass)
            }
            Check::InSet(allowed) => {
                let values = frame.texts(&self.column)?;
                let mut in_scope = 0usize;
                let mut pass = 0usize;
                for (value, &hit) in values.iter().zip(&mask) {
                    if !hit {
                        continue;
                    }
                    let Some(value) = value else { continue };
                    in_scope += 1;
                    if allowed.iter().any(|a| a == value) {
                        pass += 1;
                    }
                }
                (in_scope, pass)
            }
            Check::Between { min, max } => {
                let values = frame.floats(&self.column)?;
                let mut in_scope = 0usize;
                let mut pass = 0usize;
                for (value, &hit) in values.iter().zip(&mask) {
                    if !hit {
                        continue;
                    }
                    in_scope += 1;
                    if let Some(v) = value {
                        let above = min.map_or(true, |m| *v >= m);
                        let below = max.map_or(true, |m| *v <= m);
                        if above && below {
                            pass += 1;
                        }
                    }
                }
                (in_scope, pass)
            }
        };

        let pass_rate = if rows_in_scope == 0 {
            1.0
        } else {
            passing as f64 / rows_in_scope as f64
        };
        Ok(RuleOutcome {
            rule_id: self.id.clone(),
            column: self.column.clone(),
            condition: self.condition.as_ref().map(|p| p.to_string()),
            rows_in_scope,
            pass_rate,
            passed: pass_rate >= self.mostly,
        })
    }
}

/// How a single rule scored
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleOutcome {
    /// Identifier of the rule that produced this outcome
    pub rule_id: String,
    /// Column the rule checked
    pub column: String,
    /// Rendered row condition, when the rule was conditional
    pub condition: Option<String>,
    /// Rows the rule scored
    pub rows_in_scope: usize,
    /// Fraction of in-scope rows that passed
    pub pass_rate: f64,
    /// Whether the pass rate met the rule's tolerance
    pub passed: bool,
}

/// All outcomes of one validation run, in rule-emission order
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub outcomes: Vec<RuleOutcome>,
}

impl ValidationReport {
    /// True when every rule passed at its tolerance
    pub fn ok(&self) -> bool {
        self.outcomes.iter().all(|o| o.passed)
    }

    /// The failing outcomes, in emission order
    pub fn violations(&self) -> Vec<&RuleOutcome> {
        self.outcomes.iter().filter(|o| !o.passed).collect()
    }
}
