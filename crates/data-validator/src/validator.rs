//! Frame-Level Quality Validation
//!
//! Builds the active rule set for a frame (fixed domain bounds plus
//! data-driven per-segment bounds) and scores every rule. Scoring never
//! stops at the first failure; the report always carries the full outcome
//! list so callers can see everything that went wrong at once.

use crate::error::ValidationError;
use crate::predicate::Predicate;
use crate::profile::{distinct_in_scope, SegmentBound};
use crate::rule::{Check, Rule, ValidationReport};
use market_frame::schema::{
    self, Source, LMP_CANDIDATES, LOAD_CANDIDATES, LOAD_FORECAST_CANDIDATES, LOCATION_CANDIDATES,
};
use market_frame::{Frame, FrameError};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Timestamp spellings the validator accepts
const TIMESTAMP_CANDIDATES: [&str; 3] = [schema::TIMESTAMP, "Interval Start", "Time"];

/// Validation thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Hard price bounds ($/MWh) for rt_lmp / da_lmp rows
    pub price_bounds: (f64, f64),
    /// Tolerance for the fixed price bounds
    pub price_mostly: f64,
    /// Tolerance for the non-negative load bounds
    pub load_mostly: f64,
    /// Tolerance for data-driven segment bounds
    pub segment_mostly: f64,
    /// Lower quantile used when profiling segments
    pub quantile_low: f64,
    /// Upper quantile used when profiling segments
    pub quantile_high: f64,
    /// Bound widening as a fraction of the inter-quantile range
    pub range_inflation: f64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            price_bounds: (-200.0, 5000.0),
            price_mostly: 0.99,
            load_mostly: 0.98,
            segment_mostly: 0.98,
            quantile_low: 0.01,
            quantile_high: 0.99,
            range_inflation: 0.1,
        }
    }
}

impl ValidatorConfig {
    /// Zero-tolerance variant: every rule must pass on every row
    pub fn strict() -> Self {
        Self {
            price_mostly: 1.0,
            load_mostly: 1.0,
            segment_mostly: 1.0,
            ..Self::default()
        }
    }
}

/// Data-quality validator for cleaned market frames
pub struct Validator {
    config: ValidatorConfig,
}

impl Validator {
    /// Create a new validator with the given thresholds
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Score every active rule against the frame.
    ///
    /// A frame with no resolvable timestamp or source column cannot be
    /// profiled at all; that is a hard error, distinct from a frame that
    /// profiles fine but violates rules.
    pub fn validate(&self, frame: &Frame) -> Result<ValidationReport, ValidationError> {
        let rules = self.rules(frame)?;
        debug!("Scoring {} rules over {} rows", rules.len(), frame.len());
        let mut outcomes = Vec::with_capacity(rules.len());
        for rule in &rules {
            outcomes.push(rule.evaluate(frame)?);
        }
        let report = ValidationReport { outcomes };
        if !report.ok() {
            warn!(
                "Validation failed: {} of {} rules violated",
                report.violations().len(),
                report.outcomes.len()
            );
        }
        Ok(report)
    }

    /// Build the rule set this frame activates, without scoring it.
    ///
    /// Fixed domain rules are emitted only when their source partition is
    /// non-empty and the metric column resolves. Segment rules are emitted
    /// per distinct location within the partition, and only when the
    /// profiled quantile range is strictly positive.
    pub fn rules(&self, frame: &Frame) -> Result<Vec<Rule>, ValidationError> {
        let ts_col = frame.resolve_required(&TIMESTAMP_CANDIDATES)?;
        if !frame.has_column(schema::SOURCE) {
            return Err(FrameError::missing(schema::SOURCE).into());
        }

        let mut rules = vec![
            Rule::new("timestamp_not_null", ts_col, Check::NotNull),
            Rule::new("source_not_null", schema::SOURCE, Check::NotNull),
            Rule::new(
                "source_in_enumeration",
                schema::SOURCE,
                Check::InSet(Source::ALL.iter().map(|s| s.as_str().to_string()).collect()),
            ),
        ];

        struct MetricGroup {
            label: &'static str,
            metric_candidates: &'static [&'static str],
            sources: &'static [Source],
            bounds: (Option<f64>, Option<f64>),
            bounds_mostly: f64,
            floor_at_zero: bool,
        }

        let groups = [
            MetricGroup {
                label: "lmp",
                metric_candidates: &LMP_CANDIDATES,
                sources: &[Source::RtLmp, Source::DaLmp],
                bounds: (Some(self.config.price_bounds.0), Some(self.config.price_bounds.1)),
                bounds_mostly: self.config.price_mostly,
                floor_at_zero: false,
            },
            MetricGroup {
                label: "load",
                metric_candidates: &LOAD_CANDIDATES,
                sources: &[Source::LoadMetered],
                bounds: (Some(0.0), None),
                bounds_mostly: self.config.load_mostly,
                floor_at_zero: true,
            },
            MetricGroup {
                label: "load_forecast",
                metric_candidates: &LOAD_FORECAST_CANDIDATES,
                sources: &[Source::LoadForecast],
                bounds: (Some(0.0), None),
                bounds_mostly: self.config.load_mostly,
                floor_at_zero: true,
            },
        ];

        let location_col = frame.resolve(&LOCATION_CANDIDATES);

        for group in groups {
            let Some(metric_col) = frame.resolve(group.metric_candidates) else {
                continue;
            };
            let condition = source_condition(group.sources);
            let partition = condition.mask(frame)?;
            if !partition.contains(&true) {
                continue;
            }

            rules.push(
                Rule::new(format!("{}_not_null", group.label), metric_col, Check::NotNull)
                    .with_condition(condition.clone()),
            );
            rules.push(
                Rule::new(
                    format!("{}_domain_bounds", group.label),
                    metric_col,
                    Check::Between {
                        min: group.bounds.0,
                        max: group.bounds.1,
                    },
                )
                .with_condition(condition.clone())
                .with_mostly(group.bounds_mostly),
            );

            let Some(location_col) = location_col else {
                continue;
            };
            let locations = frame.texts(location_col)?;
            let metric = frame.floats(metric_col)?;
            for location in distinct_in_scope(locations, &partition) {
                let values = (0..frame.len())
                    .filter(|&row| {
                        partition[row] && locations[row].as_deref() == Some(location.as_str())
                    })
                    .filter_map(|row| metric[row]);
                let Some(bound) = SegmentBound::derive(
                    values,
                    self.config.quantile_low,
                    self.config.quantile_high,
                    self.config.range_inflation,
                    group.floor_at_zero,
                ) else {
                    debug!("Skipping degenerate segment {}[{}]", group.label, location);
                    continue;
                };
                rules.push(
                    Rule::new(
                        format!("{}_segment_bounds[{}]", group.label, location),
                        metric_col,
                        Check::Between {
                            min: Some(bound.min_bound),
                            max: Some(bound.max_bound),
                        },
                    )
                    .with_condition(
                        condition
                            .clone()
                            .and(Predicate::equals(location_col, location)),
                    )
                    .with_mostly(self.config.segment_mostly),
                );
            }
        }
        Ok(rules)
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidatorConfig::default())
    }
}

/// Predicate restricting rows to the given source tags
fn source_condition(sources: &[Source]) -> Predicate {
    match sources {
        [only] => Predicate::equals(schema::SOURCE, only.as_str()),
        many => Predicate::is_in(schema::SOURCE, many.iter().map(|s| s.as_str())),
    }
}
