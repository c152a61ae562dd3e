//! Per-Segment Statistical Profiling
//!
//! Admissible value ranges are derived from the data itself: the low/high
//! quantiles of each (source, location) segment, widened by a fraction of
//! the inter-quantile range. Bounds are recomputed fresh on every run and
//! never persisted.

use serde::Serialize;

/// Quantile-derived admissible range for one segment's metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SegmentBound {
    /// Observed low quantile
    pub q_low: f64,
    /// Observed high quantile
    pub q_high: f64,
    /// Inflated lower bound
    pub min_bound: f64,
    /// Inflated upper bound
    pub max_bound: f64,
}

impl SegmentBound {
    /// Derive a bound from a segment's observed metric values.
    ///
    /// NaN values are ignored. Returns `None` when no values remain or the
    /// inter-quantile range is not strictly positive (constant or degenerate
    /// segments get no rule rather than an impossibly tight one).
    pub fn derive(
        values: impl IntoIterator<Item = f64>,
        quantile_low: f64,
        quantile_high: f64,
        range_inflation: f64,
        floor_at_zero: bool,
    ) -> Option<SegmentBound> {
        let mut sorted: Vec<f64> = values.into_iter().filter(|v| !v.is_nan()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(|a, b| a.total_cmp(b));

        let q_low = quantile(&sorted, quantile_low);
        let q_high = quantile(&sorted, quantile_high);
        let range = q_high - q_low;
        if range <= 0.0 {
            return None;
        }

        let mut min_bound = q_low - range_inflation * range;
        let max_bound = q_high + range_inflation * range;
        if floor_at_zero {
            min_bound = min_bound.max(0.0);
        }
        Some(SegmentBound {
            q_low,
            q_high,
            min_bound,
            max_bound,
        })
    }
}

/// Linearly interpolated quantile of an ascending-sorted, non-empty slice.
///
/// The quantile sits at fractional position `q * (n - 1)`, interpolated
/// between the two neighboring order statistics.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = pos - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}

/// Distinct non-null values among rows where `mask` is true, in order of
/// first appearance
pub fn distinct_in_scope(values: &[Option<String>], mask: &[bool]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for (value, &hit) in values.iter().zip(mask) {
        if !hit {
            continue;
        }
        if let Some(v) = value {
            if !seen.iter().any(|s| s == v) {
                seen.push(v.clone());
            }
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_quantile_interpolates_between_order_statistics() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&sorted, 0.0), 1.0);
        assert_eq!(quantile(&sorted, 1.0), 4.0);
        assert!((quantile(&sorted, 0.5) - 2.5).abs() < 1e-12);
        assert!((quantile(&sorted, 0.25) - 1.75).abs() < 1e-12);

        let hundred: Vec<f64> = (0..100).map(f64::from).collect();
        assert!((quantile(&hundred, 0.01) - 0.99).abs() < 1e-12);
        assert!((quantile(&hundred, 0.99) - 98.01).abs() < 1e-12);
    }

    #[test]
    fn test_derive_inflates_by_fraction_of_range() {
        let values = (0..100).map(f64::from);
        let bound = SegmentBound::derive(values, 0.01, 0.99, 0.1, false).unwrap();
        let range = bound.q_high - bound.q_low;
        assert!((bound.min_bound - (bound.q_low - 0.1 * range)).abs() < 1e-9);
        assert!((bound.max_bound - (bound.q_high + 0.1 * range)).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_segments_yield_no_bound() {
        assert_eq!(
            SegmentBound::derive(std::iter::empty::<f64>(), 0.01, 0.99, 0.1, false),
            None
        );
        assert_eq!(SegmentBound::derive([5.0], 0.01, 0.99, 0.1, false), None);
        let constant = std::iter::repeat(42.0).take(50);
        assert_eq!(SegmentBound::derive(constant, 0.01, 0.99, 0.1, false), None);
    }

    #[test]
    fn test_floor_clamps_negative_lower_bound() {
        let values = (0..=50).map(f64::from);
        let floored = SegmentBound::derive(values.clone(), 0.01, 0.99, 0.1, true).unwrap();
        assert_eq!(floored.min_bound, 0.0);
        let raw = SegmentBound::derive(values, 0.01, 0.99, 0.1, false).unwrap();
        assert!(raw.min_bound < 0.0);
    }

    #[test]
    fn test_nan_values_are_ignored() {
        let bound = SegmentBound::derive(
            [1.0, f64::NAN, 2.0, 3.0, f64::NAN, 4.0],
            0.0,
            1.0,
            0.0,
            false,
        )
        .unwrap();
        assert_eq!(bound.q_low, 1.0);
        assert_eq!(bound.q_high, 4.0);
    }

    #[test]
    fn test_distinct_respects_mask_and_appearance_order() {
        let values = vec![
            Some("EAST".to_string()),
            Some("WEST".to_string()),
            None,
            Some("EAST".to_string()),
            Some("NORTH".to_string()),
        ];
        let mask = [false, true, true, true, true];
        assert_eq!(
            distinct_in_scope(&values, &mask),
            vec!["WEST".to_string(), "EAST".to_string(), "NORTH".to_string()]
        );
    }

    proptest! {
        #[test]
        fn quantile_stays_within_observed_range(
            mut values in proptest::collection::vec(-1e6f64..1e6, 1..200),
            q in 0.0f64..=1.0,
        ) {
            values.sort_by(|a, b| a.total_cmp(b));
            let v = quantile(&values, q);
            prop_assert!(v >= values[0] && v <= values[values.len() - 1]);
        }

        #[test]
        fn derived_bounds_always_contain_the_quantiles(
            values in proptest::collection::vec(-1e6f64..1e6, 2..200),
        ) {
            if let Some(bound) = SegmentBound::derive(values, 0.01, 0.99, 0.1, false) {
                prop_assert!(bound.min_bound <= bound.q_low);
                prop_assert!(bound.max_bound >= bound.q_high);
                prop_assert!(bound.q_low <= bound.q_high);
            }
        }
    }
}
