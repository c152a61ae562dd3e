//! Forecast Error Metrics

use ndarray::Array1;

/// Root mean squared error between predictions and actuals.
/// NaN when there are no pairs to compare.
pub fn rmse(predicted: &Array1<f64>, actual: &Array1<f64>) -> f64 {
    let n = predicted.len().min(actual.len());
    if n == 0 {
        return f64::NAN;
    }
    let sum_sq: f64 = predicted
        .iter()
        .zip(actual.iter())
        .map(|(p, a)| (p - a).powi(2))
        .sum();
    (sum_sq / n as f64).sqrt()
}

/// Mean absolute error between predictions and actuals.
/// NaN when there are no pairs to compare.
pub fn mae(predicted: &Array1<f64>, actual: &Array1<f64>) -> f64 {
    let n = predicted.len().min(actual.len());
    if n == 0 {
        return f64::NAN;
    }
    let sum_abs: f64 = predicted
        .iter()
        .zip(actual.iter())
        .map(|(p, a)| (p - a).abs())
        .sum();
    sum_abs / n as f64
}
