//! Positional Shifts and Trailing Window Statistics
//!
//! All operations here are positional: offsets and windows count rows, not
//! time. Missing values propagate; nothing is interpolated or backfilled.

/// Series shifted `steps` rows forward: row `i` takes the value at row
/// `i - steps`, and the first `steps` rows become null.
pub fn shift(values: &[Option<f64>], steps: usize) -> Vec<Option<f64>> {
    let mut shifted = vec![None; values.len()];
    for i in steps..values.len() {
        shifted[i] = values[i - steps];
    }
    shifted
}

/// Trailing mean over `window` rows, inclusive of the current row.
///
/// Null until the window fills, and for any window containing a null.
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, |slice| {
        slice.iter().sum::<f64>() / slice.len() as f64
    })
}

/// Trailing sample standard deviation (n-1 denominator) over `window`
/// rows, inclusive of the current row.
///
/// Null until the window fills, for any window containing a null, and for
/// every row when `window < 2` (no degrees of freedom).
pub fn rolling_std(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    if window < 2 {
        return vec![None; values.len()];
    }
    rolling(values, window, |slice| {
        let n = slice.len() as f64;
        let mean = slice.iter().sum::<f64>() / n;
        let ss: f64 = slice.iter().map(|v| (v - mean) * (v - mean)).sum();
        (ss / (n - 1.0)).sqrt()
    })
}

fn rolling(
    values: &[Option<f64>],
    window: usize,
    stat: impl Fn(&[f64]) -> f64,
) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 {
        return out;
    }
    // Scratch buffer reused per window; a window with any null yields null.
    let mut scratch = Vec::with_capacity(window);
    for i in (window - 1)..values.len() {
        scratch.clear();
        for v in &values[i + 1 - window..=i] {
            match v {
                Some(v) => scratch.push(*v),
                None => break,
            }
        }
        if scratch.len() == window {
            out[i] = Some(stat(&scratch));
        }
    }
    out
}
