//! Small descriptive statistics over `f64` slices.

use crate::math::ols::fit_line;

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Least-squares slope of `values` against their index (units per step).
pub fn linear_slope(values: &[f64]) -> Option<f64> {
    let xs: Vec<f64> = (0..values.len()).map(|i| i as f64).collect();
    fit_line(&xs, values).map(|(_, slope)| slope)
}

/// Sample autocorrelation at `lag`.
///
/// Returns `None` for a constant series or when `lag >= values.len()`.
pub fn autocorrelation(values: &[f64], lag: usize) -> Option<f64> {
    let n = values.len();
    if lag >= n {
        return None;
    }
    let m = mean(values)?;
    let denom: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    if denom <= f64::EPSILON {
        return None;
    }
    let numer: f64 = (lag..n).map(|i| (values[i] - m) * (values[i - lag] - m)).sum();
    Some(numer / denom)
}

/// Apply `order` rounds of first differencing.
pub fn difference(values: &[f64], order: usize) -> Vec<f64> {
    let mut out = values.to_vec();
    for _ in 0..order {
        out = out.windows(2).map(|w| w[1] - w[0]).collect();
    }
    out
}

pub fn mae(actual: &[f64], predicted: &[f64]) -> Option<f64> {
    if actual.is_empty() || actual.len() != predicted.len() {
        return None;
    }
    let sum: f64 = actual.iter().zip(predicted).map(|(a, p)| (a - p).abs()).sum();
    Some(sum / actual.len() as f64)
}

pub fn mse(actual: &[f64], predicted: &[f64]) -> Option<f64> {
    if actual.is_empty() || actual.len() != predicted.len() {
        return None;
    }
    let sum: f64 = actual.iter().zip(predicted).map(|(a, p)| (a - p).powi(2)).sum();
    Some(sum / actual.len() as f64)
}
