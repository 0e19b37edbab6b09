//! Least squares solver.
//!
//! Both the AR regression of the forecaster and the trend line of the series
//! summary reduce to:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! The design matrix is tall (many days, a handful of lags), so we solve via SVD,
//! which copes with rank-deficient columns (e.g. lags of a flat series).

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if no finite solution is found at any tolerance.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    if x.nrows() != y.len() || x.ncols() == 0 {
        return None;
    }

    let svd = x.clone().svd(true, true);

    // Singular values at or below the tolerance are treated as zero, so
    // collinear lag columns get a minimum-norm solution instead of blowing up.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Fit `y = a + b·x` and return `(a, b)`.
pub fn fit_line(xs: &[f64], ys: &[f64]) -> Option<(f64, f64)> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let mut design = DMatrix::zeros(xs.len(), 2);
    for (i, &x) in xs.iter().enumerate() {
        design[(i, 0)] = 1.0;
        design[(i, 1)] = x;
    }
    let beta = solve_least_squares(&design, &DVector::from_column_slice(ys))?;
    Some((beta[0], beta[1]))
}
