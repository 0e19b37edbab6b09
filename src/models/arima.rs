//! ARIMA(p, d, 0) estimation and recursion.
//!
//! The model is fitted by conditional least squares on the `d`-times differenced
//! series `x = Δ^d y`:
//!
//! ```text
//! x_t = c + φ_1 x_{t-1} + ... + φ_p x_{t-p} + e_t
//! ```
//!
//! where the constant `c` is only estimated when `d = 0` (a differenced series
//! is assumed to have no drift). Forecasts are produced recursively on the
//! differenced scale and integrated back using the last observed value of each
//! differencing level.

use log::debug;
use nalgebra::linalg::Schur;
use nalgebra::{DMatrix, DVector};

use crate::error::AppError;
use crate::math::{difference, solve_least_squares};

/// Eigenvalue modulus above which the AR recursion is explosive.
///
/// Unit roots are accepted: a perfectly linear history differenced once yields
/// lag weights summing to one, whose forecasts simply continue the line.
const EXPLOSIVE_ROOT_TOL: f64 = 1.0 + 1e-6;

/// Schur iteration budget; exceeding it is reported as a fit failure.
const SCHUR_MAX_ITER: usize = 1000;

/// A fitted ARIMA(p, d, 0) model.
#[derive(Debug, Clone)]
pub struct ArimaFit {
    pub ar_order: usize,
    pub differencing: usize,
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    /// Residual variance of the one-step-ahead fit.
    pub sigma2: f64,
    pub n_obs: usize,
    /// Last `p` values of the differenced series (oldest first).
    lags: Vec<f64>,
    /// Last value of `Δ^k y` for `k = 0..d`.
    anchors: Vec<f64>,
}

/// Fill a design row for observation `t` of the differenced series.
///
/// The row holds the optional intercept first, then lags 1..=p.
///
/// # Panics
/// Panics if `t < p` or `out` is shorter than `p + intercept`.
pub fn fill_design_row(series: &[f64], t: usize, p: usize, intercept: bool, out: &mut [f64]) {
    let offset = usize::from(intercept);
    if intercept {
        out[0] = 1.0;
    }
    for lag in 1..=p {
        out[offset + lag - 1] = series[t - lag];
    }
}

/// One-step prediction from the tail of `history` (most recent value last).
pub fn predict_next(history: &[f64], intercept: f64, coefficients: &[f64]) -> f64 {
    let n = history.len();
    coefficients
        .iter()
        .enumerate()
        .fold(intercept, |acc, (i, phi)| acc + phi * history[n - 1 - i])
}

/// Fit ARIMA(`ar_order`, `differencing`, 0) to `values`.
pub fn fit_arima(values: &[f64], ar_order: usize, differencing: usize) -> Result<ArimaFit, AppError> {
    let p = ar_order;
    let levels: Vec<Vec<f64>> = (0..=differencing).map(|k| difference(values, k)).collect();
    let x = &levels[differencing];

    let with_intercept = differencing == 0;
    let params = p + usize::from(with_intercept);
    let rows = x.len().saturating_sub(p);
    if rows <= params {
        return Err(AppError::insufficient_data(format!(
            "ARIMA({p},{differencing},0) needs more than {params} usable rows after differencing; got {rows}."
        )));
    }

    let (intercept, coefficients) = if params == 0 {
        (0.0, Vec::new())
    } else {
        estimate(x, p, with_intercept, rows, params)?
    };

    let mut sse = 0.0;
    for t in p..x.len() {
        let e = x[t] - predict_next(&x[..t], intercept, &coefficients);
        sse += e * e;
    }
    let sigma2 = sse / (rows - params) as f64;
    if !sigma2.is_finite() {
        return Err(AppError::model_fit("Non-finite residual variance after fitting."));
    }

    check_not_explosive(&coefficients)?;

    debug!(
        "Fitted ARIMA({p},{differencing},0): intercept={intercept:.4}, phi={coefficients:?}, sigma2={sigma2:.4}"
    );

    let lags = x[x.len() - p..].to_vec();
    let anchors = levels[..differencing]
        .iter()
        .map(|level| level.last().copied().unwrap_or(0.0))
        .collect();

    Ok(ArimaFit {
        ar_order: p,
        differencing,
        intercept,
        coefficients,
        sigma2,
        n_obs: values.len(),
        lags,
        anchors,
    })
}

fn estimate(
    x: &[f64],
    p: usize,
    with_intercept: bool,
    rows: usize,
    params: usize,
) -> Result<(f64, Vec<f64>), AppError> {
    let mut design = DMatrix::zeros(rows, params);
    let mut target = DVector::zeros(rows);
    let mut row = vec![0.0; params];
    for (r, t) in (p..x.len()).enumerate() {
        fill_design_row(x, t, p, with_intercept, &mut row);
        for (c, v) in row.iter().enumerate() {
            design[(r, c)] = *v;
        }
        target[r] = x[t];
    }

    // A flat differenced series has an all-zero design; its only sensible fit is zero.
    if design.iter().all(|v| v.abs() < 1e-12) {
        return Ok((0.0, vec![0.0; p]));
    }

    let beta = solve_least_squares(&design, &target)
        .ok_or_else(|| AppError::model_fit("Least squares solve did not converge."))?;

    let intercept = if with_intercept { beta[0] } else { 0.0 };
    let coefficients = beta.iter().skip(usize::from(with_intercept)).copied().collect();
    Ok((intercept, coefficients))
}

/// Reject AR recursions whose companion matrix has an eigenvalue outside the unit circle.
fn check_not_explosive(coefficients: &[f64]) -> Result<(), AppError> {
    let p = coefficients.len();
    if p == 0 {
        return Ok(());
    }

    // Companion matrix: first row holds φ, sub-diagonal holds ones.
    let mut companion = DMatrix::zeros(p, p);
    for (j, phi) in coefficients.iter().enumerate() {
        companion[(0, j)] = *phi;
    }
    for i in 1..p {
        companion[(i, i - 1)] = 1.0;
    }

    let schur = Schur::try_new(companion, 1e-12, SCHUR_MAX_ITER)
        .ok_or_else(|| AppError::model_fit("Eigenvalue iteration for the AR polynomial did not converge."))?;
    let max_modulus = schur
        .complex_eigenvalues()
        .iter()
        .map(|c| (c.re * c.re + c.im * c.im).sqrt())
        .fold(0.0_f64, f64::max);

    if max_modulus > EXPLOSIVE_ROOT_TOL {
        return Err(AppError::model_fit(format!(
            "Fitted AR recursion is explosive (max eigenvalue modulus {max_modulus:.4})."
        )));
    }
    Ok(())
}

impl ArimaFit {
    /// Point forecasts for the next `horizon` steps on the original scale.
    pub fn forecast(&self, horizon: usize) -> Vec<f64> {
        let mut history = self.lags.clone();
        let mut out = Vec::with_capacity(horizon);
        for _ in 0..horizon {
            let next = predict_next(&history, self.intercept, &self.coefficients);
            history.push(next);
            out.push(next);
        }

        // Integrate from the innermost differencing level outwards.
        for anchor in self.anchors.iter().rev() {
            let mut level = *anchor;
            for v in out.iter_mut() {
                level += *v;
                *v = level;
            }
        }
        out
    }

    /// MA(∞) weights `ψ_0..ψ_{h-1}` of the integrated AR polynomial.
    ///
    /// The `h`-step forecast error variance is `σ² Σ_{j<h} ψ_j²`.
    pub fn psi_weights(&self, horizon: usize) -> Vec<f64> {
        // a(B) = (1 - Σ φ_i B^i)(1 - B)^d
        let mut poly: Vec<f64> = std::iter::once(1.0)
            .chain(self.coefficients.iter().map(|phi| -phi))
            .collect();
        for _ in 0..self.differencing {
            let mut next = vec![0.0; poly.len() + 1];
            for (i, c) in poly.iter().enumerate() {
                next[i] += c;
                next[i + 1] -= c;
            }
            poly = next;
        }
        let phi: Vec<f64> = poly[1..].iter().map(|c| -c).collect();

        let mut psi: Vec<f64> = Vec::with_capacity(horizon);
        for j in 0..horizon {
            if j == 0 {
                psi.push(1.0);
                continue;
            }
            let v = (1..=j.min(phi.len())).map(|i| phi[i - 1] * psi[j - i]).sum();
            psi.push(v);
        }
        psi
    }

    /// Standard error of each of the next `horizon` forecasts.
    pub fn forecast_std_errors(&self, horizon: usize) -> Vec<f64> {
        let mut acc = 0.0;
        self.psi_weights(horizon)
            .into_iter()
            .map(|psi| {
                acc += psi * psi;
                (self.sigma2 * acc).sqrt()
            })
            .collect()
    }
}
