//! Ordinary least squares with an intercept
//!
//! Columns and target are centered, the slope solved as the minimum-norm
//! least-squares solution through an SVD, and the intercept recovered from
//! the means. Rank-deficient designs are accepted: a complete one-hot block
//! is always collinear with the intercept.

use bdbcontrib_regression_core::{LinearModel, Result, TrainingError};
use nalgebra::{DMatrix, DVector};
use tracing::debug;

/// Fit `y ≈ intercept + x·β`.
///
/// `rcond` is the relative cutoff for small singular values; `None` uses
/// `f64::EPSILON * max(n, p)`.
pub fn fit_ols(x: &DMatrix<f64>, y: &DVector<f64>, rcond: Option<f64>) -> Result<LinearModel> {
    let (n, p) = x.shape();
    if n == 0 {
        return Err(TrainingError::EmptyDataset.into());
    }
    if y.len() != n {
        return Err(TrainingError::Solver(format!(
            "design has {} rows, target has {}",
            n,
            y.len()
        ))
        .into());
    }
    if !y.iter().all(|v| v.is_finite()) {
        return Err(TrainingError::NonFinite("target".to_string()).into());
    }
    if !x.iter().all(|v| v.is_finite()) {
        return Err(TrainingError::NonFinite("design matrix".to_string()).into());
    }

    let y_mean = y.mean();
    if p == 0 {
        return Ok(LinearModel::intercept_only(y_mean));
    }

    let x_means: Vec<f64> = x.column_iter().map(|c| c.mean()).collect();
    let xc = DMatrix::from_fn(n, p, |i, j| x[(i, j)] - x_means[j]);
    let yc = y.map(|v| v - y_mean);

    let svd = xc.svd(true, true);
    if !svd.singular_values.iter().all(|s| s.is_finite()) {
        return Err(TrainingError::Solver("non-finite singular values".to_string()).into());
    }
    let sigma_max = svd.singular_values.max();

    let beta = if sigma_max > 0.0 {
        let cutoff = rcond.unwrap_or(f64::EPSILON * n.max(p) as f64) * sigma_max;
        let rank = svd.singular_values.iter().filter(|&&s| s > cutoff).count();
        debug!(rows = n, columns = p, rank, "solving least squares");
        svd.solve(&yc, cutoff)
            .map_err(|e| TrainingError::Solver(e.to_string()))?
    } else {
        // Every column constant: slopes carry no information
        DVector::zeros(p)
    };

    let coefficients: Vec<f64> = beta.iter().copied().collect();
    let intercept = y_mean
        - coefficients
            .iter()
            .zip(&x_means)
            .map(|(b, m)| b * m)
            .sum::<f64>();

    let model = LinearModel::new(coefficients, intercept);
    if !model.is_finite() {
        return Err(TrainingError::NonFinite("fitted coefficients".to_string()).into());
    }
    Ok(model)
}

/// `‖y − ŷ‖₂ / n` of `model` over the rows of `x`.
pub fn residual_noise(model: &LinearModel, x: &DMatrix<f64>, y: &DVector<f64>) -> Result<f64> {
    let n = y.len();
    if n == 0 {
        return Err(TrainingError::EmptyDataset.into());
    }
    let mut row = Vec::with_capacity(x.ncols());
    let mut sum_sq = 0.0;
    for (i, target) in y.iter().enumerate() {
        row.clear();
        row.extend(x.row(i).iter().copied());
        let residual = target - model.predict(&row)?;
        sum_sq += residual * residual;
    }
    Ok(sum_sq.sqrt() / n as f64)
}
