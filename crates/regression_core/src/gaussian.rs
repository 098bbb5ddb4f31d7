//! Univariate Gaussian helpers used by the predictive distribution

use crate::errors::{MathError, Result};
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// `0.5 * ln(2π)`
pub fn half_ln_2pi() -> f64 {
    0.5 * (2.0 * std::f64::consts::PI).ln()
}

/// Natural-log density of `x` under Normal(`mean`, `scale`).
pub fn logpdf(x: f64, mean: f64, scale: f64) -> Result<f64> {
    if scale.is_nan() || scale <= 0.0 {
        return Err(MathError::NonPositiveScale(scale).into());
    }
    if !mean.is_finite() || !scale.is_finite() {
        return Err(MathError::InvalidDistribution(format!(
            "mean {} and scale {} must be finite",
            mean, scale
        ))
        .into());
    }
    let deviation = x - mean;
    Ok(-scale.ln() - half_ln_2pi() - 0.5 * deviation * deviation / (scale * scale))
}

/// Draw `n` values as `mean + noise`, noise ~ Normal(0, `scale`).
pub fn sample<R: Rng + ?Sized>(mean: f64, scale: f64, n: usize, rng: &mut R) -> Result<Vec<f64>> {
    let noise = Normal::new(0.0, scale)
        .map_err(|e| MathError::InvalidDistribution(format!("scale {}: {}", scale, e)))?;
    if !mean.is_finite() {
        return Err(MathError::InvalidDistribution(format!("mean {} is not finite", mean)).into());
    }
    Ok((0..n).map(|_| mean + noise.sample(rng)).collect())
}
