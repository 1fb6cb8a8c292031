//! Ordinary least squares for a single regressor.
//!
//! The master curve is a straight line `y ≈ slope · x + intercept`, so the
//! general SVD solve is unnecessary: the closed form
//!
//! ```text
//! slope     = Σ (x_i - x̄)(y_i - ȳ) / Σ (x_i - x̄)²
//! intercept = ȳ - slope · x̄
//! ```
//!
//! is exact and cheap. Centering before the products keeps precision when the
//! regressor has a large offset (log θ values sit in the thousands for
//! realistic Q).

use nalgebra::DVector;

/// Fitted line plus residual diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
    pub residuals: DVector<f64>,
}

impl LineFit {
    /// `Σ r_i² / N`.
    ///
    /// Residuals are scaled by their largest magnitude before squaring, so the
    /// result only overflows when the mean itself exceeds `f64::MAX`.
    pub fn mean_residual_square(&self) -> f64 {
        if self.residuals.is_empty() {
            return 0.0;
        }
        let scale = self.residuals.amax();
        if !(scale > 0.0) || !scale.is_finite() {
            return self.residuals.norm_squared() / self.residuals.len() as f64;
        }
        let mean_scaled = self.residuals.unscale(scale).norm_squared() / self.residuals.len() as f64;
        scale * (scale * mean_scaled)
    }
}

/// Fit `y` against `x` by least squares.
///
/// Returns `None` when `x` has zero variance (the slope is undefined) or when
/// the inputs have different or zero length.
pub fn fit_line(x: &DVector<f64>, y: &DVector<f64>) -> Option<LineFit> {
    if x.len() != y.len() || x.is_empty() {
        return None;
    }

    let x_mean = x.mean();
    let y_mean = y.mean();
    let dx = x.add_scalar(-x_mean);
    let dy = y.add_scalar(-y_mean);

    let sxx = dx.norm_squared();
    if !(sxx > 0.0) {
        return None;
    }

    let slope = dx.dot(&dy) / sxx;
    let intercept = y_mean - slope * x_mean;
    let residuals = y - x.map(|xi| slope * xi + intercept);

    Some(LineFit {
        slope,
        intercept,
        residuals,
    })
}
