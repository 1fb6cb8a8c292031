//! Work-of-sintering function.
//!
//! The Master Sintering Curve collapses densification data onto a single curve
//! parameterised by
//!
//! - `θ(t, T; Q) = t · T^Q`
//!
//! and is fitted in log space.
//!
//! Numerical notes:
//! - `T^Q` overflows `f64` long before realistic inputs run out (`1000^450`),
//!   so we evaluate `ln θ = ln t + Q · ln T` directly. Both forms are equal
//!   wherever the direct product is representable.

/// Relative tolerance under which two log θ values count as identical.
pub const THETA_REL_TOL: f64 = 1e-12;

/// `ln(t · T^Q)` for one sample. Callers guarantee `t > 0` and `T > 0`.
pub fn log_theta(time: f64, temperature: f64, q: f64) -> f64 {
    time.ln() + q * temperature.ln()
}

/// `ln θ` for every sample of an index-aligned series.
pub fn log_theta_series(time: &[f64], temperature: &[f64], q: f64) -> Vec<f64> {
    time.iter()
        .zip(temperature.iter())
        .map(|(&t, &temp)| log_theta(t, temp, q))
        .collect()
}

/// True when every value is numerically equal to the first one.
///
/// Values are compared against `values[0]` with a tolerance of
/// `THETA_REL_TOL * max(1, |values[0]|)`. Empty and single-element slices are
/// trivially constant.
pub fn is_numerically_constant(values: &[f64]) -> bool {
    let Some(&first) = values.first() else {
        return true;
    };
    let tol = THETA_REL_TOL * first.abs().max(1.0);
    values.iter().all(|&v| (v - first).abs() <= tol)
}
