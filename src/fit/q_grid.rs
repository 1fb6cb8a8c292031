//! Candidate Q grid generation.
//!
//! We locate Q using a deterministic sweep over a fixed candidate set.
//!
//! Why a sweep?
//! - The MRS(Q) surface is cheap to evaluate and one-dimensional.
//! - It is deterministic given the same inputs/flags.
//! - The MRS-vs-Q chart is itself a diagnostic worth showing.

use crate::domain::{DEFAULT_Q_CANDIDATES, QSpacing};
use crate::error::MscError;

/// The reference candidate set `{100, 150, ..., 450}`.
pub fn default_candidates() -> Vec<f64> {
    DEFAULT_Q_CANDIDATES.to_vec()
}

/// Reject empty candidate sets and non-finite or non-positive Q values.
pub fn validate_candidates(candidates: &[f64]) -> Result<(), MscError> {
    if candidates.is_empty() {
        return Err(MscError::invalid("candidate Q set is empty"));
    }
    if let Some((i, q)) = candidates
        .iter()
        .enumerate()
        .find(|(_, q)| !(q.is_finite() && **q > 0.0))
    {
        return Err(MscError::invalid(format!(
            "candidate Q[{i}] = {q} (must be finite and > 0)"
        )));
    }
    Ok(())
}

/// Build `steps` candidates between `min` and `max` (inclusive).
pub fn q_grid(min: f64, max: f64, steps: usize, spacing: QSpacing) -> Result<Vec<f64>, MscError> {
    match spacing {
        QSpacing::Linear => linear_space(min, max, steps),
        QSpacing::Log => log_space(min, max, steps),
    }
}

/// Generate `steps` evenly spaced points between `min` and `max` (inclusive).
pub fn linear_space(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, MscError> {
    check_range(min, max, steps)?;
    let step = (max - min) / (steps as f64 - 1.0);
    let mut out: Vec<f64> = (0..steps).map(|i| min + step * i as f64).collect();
    // Pin the endpoint so `max` is hit exactly.
    if let Some(last) = out.last_mut() {
        *last = max;
    }
    Ok(out)
}

/// Generate `steps` log-spaced points between `min` and `max` (inclusive).
pub fn log_space(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, MscError> {
    check_range(min, max, steps)?;

    let ln_min = min.ln();
    let ln_max = max.ln();
    let step = (ln_max - ln_min) / (steps as f64 - 1.0);

    let mut out = Vec::with_capacity(steps);
    for i in 0..steps {
        out.push((ln_min + step * i as f64).exp());
    }
    Ok(out)
}

fn check_range(min: f64, max: f64, steps: usize) -> Result<(), MscError> {
    if !(min.is_finite() && max.is_finite() && min > 0.0 && max > 0.0 && max > min) {
        return Err(MscError::invalid(format!(
            "Invalid Q range: min={min}, max={max} (must be finite, >0, and max>min)."
        )));
    }
    if steps < 2 {
        return Err(MscError::invalid("Q steps must be >= 2."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_space_matches_reference_candidates() {
        let v = linear_space(100.0, 450.0, 8).unwrap();
        assert_eq!(v, default_candidates());
    }

    #[test]
    fn log_space_includes_endpoints() {
        let v = log_space(10.0, 1000.0, 5).unwrap();
        assert!((v[0] - 10.0).abs() < 1e-9);
        assert!((v[v.len() - 1] - 1000.0).abs() < 1e-9);
        assert!((v[2] - 100.0).abs() < 1e-9);
    }

    #[test]
    fn bad_ranges_are_rejected() {
        assert!(linear_space(0.0, 10.0, 5).is_err());
        assert!(linear_space(10.0, 5.0, 5).is_err());
        assert!(q_grid(1.0, 10.0, 1, QSpacing::Log).is_err());
    }

    #[test]
    fn candidate_validation() {
        assert!(validate_candidates(&[]).is_err());
        assert!(validate_candidates(&[100.0, -1.0]).is_err());
        assert!(validate_candidates(&[100.0, f64::NAN]).is_err());
        assert!(validate_candidates(&[0.5, 100.0]).is_ok());
    }
}
