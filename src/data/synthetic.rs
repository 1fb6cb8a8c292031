//! Synthetic sintering experiment generation.
//!
//! A constant-rate heating run is simulated: time advances evenly from
//! `time_start` to `time_end` while temperature ramps from `temperature_start`
//! to `temperature_end`. The response is made exactly affine in
//! `ln θ(t, T; q0)`, scaled so it spans `[response_start, response_end]`, then
//! optionally perturbed by Gaussian noise. The sweep should therefore recover
//! `q0` (or its nearest candidate).

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::MeasurementSeries;
use crate::error::AppError;
use crate::math::log_theta;

#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticSpec {
    /// Q used to build the response.
    pub q0: f64,
    pub n_points: usize,
    pub time_start: f64,
    pub time_end: f64,
    pub temperature_start: f64,
    pub temperature_end: f64,
    pub response_start: f64,
    pub response_end: f64,
    /// Standard deviation of additive response noise (0 disables noise).
    pub noise: f64,
    pub seed: u64,
}

impl Default for SyntheticSpec {
    fn default() -> Self {
        Self {
            q0: 250.0,
            n_points: 12,
            time_start: 5.0,
            time_end: 120.0,
            temperature_start: 1100.0,
            temperature_end: 1450.0,
            response_start: 0.60,
            response_end: 0.95,
            noise: 0.0,
            seed: 42,
        }
    }
}

/// Generate a measurement series for `spec`.
pub fn generate_series(spec: &SyntheticSpec) -> Result<MeasurementSeries, AppError> {
    if spec.n_points < 2 {
        return Err(AppError::new(2, "Synthetic runs need at least 2 points."));
    }
    if !(spec.q0.is_finite() && spec.q0 > 0.0) {
        return Err(AppError::new(2, format!("Invalid q0={} (must be finite and > 0).", spec.q0)));
    }
    if !(spec.time_start > 0.0 && spec.time_end.is_finite() && spec.time_end > spec.time_start) {
        return Err(AppError::new(2, "Invalid time range for synthetic run."));
    }
    if !(spec.temperature_start > 0.0
        && spec.temperature_end.is_finite()
        && spec.temperature_end > spec.temperature_start)
    {
        return Err(AppError::new(2, "Invalid temperature ramp for synthetic run."));
    }
    if !(spec.response_start.is_finite() && spec.response_end.is_finite()) || spec.response_start == spec.response_end {
        return Err(AppError::new(2, "Invalid response range for synthetic run."));
    }
    if !(spec.noise.is_finite() && spec.noise >= 0.0) {
        return Err(AppError::new(2, "Noise sigma must be finite and >= 0."));
    }

    let mut rng = StdRng::seed_from_u64(spec.seed);
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let n = spec.n_points;
    let mut time = Vec::with_capacity(n);
    let mut temperature = Vec::with_capacity(n);
    for i in 0..n {
        let u = i as f64 / (n as f64 - 1.0);
        time.push(spec.time_start + u * (spec.time_end - spec.time_start));
        temperature.push(spec.temperature_start + u * (spec.temperature_end - spec.temperature_start));
    }

    // Map the log θ span onto the requested response span.
    let theta_first = log_theta(time[0], temperature[0], spec.q0);
    let theta_last = log_theta(time[n - 1], temperature[n - 1], spec.q0);
    let slope = (spec.response_end - spec.response_start) / (theta_last - theta_first);
    let intercept = spec.response_start - slope * theta_first;

    let response = time
        .iter()
        .zip(&temperature)
        .map(|(&t, &temp)| {
            let clean = slope * log_theta(t, temp, spec.q0) + intercept;
            if spec.noise > 0.0 {
                clean + spec.noise * normal.sample(&mut rng)
            } else {
                clean
            }
        })
        .collect();

    MeasurementSeries::new(time, temperature, response).map_err(AppError::from)
}
