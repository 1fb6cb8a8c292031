//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during the Q sweep
//! - exported to JSON/CSV
//! - reloaded later for plotting

use std::path::PathBuf;

use chrono::{DateTime, Local};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::data::SyntheticSpec;
use crate::error::MscError;

/// Candidate Q values swept when none are supplied.
pub const DEFAULT_Q_CANDIDATES: [f64; 8] = [100.0, 150.0, 200.0, 250.0, 300.0, 350.0, 400.0, 450.0];

/// Spacing of a generated candidate-Q grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum QSpacing {
    /// Evenly spaced between `q_min` and `q_max`.
    Linear,
    /// Evenly spaced in `ln(Q)`.
    Log,
}

/// One sintering experiment: index-aligned time, temperature and response.
///
/// Construction validates the series, so every `MeasurementSeries` in the
/// program satisfies:
/// - all three sequences share one length `N >= 1`
/// - `time[i]` and `temperature[i]` are finite and `> 0`
/// - `response[i]` is finite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSeries", into = "RawSeries")]
pub struct MeasurementSeries {
    time: Vec<f64>,
    temperature: Vec<f64>,
    response: Vec<f64>,
}

impl MeasurementSeries {
    pub fn new(time: Vec<f64>, temperature: Vec<f64>, response: Vec<f64>) -> Result<Self, MscError> {
        check_series(&time, &temperature, &response)?;
        Ok(Self {
            time,
            temperature,
            response,
        })
    }

    /// Copy borrowed slices into a validated series.
    pub fn from_slices(time: &[f64], temperature: &[f64], response: &[f64]) -> Result<Self, MscError> {
        check_series(time, temperature, response)?;
        Ok(Self {
            time: time.to_vec(),
            temperature: temperature.to_vec(),
            response: response.to_vec(),
        })
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Always `false`: an empty series cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn temperature(&self) -> &[f64] {
        &self.temperature
    }

    pub fn response(&self) -> &[f64] {
        &self.response
    }

    /// Range summary used by reports and plots.
    pub fn stats(&self) -> DatasetStats {
        let (time_min, time_max) = min_max(&self.time);
        let (temperature_min, temperature_max) = min_max(&self.temperature);
        let (response_min, response_max) = min_max(&self.response);
        DatasetStats {
            n_points: self.len(),
            time_min,
            time_max,
            temperature_min,
            temperature_max,
            response_min,
            response_max,
        }
    }
}

fn check_series(time: &[f64], temperature: &[f64], response: &[f64]) -> Result<(), MscError> {
    if time.len() != temperature.len() || time.len() != response.len() {
        return Err(MscError::invalid(format!(
            "sequence lengths differ (time={}, temperature={}, response={})",
            time.len(),
            temperature.len(),
            response.len()
        )));
    }
    if time.is_empty() {
        return Err(MscError::invalid("measurement series is empty"));
    }
    for (i, (&t, &temp)) in time.iter().zip(temperature.iter()).enumerate() {
        if !(t.is_finite() && t > 0.0) {
            return Err(MscError::invalid(format!(
                "time[{i}] = {t} (must be finite and > 0)"
            )));
        }
        if !(temp.is_finite() && temp > 0.0) {
            return Err(MscError::invalid(format!(
                "temperature[{i}] = {temp} (must be finite and > 0)"
            )));
        }
    }
    if let Some((i, y)) = response.iter().enumerate().find(|(_, y)| !y.is_finite()) {
        return Err(MscError::invalid(format!("response[{i}] = {y} (must be finite)")));
    }
    Ok(())
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

/// Serde shadow of [`MeasurementSeries`] so deserialized data is validated too.
#[derive(Serialize, Deserialize)]
struct RawSeries {
    time: Vec<f64>,
    temperature: Vec<f64>,
    response: Vec<f64>,
}

impl TryFrom<RawSeries> for MeasurementSeries {
    type Error = MscError;

    fn try_from(raw: RawSeries) -> Result<Self, Self::Error> {
        MeasurementSeries::new(raw.time, raw.temperature, raw.response)
    }
}

impl From<MeasurementSeries> for RawSeries {
    fn from(series: MeasurementSeries) -> Self {
        RawSeries {
            time: series.time,
            temperature: series.temperature,
            response: series.response,
        }
    }
}

/// Summary stats about the measurements actually used for fitting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetStats {
    pub n_points: usize,
    pub time_min: f64,
    pub time_max: f64,
    pub temperature_min: f64,
    pub temperature_max: f64,
    pub response_min: f64,
    pub response_max: f64,
}

/// Least-squares line `response ≈ slope * log_theta + intercept` for one Q.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Mean residual square: `Σ r_i² / N`.
    pub mrs: f64,
}

/// Outcome of scoring one candidate Q.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Evaluation {
    Fit(LinearFit),
    /// Every log θ value is identical, so the regression is undefined.
    Degenerate,
}

impl Evaluation {
    /// MRS for display; a degenerate candidate scores `+∞`.
    pub fn mrs(&self) -> f64 {
        match self {
            Evaluation::Fit(fit) => fit.mrs,
            Evaluation::Degenerate => f64::INFINITY,
        }
    }

    pub fn fit(&self) -> Option<&LinearFit> {
        match self {
            Evaluation::Fit(fit) => Some(fit),
            Evaluation::Degenerate => None,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        matches!(self, Evaluation::Degenerate)
    }
}

/// One row of the sweep, kept in candidate input order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QScore {
    pub q: f64,
    pub outcome: Evaluation,
}

/// Final artifact of a sweep, handed to the reporting layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub optimal_q: f64,
    pub minimum_mrs: f64,
    /// Regression line at the optimal Q (the master curve).
    pub slope: f64,
    pub intercept: f64,
    /// `ln(time[i] * temperature[i]^Q)` at the optimal Q.
    pub theta_at_optimal: Vec<f64>,
    pub response: Vec<f64>,
    /// Every candidate's outcome in input order.
    pub sweep: Vec<QScore>,
}

impl OptimizationResult {
    /// Master-curve points `(log θ, response)` at the optimal Q.
    pub fn master_curve_points(&self) -> Vec<(f64, f64)> {
        self.theta_at_optimal
            .iter()
            .copied()
            .zip(self.response.iter().copied())
            .collect()
    }

    /// `(Q, MRS)` points for the non-degenerate candidates.
    pub fn mrs_points(&self) -> Vec<(f64, f64)> {
        self.sweep
            .iter()
            .filter_map(|s| s.outcome.fit().map(|f| (s.q, f.mrs)))
            .collect()
    }

    pub fn degenerate_count(&self) -> usize {
        self.sweep.iter().filter(|s| s.outcome.is_degenerate()).count()
    }
}

/// A saved result file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultFile {
    pub tool: String,
    pub generated: DateTime<Local>,
    pub measurements: MeasurementSeries,
    pub result: OptimizationResult,
}

/// Where the measurements for a run come from.
#[derive(Debug, Clone)]
pub enum InputSource {
    /// CSV file with `time`, `temperature`, `response` columns.
    Csv(PathBuf),
    /// Interactive prompts on stdin (N, then one line per sequence).
    Console,
    /// Generated experiment with a known Q.
    Synthetic(SyntheticSpec),
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: InputSource,
    pub candidates: Vec<f64>,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub svg: Option<PathBuf>,
    pub export_sweep: Option<PathBuf>,
    pub export_curve: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}
