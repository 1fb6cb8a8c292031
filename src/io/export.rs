//! CSV exports of a finished sweep.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream
//! plotting scripts:
//!
//! - sweep table: one row per candidate Q, in input order
//! - master curve: one row per sample at the optimal Q, with fitted values

use std::io::Write;
use std::path::Path;

use crate::domain::{Evaluation, OptimizationResult};
use crate::error::AppError;

/// Write the per-Q sweep table to a CSV file.
pub fn write_sweep_csv(path: &Path, result: &OptimizationResult) -> Result<(), AppError> {
    let file = std::fs::File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create sweep CSV '{}': {e}", path.display())))?;
    write_sweep(file, result)
}

/// Write the master-curve points to a CSV file.
pub fn write_curve_csv(path: &Path, result: &OptimizationResult) -> Result<(), AppError> {
    let file = std::fs::File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create curve CSV '{}': {e}", path.display())))?;
    write_curve(file, result)
}

/// Sweep table: `q,status,mrs,slope,intercept,optimal`.
///
/// Degenerate candidates have empty numeric fields.
pub fn write_sweep<W: Write>(writer: W, result: &OptimizationResult) -> Result<(), AppError> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record(["q", "status", "mrs", "slope", "intercept", "optimal"])
        .map_err(|e| AppError::new(2, format!("Failed to write sweep CSV header: {e}")))?;

    // Only the first candidate equal to the optimum is flagged.
    let winner = crate::fit::select_best(&result.sweep);
    for (idx, score) in result.sweep.iter().enumerate() {
        let optimal = if winner == Some(idx) { "1" } else { "0" };
        let row = match score.outcome {
            Evaluation::Fit(fit) => [
                format!("{}", score.q),
                "fit".to_string(),
                format!("{:.10e}", fit.mrs),
                format!("{:.10e}", fit.slope),
                format!("{:.10e}", fit.intercept),
                optimal.to_string(),
            ],
            Evaluation::Degenerate => [
                format!("{}", score.q),
                "degenerate".to_string(),
                String::new(),
                String::new(),
                String::new(),
                optimal.to_string(),
            ],
        };
        w.write_record(&row)
            .map_err(|e| AppError::new(2, format!("Failed to write sweep CSV row: {e}")))?;
    }

    w.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush sweep CSV: {e}")))
}

/// Master curve: `index,log_theta,response,fitted,residual`.
pub fn write_curve<W: Write>(writer: W, result: &OptimizationResult) -> Result<(), AppError> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record(["index", "log_theta", "response", "fitted", "residual"])
        .map_err(|e| AppError::new(2, format!("Failed to write curve CSV header: {e}")))?;

    for (i, (x, y)) in result.master_curve_points().into_iter().enumerate() {
        let fitted = result.slope * x + result.intercept;
        w.write_record([
            i.to_string(),
            format!("{x:.10}"),
            format!("{y:.10}"),
            format!("{fitted:.10}"),
            format!("{:.10e}", y - fitted),
        ])
        .map_err(|e| AppError::new(2, format!("Failed to write curve CSV row: {e}")))?;
    }

    w.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush curve CSV: {e}")))
}
