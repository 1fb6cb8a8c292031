//! Read/write result JSON files.
//!
//! Result JSON is the "portable" representation of a finished run:
//! - the measurements that were fitted
//! - the optimal Q, its regression line and minimum MRS
//! - every candidate's outcome (degenerate candidates are tagged, never `inf`)
//!
//! The schema is defined by `domain::ResultFile`.

use std::fs::File;
use std::path::Path;

use chrono::Local;

use crate::domain::{MeasurementSeries, OptimizationResult, ResultFile};
use crate::error::AppError;

/// Name recorded in the `tool` field.
pub const TOOL_NAME: &str = "msc";

/// Wrap a run's inputs and outputs into a `ResultFile` stamped with the current time.
pub fn result_file(series: &MeasurementSeries, result: &OptimizationResult) -> ResultFile {
    ResultFile {
        tool: TOOL_NAME.to_string(),
        generated: Local::now(),
        measurements: series.clone(),
        result: result.clone(),
    }
}

/// Write a result JSON file.
pub fn write_result_json(
    path: &Path,
    series: &MeasurementSeries,
    result: &OptimizationResult,
) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create result JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, &result_file(series, result))
        .map_err(|e| AppError::new(2, format!("Failed to write result JSON: {e}")))?;

    Ok(())
}

/// Read a result JSON file.
pub fn read_result_json(path: &Path) -> Result<ResultFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open result JSON '{}': {e}", path.display())))?;
    let parsed: ResultFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid result JSON: {e}")))?;
    Ok(parsed)
}
