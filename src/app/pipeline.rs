//! Shared "fit pipeline" logic used by the `fit` and `demo` commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! ingest -> validate -> sweep Q -> select optimum
//!
//! The command handlers can then focus on presentation (printing, charts, exports).

use std::io;

use crate::data::generate_series;
use crate::domain::{InputSource, MeasurementSeries, OptimizationResult, RunConfig};
use crate::error::AppError;

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub series: MeasurementSeries,
    pub result: OptimizationResult,
}

/// Load the measurements named by `config.input`.
pub fn load_series(config: &RunConfig) -> Result<MeasurementSeries, AppError> {
    match &config.input {
        InputSource::Csv(path) => crate::io::load_csv(path),
        InputSource::Console => {
            let stdin = io::stdin();
            crate::io::read_console(stdin.lock(), io::stdout())
        }
        InputSource::Synthetic(spec) => generate_series(spec),
    }
}

/// Execute the full pipeline and return the computed outputs.
pub fn run_fit(config: &RunConfig) -> Result<RunOutput, AppError> {
    let series = load_series(config)?;
    run_fit_with_series(config, series)
}

/// Execute the sweep on already-loaded measurements.
pub fn run_fit_with_series(config: &RunConfig, series: MeasurementSeries) -> Result<RunOutput, AppError> {
    log::info!(
        "Sweeping {} candidate Q values over {} samples",
        config.candidates.len(),
        series.len()
    );
    let result = crate::fit::optimize(&config.candidates, &series)?;
    Ok(RunOutput { series, result })
}
