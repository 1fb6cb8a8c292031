//! Measurement ingest.
//!
//! Two sources are supported:
//!
//! - a CSV file with one row per sample (`time`, `temperature`, `response`)
//! - the console protocol: the sample count `N`, then one whitespace-separated
//!   line each for time, temperature and dL/L values
//!
//! Ingest is strict. A malformed row or a count mismatch aborts the run with
//! exit code 2 rather than fitting a partial dataset.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, Read, Write};
use std::path::Path;

use csv::StringRecord;

use crate::domain::MeasurementSeries;
use crate::error::AppError;

/// Accepted header spellings per column (compared after normalization).
/// A bare `T` keeps its case so it stays distinct from `t`.
const TIME_COLUMNS: [&str; 5] = ["time", "t", "time_min", "time_s", "minutes"];
const TEMPERATURE_COLUMNS: [&str; 5] = ["temperature", "temp", "T", "temperature_k", "kelvin"];
const RESPONSE_COLUMNS: [&str; 6] = ["response", "dl_by_l", "dl/l", "shrinkage", "density", "relative_density"];

/// Message printed when the console counts disagree with `N`.
pub const COUNT_MISMATCH_MESSAGE: &str =
    "Error: Number of input values doesn't match the specified number of data points.";

/// Load measurements from a CSV file.
pub fn load_csv(path: &Path) -> Result<MeasurementSeries, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_csv(file)
}

/// Parse measurements from any CSV reader.
pub fn read_csv<R: Read>(reader: R) -> Result<MeasurementSeries, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);
    if header_map.contains_key("t") && header_map.contains_key("T") {
        return Err(AppError::new(
            2,
            "Ambiguous CSV headers: both `t` and `T` are present; use `time` and `temperature`.",
        ));
    }

    let time_idx = resolve_column(&header_map, &TIME_COLUMNS)?;
    let temperature_idx = resolve_column(&header_map, &TEMPERATURE_COLUMNS)?;
    let response_idx = resolve_column(&header_map, &RESPONSE_COLUMNS)?;

    let mut time = Vec::new();
    let mut temperature = Vec::new();
    let mut response = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        let record = result.map_err(|e| AppError::new(2, format!("CSV parse error on line {line}: {e}")))?;

        time.push(parse_field(&record, time_idx, line)?);
        temperature.push(parse_field(&record, temperature_idx, line)?);
        response.push(parse_field(&record, response_idx, line)?);
    }

    log::debug!("Read {} CSV rows", time.len());
    MeasurementSeries::new(time, temperature, response).map_err(AppError::from)
}

/// Run the console protocol: prompts go to `out`, answers come from `input`.
pub fn read_console<R: BufRead, W: Write>(mut input: R, mut out: W) -> Result<MeasurementSeries, AppError> {
    prompt(&mut out, "Enter number of data points:")?;
    let n_line = next_line(&mut input, "number of data points")?;
    let n: usize = n_line
        .trim()
        .parse()
        .map_err(|_| AppError::new(2, format!("Invalid number of data points: '{}'", n_line.trim())))?;

    prompt(&mut out, "Enter time values (space-separated):")?;
    let time = parse_values(&next_line(&mut input, "time values")?, "time")?;

    prompt(&mut out, "Enter temperature values (space-separated):")?;
    let temperature = parse_values(&next_line(&mut input, "temperature values")?, "temperature")?;

    prompt(&mut out, "Enter dL/L values (space-separated):")?;
    let response = parse_values(&next_line(&mut input, "dL/L values")?, "dL/L")?;

    if time.len() != n || temperature.len() != n || response.len() != n {
        log::debug!(
            "count mismatch: n={n}, time={}, temperature={}, response={}",
            time.len(),
            temperature.len(),
            response.len()
        );
        return Err(AppError::new(2, COUNT_MISMATCH_MESSAGE));
    }

    MeasurementSeries::new(time, temperature, response).map_err(AppError::from)
}

fn prompt<W: Write>(out: &mut W, text: &str) -> Result<(), AppError> {
    writeln!(out, "{text}")
        .and_then(|_| out.flush())
        .map_err(|e| AppError::new(2, format!("Failed to write prompt: {e}")))
}

fn next_line<R: BufRead>(input: &mut R, what: &str) -> Result<String, AppError> {
    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .map_err(|e| AppError::new(2, format!("Failed to read {what}: {e}")))?;
    if read == 0 {
        return Err(AppError::new(2, format!("Unexpected end of input while reading {what}.")));
    }
    Ok(line)
}

fn parse_values(line: &str, what: &str) -> Result<Vec<f64>, AppError> {
    line.split_whitespace()
        .map(|tok| {
            tok.parse::<f64>()
                .map_err(|_| AppError::new(2, format!("Invalid {what} value '{tok}'.")))
        })
        .collect()
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. If we don't strip it, schema validation will incorrectly
    // report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    if name == "T" {
        return name.to_string();
    }
    name.to_ascii_lowercase()
}

fn resolve_column(header_map: &HashMap<String, usize>, names: &[&str]) -> Result<usize, AppError> {
    names
        .iter()
        .find_map(|name| header_map.get(*name).copied())
        .ok_or_else(|| {
            AppError::new(
                2,
                format!("Missing required column: one of `{}`", names.join("`, `")),
            )
        })
}

fn parse_field(record: &StringRecord, idx: usize, line: usize) -> Result<f64, AppError> {
    let raw = record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::new(2, format!("Missing value on line {line} (column {}).", idx + 1)))?;
    raw.parse::<f64>()
        .map_err(|_| AppError::new(2, format!("Invalid number '{raw}' on line {line}.")))
}
