//! `msc-fit` library crate.
//!
//! Estimates the apparent activation-energy parameter Q of a sintering
//! experiment by sweeping candidate Q values and keeping the one whose
//! `ln θ(t, T; Q) = ln(t · T^Q)` best linearises the measured response
//! (minimum mean residual square).
//!
//! The binary (`msc`) is a thin wrapper around this library so that:
//!
//! - the fitting core is testable without spawning processes
//! - presentation (reports, charts, exports) stays separate from the numerics

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;

pub use domain::{Evaluation, LinearFit, MeasurementSeries, OptimizationResult, QScore};
pub use error::{AppError, MscError};
pub use fit::{evaluate, evaluate_slices, optimize, optimize_slices};
