//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - validated measurement input (`MeasurementSeries`)
//! - per-Q outcomes (`LinearFit`, `Evaluation`, `QScore`)
//! - sweep output (`OptimizationResult`, `ResultFile`)
//! - run configuration (`RunConfig`, `InputSource`)

pub mod types;

pub use types::*;
