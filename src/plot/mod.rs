//! Chart rendering for a finished sweep.
//!
//! - `ascii`: fixed-grid terminal charts
//! - `svg`: side-by-side MRS and master-curve panels written with Plotters

pub mod ascii;
pub mod svg;

pub use ascii::*;
pub use svg::*;
