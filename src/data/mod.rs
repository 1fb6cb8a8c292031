//! Data sources that are not user files.
//!
//! - `synthetic`: generated sintering runs with a known Q, for demos and tests

pub mod synthetic;

pub use synthetic::*;
