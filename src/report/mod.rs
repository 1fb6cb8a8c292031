//! Reporting utilities: formatted terminal output for a finished sweep.

pub mod format;

pub use format::*;
