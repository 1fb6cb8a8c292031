//! Input/output helpers.
//!
//! - measurement ingest from CSV or the console (`ingest`)
//! - sweep / master-curve CSV exports (`export`)
//! - result JSON read/write (`result`)

pub mod export;
pub mod ingest;
pub mod result;

pub use export::*;
pub use ingest::*;
pub use result::*;
