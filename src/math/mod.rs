//! Mathematical utilities: the work-of-sintering transform and simple least squares.

pub mod ols;
pub mod theta;

pub use ols::*;
pub use theta::*;
