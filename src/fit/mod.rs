//! Q sweep orchestration.
//!
//! Responsibilities:
//!
//! - generate candidate Q grids
//! - score each candidate Q by the MRS of its log θ line fit
//! - select the optimal Q deterministically (parallel map, ordered reduce)

pub mod fitter;
pub mod q_grid;
pub mod selection;

pub use fitter::*;
pub use q_grid::*;
pub use selection::*;
