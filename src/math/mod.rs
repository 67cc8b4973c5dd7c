//! Mathematical utilities: grids and order statistics.

pub mod grid;
pub mod stats;

pub use grid::*;
pub use stats::*;
