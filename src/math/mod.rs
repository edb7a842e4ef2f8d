//! Mathematical utilities: scan axes, least squares, and dense linear algebra.

pub mod grid;
pub mod linalg;
pub mod ols;

pub use grid::*;
pub use linalg::*;
pub use ols::*;
