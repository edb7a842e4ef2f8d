//! Curve fitting.

pub mod quadratic;

pub use quadratic::*;
