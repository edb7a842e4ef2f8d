//! Toy physics models.
//!
//! Models are implemented as small, pure functions so that the grid engine and
//! the likelihoods can stay generic.

pub mod calibration;
pub mod closure;

pub use calibration::*;
pub use closure::*;
