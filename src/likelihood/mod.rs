//! Gaussian likelihoods and interval extraction.
//!
//! Everything here is a pure function (or an immutable value) with no internal
//! state.

pub mod covariance;
pub mod gaussian;
pub mod interval;
pub mod rate;

pub use covariance::*;
pub use gaussian::*;
pub use interval::*;
pub use rate::*;
