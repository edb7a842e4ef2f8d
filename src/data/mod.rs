//! Synthetic data.
//!
//! - BAO-style mock generation (`mock`)

pub mod mock;

pub use mock::*;
