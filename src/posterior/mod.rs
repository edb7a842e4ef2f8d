//! Grid posterior engine.
//!
//! Responsibilities:
//!
//! - evaluate the `(γ, H0_local)` log-posterior on a dense grid
//! - normalize, marginalize, summarize (means, MAP, credible intervals)
//! - compare the running-γ model with the nested fixed-γ model (AIC/BIC)
//! - reweight the `γ` marginal by an independent dataset likelihood

pub mod comparison;
pub mod engine;
pub mod joint;
pub mod stats;

pub use comparison::*;
pub use engine::*;
pub use joint::*;
pub use stats::*;
