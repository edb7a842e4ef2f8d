//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - configuration records (`InferenceConfig`, `AsimovConfig`, `CalibrationConfig`)
//! - the validated input dataset (`BaoDataset`)
//! - inference outputs (`PosteriorResult`, `JointPosterior`, `AsimovResult`, etc.)

pub mod types;

pub use types::*;
