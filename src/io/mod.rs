//! Input/output helpers.
//!
//! - YAML configuration loading (`config`)
//! - dataset table + covariance ingest, and the writer used by mocks (`dataset`)
//! - JSON result export (`export`)

pub mod config;
pub mod dataset;
pub mod export;

pub use config::*;
pub use dataset::*;
pub use export::*;
