//! `gridpost` library crate.
//!
//! The binary (`gridpost`) is a thin wrapper around this library so that:
//!
//! - the numeric core is testable without spawning processes
//! - loaders and reports are reusable from other front-ends
//! - code stays easy to navigate as the project grows
//!
//! Layout, bottom-up: `math` -> `fit` / `models` -> `likelihood` -> `posterior`,
//! with `io`, `data`, `report`, `cli` and `app` around them.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod likelihood;
pub mod math;
pub mod models;
pub mod posterior;
pub mod report;
