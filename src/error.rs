//! Error types.
//!
//! Two layers:
//!
//! - [`InferenceError`]: typed failures raised by the numeric core and the
//!   loaders. Every condition is raised where it is detected and propagated
//!   with `?`; nothing in the core recovers or retries.
//! - [`AppError`]: what the binary reports. It carries a process exit code and
//!   a human-readable message.

use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by fitting, likelihood, posterior and loader code.
#[derive(Error, Debug)]
pub enum InferenceError {
    /// Bad bounds / resolutions / sigmas, detected before any grid evaluation.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A function argument outside its domain (e.g. `sigma <= 0`).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("insufficient data: {what} needs at least {needed} points, got {found}")]
    InsufficientData {
        what: &'static str,
        needed: usize,
        found: usize,
    },

    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Unparsable file content.
    #[error("parse error: {0}")]
    Parse(String),

    #[error("shape error: {0}")]
    Shape(String),

    #[error("matrix is not symmetric: entry ({row}, {col}) = {upper} vs ({col}, {row}) = {lower}")]
    AsymmetricMatrix {
        row: usize,
        col: usize,
        upper: f64,
        lower: f64,
    },

    #[error("matrix is singular (inverse does not exist)")]
    SingularMatrix,

    /// The log-determinant sign of a covariance matrix was not positive.
    #[error("covariance is not positive definite (log-determinant sign {sign})")]
    NonPositiveDefinite { sign: f64 },

    #[error("normalization failed: {0}")]
    Normalization(String),

    #[error("no grid point satisfies delta NLL <= {delta}; check scan range or grid resolution")]
    EmptyInterval { delta: f64 },
}

/// Result alias for core routines.
pub type Result<T> = std::result::Result<T, InferenceError>;

impl InferenceError {
    /// Exit code used when this error reaches the binary.
    ///
    /// - 2: bad input (config, arguments, missing / unreadable files)
    /// - 3: dataset validation failures
    /// - 4: numerical failures during inference
    pub fn exit_code(&self) -> u8 {
        match self {
            InferenceError::InvalidConfig(_)
            | InferenceError::InvalidParameter(_)
            | InferenceError::NotFound(_)
            | InferenceError::Io { .. }
            | InferenceError::Parse(_) => 2,
            InferenceError::InsufficientData { .. }
            | InferenceError::Shape(_)
            | InferenceError::AsymmetricMatrix { .. }
            | InferenceError::SingularMatrix
            | InferenceError::NonPositiveDefinite { .. } => 3,
            InferenceError::Normalization(_) | InferenceError::EmptyInterval { .. } => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<InferenceError> for AppError {
    fn from(err: InferenceError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inference_errors_map_to_exit_codes() {
        let cfg: AppError = InferenceError::InvalidConfig("grid_H0 < 2".into()).into();
        assert_eq!(cfg.exit_code(), 2);
        assert!(cfg.to_string().contains("grid_H0 < 2"));

        let shape: AppError = InferenceError::SingularMatrix.into();
        assert_eq!(shape.exit_code(), 3);

        let norm: AppError = InferenceError::EmptyInterval { delta: 0.5 }.into();
        assert_eq!(norm.exit_code(), 4);
    }
}
