//! Error types for the benchmark driver.
//!
//! Solver-level failures are wrapped from the FEM and PINN crates so the
//! driver can tell a diverged trial apart from a fatal input or I/O error.

use fem::FemError;
use pinn::PinnError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while running or persisting a benchmark.
#[derive(Debug, Error)]
pub enum BenchError {
    /// The evaluation point set is missing, malformed or out of range.
    #[error("evaluation points: {reason}")]
    Points {
        /// Description of the defect
        reason: String,
    },

    /// A benchmark configuration cannot be run.
    #[error("invalid configuration: {reason}")]
    Config {
        /// Description of the defect
        reason: String,
    },

    /// Reading or writing a file failed.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed or produced.
    #[error("json error on {}: {source}", path.display())]
    Json {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// Predictions and reference values have different lengths.
    #[error("length mismatch: {predicted} predictions for {expected} reference values")]
    LengthMismatch {
        /// Number of predicted values
        predicted: usize,
        /// Number of reference values
        expected: usize,
    },

    /// The reference vector has zero norm, so a relative error is undefined.
    #[error("reference values have zero norm")]
    ZeroReference,

    /// The closed-form problem data failed a self-consistency check.
    #[error("problem data inconsistent ({check}) at x = {x}: residual {residual:.3e}")]
    Inconsistent {
        /// Which check failed
        check: &'static str,
        /// Where it failed
        x: f64,
        /// Size of the violation
        residual: f64,
    },

    /// The finite element pipeline failed.
    #[error(transparent)]
    Fem(#[from] FemError),

    /// PINN construction or training failed.
    #[error(transparent)]
    Pinn(#[from] PinnError),
}

/// A specialized `Result` type for benchmark operations.
pub type Result<T> = std::result::Result<T, BenchError>;

impl BenchError {
    pub(crate) fn points(reason: impl Into<String>) -> Self {
        BenchError::Points {
            reason: reason.into(),
        }
    }

    pub(crate) fn config(reason: impl Into<String>) -> Self {
        BenchError::Config {
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BenchError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        BenchError::Json {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if a solver diverged or failed to converge.
    ///
    /// Only these errors are confined to a single trial; everything else
    /// aborts the run.
    pub fn is_divergence(&self) -> bool {
        match self {
            BenchError::Fem(e) => e.is_convergence_failure(),
            BenchError::Pinn(e) => e.is_divergence(),
            _ => false,
        }
    }

    /// Returns `true` if the error came from reading or writing files.
    pub fn is_io_error(&self) -> bool {
        matches!(self, BenchError::Io { .. } | BenchError::Json { .. })
    }

    /// Returns `true` if the error was caused by user-supplied input.
    pub fn is_input_error(&self) -> bool {
        match self {
            BenchError::Points { .. } | BenchError::Config { .. } | BenchError::ZeroReference => {
                true
            }
            BenchError::Fem(e) => e.is_input_error(),
            BenchError::Pinn(e) => e.is_shape_error(),
            _ => false,
        }
    }
}
