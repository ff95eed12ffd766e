//! Error types for the finite element crate.
//!
//! Library errors use `thiserror` with helper methods for error categorization.

use crate::solver::SolverError;
use thiserror::Error;

/// Errors raised while building, solving or evaluating a finite element problem.
#[derive(Debug, Error)]
pub enum FemError {
    /// The interval or element count does not describe a valid mesh.
    #[error("invalid mesh: {reason}")]
    InvalidMesh {
        /// Human readable description of the defect
        reason: String,
    },

    /// An evaluation point lies outside the meshed interval.
    #[error("point {x} lies outside the mesh domain [{lower}, {upper}]")]
    PointOutsideDomain {
        /// The offending coordinate
        x: f64,
        /// Left end of the mesh
        lower: f64,
        /// Right end of the mesh
        upper: f64,
    },

    /// Nodal values do not match the number of degrees of freedom.
    #[error("dof mismatch: expected {expected} nodal values, got {got}")]
    DofMismatch {
        /// Number of mesh nodes
        expected: usize,
        /// Number of values provided
        got: usize,
    },

    /// The linear solver failed.
    #[error(transparent)]
    Solver(#[from] SolverError),
}

/// A specialized `Result` type for FEM operations.
pub type Result<T> = std::result::Result<T, FemError>;

impl FemError {
    pub(crate) fn invalid_mesh(reason: impl Into<String>) -> Self {
        FemError::InvalidMesh {
            reason: reason.into(),
        }
    }

    /// Returns `true` if the linear solver did not converge.
    pub fn is_convergence_failure(&self) -> bool {
        matches!(
            self,
            FemError::Solver(SolverError::ConvergenceFailure { .. })
        )
    }

    /// Returns `true` if the error was caused by caller-supplied input
    /// (mesh parameters, evaluation points or nodal vectors).
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            FemError::InvalidMesh { .. }
                | FemError::PointOutsideDomain { .. }
                | FemError::DofMismatch { .. }
                | FemError::Solver(SolverError::DimensionMismatch { .. })
        )
    }
}
