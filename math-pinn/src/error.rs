//! Error types for PINN construction and training.

use std::fmt;
use thiserror::Error;

/// Optimization phase a training error occurred in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrainingPhase {
    /// First-order Adam steps on resampled batches
    Adam,
    /// Quasi-Newton refinement on a fixed batch
    Lbfgs,
}

impl fmt::Display for TrainingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainingPhase::Adam => write!(f, "adam"),
            TrainingPhase::Lbfgs => write!(f, "lbfgs"),
        }
    }
}

/// Errors that can occur while building or training a PINN.
#[derive(Debug, Error)]
pub enum PinnError {
    /// The loss (or the parameters producing it) stopped being finite.
    #[error("non-finite loss during {phase} at step {step}")]
    NonFiniteLoss {
        /// Phase that diverged
        phase: TrainingPhase,
        /// Step or iteration index within the phase
        step: usize,
    },

    /// A flat parameter vector does not match the layout it is unflattened into.
    #[error("parameter length mismatch: expected {expected}, got {got}")]
    ParamLengthMismatch {
        /// Length implied by the parameter layout
        expected: usize,
        /// Length provided
        got: usize,
    },

    /// Layer widths or shapes that cannot form a network.
    #[error("invalid architecture: {reason}")]
    InvalidArchitecture {
        /// Description of the defect
        reason: String,
    },
}

/// A specialized `Result` type for PINN operations.
pub type Result<T> = std::result::Result<T, PinnError>;

impl PinnError {
    pub(crate) fn invalid_architecture(reason: impl Into<String>) -> Self {
        PinnError::InvalidArchitecture {
            reason: reason.into(),
        }
    }

    /// Returns `true` if training diverged.
    pub fn is_divergence(&self) -> bool {
        matches!(self, PinnError::NonFiniteLoss { .. })
    }

    /// Returns `true` if the error comes from inconsistent network shapes.
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            PinnError::ParamLengthMismatch { .. } | PinnError::InvalidArchitecture { .. }
        )
    }
}
