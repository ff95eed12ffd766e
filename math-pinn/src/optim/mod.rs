//! Optimizers over flat parameter vectors
//!
//! - [`Adam`]: first-order stochastic steps with bias-corrected moments
//! - [`Lbfgs`]: limited-memory quasi-Newton refinement of a deterministic objective
//! - [`BacktrackingLineSearch`]: Armijo step selection used by L-BFGS

mod adam;
mod lbfgs;
mod line_search;

pub use adam::Adam;
pub use lbfgs::Lbfgs;
pub use line_search::{BacktrackingLineSearch, LineSearchStep};

/// Why an optimizer stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvergenceStatus {
    /// Largest gradient component fell below the gradient tolerance
    GradientTolerance,
    /// Relative decrease of the objective fell below the function tolerance
    FunctionTolerance,
    /// Iteration budget exhausted
    MaxIterations,
    /// Line search could not find a decreasing step
    Stalled,
    /// Objective or gradient became NaN or infinite
    NumericalError,
}

impl ConvergenceStatus {
    /// Normal termination (tolerance reached or budget used up)
    pub fn is_success(&self) -> bool {
        !matches!(self, ConvergenceStatus::NumericalError)
    }
}

/// Outcome of a deterministic minimization
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Final parameters
    pub x: Vec<f64>,
    /// Objective at `x`
    pub value: f64,
    /// Completed iterations
    pub iterations: usize,
    /// Objective/gradient evaluations, line search included
    pub evaluations: usize,
    /// Max-abs gradient component at `x`
    pub grad_max: f64,
    pub status: ConvergenceStatus,
}

#[inline]
pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[inline]
pub(crate) fn max_abs(v: &[f64]) -> f64 {
    v.iter().fold(0.0, |m, x| m.max(x.abs()))
}
