//! Backtracking line search with the Armijo sufficient-decrease condition.

use super::dot;

/// Accepted step of a line search
#[derive(Debug, Clone)]
pub struct LineSearchStep {
    /// Step length
    pub alpha: f64,
    /// Trial point `x + alpha d`
    pub x: Vec<f64>,
    /// Objective at the trial point
    pub value: f64,
    /// Gradient at the trial point
    pub grad: Vec<f64>,
    /// Objective evaluations spent
    pub evaluations: usize,
}

/// Backtracking line search
///
/// Starting from `alpha = 1`, shrink by `rho` until
/// `f(x + alpha d) <= f(x) + c1 alpha ∇f(x)ᵀd`.
#[derive(Debug, Clone)]
pub struct BacktrackingLineSearch {
    /// Armijo constant (c1 ∈ (0, 1))
    pub c1: f64,
    /// Backtracking factor (rho ∈ (0, 1))
    pub rho: f64,
    /// Maximum backtracking iterations
    pub max_iter: usize,
}

impl BacktrackingLineSearch {
    pub fn new(c1: f64, rho: f64, max_iter: usize) -> Self {
        Self { c1, rho, max_iter }
    }

    /// Search along `d` from `x`
    ///
    /// `fx` and `grad` are the objective and gradient at `x`. Returns `None`
    /// if `d` is not a descent direction or no step satisfies the condition.
    /// Trial points with a non-finite objective are treated as too long.
    pub fn search<F>(
        &self,
        objective: &mut F,
        x: &[f64],
        fx: f64,
        grad: &[f64],
        d: &[f64],
        initial_alpha: f64,
    ) -> Option<LineSearchStep>
    where
        F: FnMut(&[f64]) -> (f64, Vec<f64>),
    {
        let dir_deriv = dot(grad, d);
        if dir_deriv >= 0.0 || !dir_deriv.is_finite() {
            return None;
        }

        let mut alpha = initial_alpha;
        let mut trial = vec![0.0; x.len()];
        for evaluations in 1..=self.max_iter {
            for ((t, xi), di) in trial.iter_mut().zip(x).zip(d) {
                *t = xi + alpha * di;
            }
            let (value, grad_new) = objective(&trial);
            if value.is_finite() && value <= fx + self.c1 * alpha * dir_deriv {
                return Some(LineSearchStep {
                    alpha,
                    x: trial,
                    value,
                    grad: grad_new,
                    evaluations,
                });
            }
            alpha *= self.rho;
        }
        None
    }
}

impl Default for BacktrackingLineSearch {
    /// c1 = 1e-4, rho = 0.5, max_iter = 50
    fn default() -> Self {
        Self::new(1e-4, 0.5, 50)
    }
}
