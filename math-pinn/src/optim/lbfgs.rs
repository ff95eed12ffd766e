//! Limited-memory BFGS (L-BFGS) optimizer.
//!
//! L-BFGS approximates the inverse Hessian from a bounded history of
//! position and gradient differences and combines the resulting direction
//! with an Armijo backtracking line search.

use super::line_search::BacktrackingLineSearch;
use super::{ConvergenceStatus, OptimizationResult, dot, max_abs};
use std::collections::VecDeque;

/// L-BFGS optimizer
///
/// # Algorithm
///
/// 1. Compute gradient `g_k` = ∇`f(x_k)`
/// 2. Compute search direction `d_k` by two-loop recursion (≈ -H⁻¹ `g_k`)
/// 3. Find step size `α_k` by backtracking line search
/// 4. Update `x_{k+1} = x_k + α_k d_k`
/// 5. Store `s_k = x_{k+1} - x_k`, `y_k = g_{k+1} - g_k` if `y_kᵀs_k > 0`
///
/// # Stopping
///
/// - `max|g| <= gtol`
/// - `(f_k - f_{k+1}) / max(|f_k|, |f_{k+1}|, 1) <= ftol`
/// - `max_iter` iterations
#[derive(Debug, Clone)]
pub struct Lbfgs {
    /// Maximum number of iterations
    pub max_iter: usize,
    /// Relative function decrease tolerance
    pub ftol: f64,
    /// Max-abs gradient tolerance
    pub gtol: f64,
    /// Number of correction pairs kept
    pub history: usize,
    line_search: BacktrackingLineSearch,
    s_history: VecDeque<Vec<f64>>,
    y_history: VecDeque<Vec<f64>>,
}

impl Lbfgs {
    pub fn new(max_iter: usize, ftol: f64, gtol: f64, history: usize) -> Self {
        Self {
            max_iter,
            ftol,
            gtol,
            history: history.max(1),
            line_search: BacktrackingLineSearch::default(),
            s_history: VecDeque::with_capacity(history),
            y_history: VecDeque::with_capacity(history),
        }
    }

    #[must_use]
    pub fn with_line_search(mut self, line_search: BacktrackingLineSearch) -> Self {
        self.line_search = line_search;
        self
    }

    /// Two-loop recursion: returns `-H_k g`
    fn compute_direction(&self, grad: &[f64]) -> Vec<f64> {
        let mut q: Vec<f64> = grad.iter().map(|g| -g).collect();
        let k = self.s_history.len();
        if k == 0 {
            return q;
        }

        let mut alpha = vec![0.0; k];
        let mut rho = vec![0.0; k];

        for i in (0..k).rev() {
            let (s, y) = (&self.s_history[i], &self.y_history[i]);
            rho[i] = 1.0 / dot(y, s);
            alpha[i] = rho[i] * dot(s, &q);
            for (qj, yj) in q.iter_mut().zip(y) {
                *qj -= alpha[i] * yj;
            }
        }

        // H_0 = γ I with γ = sᵀy / yᵀy from the newest pair
        let (s_last, y_last) = (&self.s_history[k - 1], &self.y_history[k - 1]);
        let gamma = dot(s_last, y_last) / dot(y_last, y_last);
        q.iter_mut().for_each(|v| *v *= gamma);

        for i in 0..k {
            let (s, y) = (&self.s_history[i], &self.y_history[i]);
            let beta = rho[i] * dot(y, &q);
            for (rj, sj) in q.iter_mut().zip(s) {
                *rj += sj * (alpha[i] - beta);
            }
        }

        q
    }

    fn push_pair(&mut self, s: Vec<f64>, y: Vec<f64>) {
        if self.s_history.len() == self.history {
            self.s_history.pop_front();
            self.y_history.pop_front();
        }
        self.s_history.push_back(s);
        self.y_history.push_back(y);
    }

    /// Minimize `objective`, which returns the value and gradient at a point
    pub fn minimize<F>(&mut self, mut objective: F, x0: Vec<f64>) -> OptimizationResult
    where
        F: FnMut(&[f64]) -> (f64, Vec<f64>),
    {
        self.s_history.clear();
        self.y_history.clear();

        let mut x = x0;
        let (mut fx, mut grad) = objective(&x);
        let mut evaluations = 1;

        let finish = |x: Vec<f64>,
                      value: f64,
                      grad: &[f64],
                      iterations: usize,
                      evaluations: usize,
                      status: ConvergenceStatus| {
            OptimizationResult {
                x,
                value,
                iterations,
                evaluations,
                grad_max: max_abs(grad),
                status,
            }
        };

        if !fx.is_finite() || grad.iter().any(|g| !g.is_finite()) {
            return finish(x, fx, &grad, 0, evaluations, ConvergenceStatus::NumericalError);
        }

        for iter in 0..self.max_iter {
            if max_abs(&grad) <= self.gtol {
                return finish(
                    x,
                    fx,
                    &grad,
                    iter,
                    evaluations,
                    ConvergenceStatus::GradientTolerance,
                );
            }

            let mut d = self.compute_direction(&grad);
            let mut initial_alpha = 1.0;
            if self.s_history.is_empty() {
                // Steepest descent: start with a unit-length step
                initial_alpha = 1.0 / dot(&grad, &grad).sqrt().max(1.0);
            } else if dot(&d, &grad) >= 0.0 {
                d = grad.iter().map(|g| -g).collect();
                self.s_history.clear();
                self.y_history.clear();
            }

            let Some(step) =
                self.line_search
                    .search(&mut objective, &x, fx, &grad, &d, initial_alpha)
            else {
                return finish(x, fx, &grad, iter, evaluations, ConvergenceStatus::Stalled);
            };
            evaluations += step.evaluations;

            if step.grad.iter().any(|g| !g.is_finite()) {
                return finish(
                    x,
                    fx,
                    &grad,
                    iter,
                    evaluations,
                    ConvergenceStatus::NumericalError,
                );
            }

            let s: Vec<f64> = step.x.iter().zip(&x).map(|(a, b)| a - b).collect();
            let y: Vec<f64> = step.grad.iter().zip(&grad).map(|(a, b)| a - b).collect();
            let ys = dot(&y, &s);
            if ys > f64::EPSILON * dot(&y, &y) {
                self.push_pair(s, y);
            }

            let relative_decrease = (fx - step.value) / fx.abs().max(step.value.abs()).max(1.0);

            x = step.x;
            fx = step.value;
            grad = step.grad;

            if relative_decrease <= self.ftol {
                return finish(
                    x,
                    fx,
                    &grad,
                    iter + 1,
                    evaluations,
                    ConvergenceStatus::FunctionTolerance,
                );
            }
        }

        let iterations = self.max_iter;
        finish(
            x,
            fx,
            &grad,
            iterations,
            evaluations,
            ConvergenceStatus::MaxIterations,
        )
    }
}
