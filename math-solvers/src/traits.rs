//! Core traits for linear algebra operations
//!
//! This module defines the abstractions the iterative solvers are written against:
//! - [`LinearOperator`]: matrix-like objects that can perform matrix-vector products
//! - [`Preconditioner`]: approximate inverses applied to residuals
//!
//! Everything here is real-valued (`f64`): the systems produced by the Poisson
//! discretization are symmetric positive definite.

use ndarray::Array1;

/// Trait for linear operators (matrices) that can perform matrix-vector products.
///
/// This abstraction allows solvers to work with sparse matrices and
/// matrix-free operators interchangeably.
pub trait LinearOperator: Send + Sync {
    /// Number of rows in the operator
    fn num_rows(&self) -> usize;

    /// Number of columns in the operator
    fn num_cols(&self) -> usize;

    /// Apply the operator: y = A * x
    fn apply(&self, x: &Array1<f64>) -> Array1<f64>;

    /// Check if the operator is square
    fn is_square(&self) -> bool {
        self.num_rows() == self.num_cols()
    }
}

/// Trait for preconditioners used in iterative solvers.
///
/// A preconditioner M approximates A^(-1), so that M*A is better conditioned
/// than A alone. This accelerates convergence of iterative methods.
pub trait Preconditioner: Send + Sync {
    /// Apply the preconditioner: y = M * r
    ///
    /// This should approximate solving A * y = r
    fn apply(&self, r: &Array1<f64>) -> Array1<f64>;
}

/// Identity preconditioner (no preconditioning)
#[derive(Clone, Debug, Default)]
pub struct IdentityPreconditioner;

impl Preconditioner for IdentityPreconditioner {
    fn apply(&self, r: &Array1<f64>) -> Array1<f64> {
        r.clone()
    }
}

/// Euclidean inner product of two vectors
#[inline]
pub fn dot(x: &Array1<f64>, y: &Array1<f64>) -> f64 {
    x.iter().zip(y.iter()).map(|(a, b)| a * b).sum()
}

/// Euclidean norm of a vector
#[inline]
pub fn norm2(x: &Array1<f64>) -> f64 {
    dot(x, x).sqrt()
}
