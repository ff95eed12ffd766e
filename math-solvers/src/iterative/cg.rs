//! CG (Conjugate Gradient) solver
//!
//! The Conjugate Gradient method for symmetric positive definite systems,
//! with an optional preconditioner M ≈ A^(-1) that must itself be symmetric
//! positive definite (Jacobi, or ILU(0) of an SPD matrix).

use crate::traits::{IdentityPreconditioner, LinearOperator, Preconditioner, dot, norm2};
use ndarray::Array1;

/// Breakdown threshold for the curvature term (p, Ap)
const BREAKDOWN: f64 = 1e-300;

/// CG solver configuration
#[derive(Debug, Clone)]
pub struct CgConfig {
    /// Maximum number of iterations
    pub max_iterations: usize,
    /// Relative tolerance on ||r|| / ||b|| for convergence
    pub tolerance: f64,
    /// Print progress every N iterations (0 = no output)
    pub print_interval: usize,
}

impl Default for CgConfig {
    fn default() -> Self {
        Self {
            max_iterations: 20_000,
            tolerance: 1e-10,
            print_interval: 0,
        }
    }
}

/// CG solver result
#[derive(Debug, Clone)]
pub struct CgSolution {
    /// Solution vector
    pub x: Array1<f64>,
    /// Number of iterations
    pub iterations: usize,
    /// Final relative residual ||b - Ax|| / ||b||
    pub residual: f64,
    /// Whether convergence was achieved
    pub converged: bool,
}

/// Solve Ax = b using the Conjugate Gradient method
///
/// Note: This method is only correct for symmetric positive definite matrices.
pub fn cg<A>(operator: &A, b: &Array1<f64>, config: &CgConfig) -> CgSolution
where
    A: LinearOperator,
{
    cg_preconditioned(operator, &IdentityPreconditioner, b, config)
}

/// Solve Ax = b using preconditioned Conjugate Gradient
///
/// The recurrence tracks z = M r; convergence is still measured on the
/// unpreconditioned residual so results are comparable across preconditioners.
pub fn cg_preconditioned<A, P>(
    operator: &A,
    precond: &P,
    b: &Array1<f64>,
    config: &CgConfig,
) -> CgSolution
where
    A: LinearOperator,
    P: Preconditioner,
{
    let n = b.len();
    let mut x = Array1::zeros(n);

    let b_norm = norm2(b);
    if b_norm < 1e-300 {
        return CgSolution {
            x,
            iterations: 0,
            residual: 0.0,
            converged: true,
        };
    }

    // r = b - Ax = b (since x = 0)
    let mut r = b.clone();
    let mut z = precond.apply(&r);
    let mut p = z.clone();
    let mut rz = dot(&r, &z);

    for iter in 0..config.max_iterations {
        let q = operator.apply(&p);

        let pq = dot(&p, &q);
        if pq.abs() < BREAKDOWN || !pq.is_finite() {
            return CgSolution {
                x,
                iterations: iter,
                residual: norm2(&r) / b_norm,
                converged: false,
            };
        }

        let alpha = rz / pq;
        x.scaled_add(alpha, &p);
        r.scaled_add(-alpha, &q);

        let rel_residual = norm2(&r) / b_norm;

        if config.print_interval > 0 && (iter + 1) % config.print_interval == 0 {
            log::info!(
                "CG iteration {}: relative residual = {:.6e}",
                iter + 1,
                rel_residual
            );
        }

        if rel_residual < config.tolerance {
            return CgSolution {
                x,
                iterations: iter + 1,
                residual: rel_residual,
                converged: true,
            };
        }

        z = precond.apply(&r);
        let rz_new = dot(&r, &z);
        if rz.abs() < BREAKDOWN {
            return CgSolution {
                x,
                iterations: iter + 1,
                residual: rel_residual,
                converged: false,
            };
        }

        let beta = rz_new / rz;
        rz = rz_new;

        // p = z + beta * p
        p = &z + &(&p * beta);
    }

    CgSolution {
        residual: norm2(&r) / b_norm,
        x,
        iterations: config.max_iterations,
        converged: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preconditioners::{DiagonalPreconditioner, IluPreconditioner};
    use crate::sparse::CsrMatrix;
    use ndarray::{Array2, array};

    fn laplacian_1d(n: usize) -> CsrMatrix {
        let mut triplets = Vec::new();
        for i in 0..n {
            triplets.push((i, i, 2.0));
            if i > 0 {
                triplets.push((i, i - 1, -1.0));
            }
            if i + 1 < n {
                triplets.push((i, i + 1, -1.0));
            }
        }
        CsrMatrix::from_triplets(n, n, triplets)
    }

    fn residual_norm(a: &CsrMatrix, x: &Array1<f64>, b: &Array1<f64>) -> f64 {
        norm2(&(&a.matvec(x) - b))
    }

    #[test]
    fn test_cg_spd() {
        let dense = array![[4.0, 1.0], [1.0, 3.0]];
        let a = CsrMatrix::from_dense(&dense, 1e-15);
        let b = array![1.0, 2.0];

        let config = CgConfig {
            max_iterations: 100,
            tolerance: 1e-10,
            print_interval: 0,
        };

        let solution = cg(&a, &b, &config);

        assert!(solution.converged, "CG should converge for SPD matrix");
        assert!(residual_norm(&a, &solution.x, &b) < 1e-8);
    }

    #[test]
    fn test_cg_identity() {
        let n = 5;
        let id = CsrMatrix::identity(n);
        let b = Array1::from_iter((1..=n).map(|i| i as f64));

        let solution = cg(&id, &b, &CgConfig::default());

        assert!(solution.converged);
        assert!(solution.iterations <= 2);
        assert!(norm2(&(&solution.x - &b)) < 1e-10);
    }

    #[test]
    fn test_zero_rhs_returns_zero() {
        let a = laplacian_1d(4);
        let solution = cg(&a, &Array1::zeros(4), &CgConfig::default());
        assert!(solution.converged);
        assert_eq!(solution.iterations, 0);
        assert!(solution.x.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_ilu_preconditioned_cg_needs_fewer_iterations() {
        let n = 200;
        let a = laplacian_1d(n);
        let b = Array1::from_iter((0..n).map(|i| ((i as f64) * 0.1).sin() + 1.0));
        let config = CgConfig::default();

        let plain = cg(&a, &b, &config);
        let ilu = IluPreconditioner::from_csr(&a);
        let preconditioned = cg_preconditioned(&a, &ilu, &b, &config);

        assert!(plain.converged);
        assert!(preconditioned.converged);
        // ILU(0) of a tridiagonal matrix is its exact LU factorization
        assert!(preconditioned.iterations <= 2);
        assert!(preconditioned.iterations < plain.iterations);
        assert!(residual_norm(&a, &preconditioned.x, &b) / norm2(&b) < 1e-9);
    }

    #[test]
    fn test_jacobi_preconditioned_cg() {
        let n = 50;
        let mut dense = Array2::zeros((n, n));
        for i in 0..n {
            dense[[i, i]] = 2.0 + i as f64;
            if i + 1 < n {
                dense[[i, i + 1]] = -1.0;
                dense[[i + 1, i]] = -1.0;
            }
        }
        let a = CsrMatrix::from_dense(&dense, 0.0);
        let b = Array1::ones(n);
        let jacobi = DiagonalPreconditioner::from_csr(&a);

        let solution = cg_preconditioned(&a, &jacobi, &b, &CgConfig::default());
        assert!(solution.converged);
        assert!(residual_norm(&a, &solution.x, &b) < 1e-8);
    }

    #[test]
    fn test_reports_non_convergence() {
        let a = laplacian_1d(100);
        let b = Array1::ones(100);
        let config = CgConfig {
            max_iterations: 3,
            tolerance: 1e-14,
            print_interval: 0,
        };

        let solution = cg(&a, &b, &config);
        assert!(!solution.converged);
        assert_eq!(solution.iterations, 3);
        assert!(solution.residual > 1e-14);
    }
}
