//! FEM solvers for the Poisson system
//!
//! This module solves the assembled Poisson system using sparse matrix
//! operations from the `math-poisson-solvers` crate.
//!
//! # Solver Types
//!
//! - **Cg**: conjugate gradient without preconditioning
//! - **CgJacobi**: CG with diagonal scaling
//! - **CgIlu**: CG with ILU(0) preconditioning (default, exact LU in 1-D)

use crate::assembly::PoissonProblem;
use ndarray::Array1;
use solvers::{
    CgConfig, CgSolution, CsrMatrix, DiagonalPreconditioner, IluPreconditioner, cg,
    cg_preconditioned,
};
use std::time::Instant;
use thiserror::Error;

/// Solver configuration
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Solver type to use
    pub solver_type: SolverType,
    /// CG configuration
    pub cg: CgConfig,
    /// Verbosity level (0 = quiet, 1 = summary, 2+ = detailed)
    pub verbosity: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            solver_type: SolverType::CgIlu,
            cg: CgConfig {
                max_iterations: 20_000,
                tolerance: 1e-10,
                print_interval: 0,
            },
            verbosity: 0,
        }
    }
}

/// Type of solver to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolverType {
    /// CG without preconditioning
    Cg,
    /// CG with Jacobi (diagonal) preconditioning
    CgJacobi,
    /// CG with ILU(0) preconditioning
    #[default]
    CgIlu,
}

/// Solution result from the solver
#[derive(Debug, Clone)]
pub struct Solution {
    /// Nodal values
    pub values: Array1<f64>,
    /// Number of CG iterations
    pub iterations: usize,
    /// Final relative residual
    pub residual: f64,
}

/// Solver errors
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("solver failed to converge after {iterations} iterations (residual: {residual:.3e})")]
    ConvergenceFailure { iterations: usize, residual: f64 },
    #[error("matrix dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Solve a Poisson problem with boundary conditions already applied
pub fn solve(problem: &PoissonProblem, config: &SolverConfig) -> Result<Solution, SolverError> {
    let start = Instant::now();
    let csr = problem.matrix.to_csr();
    let csr_time = start.elapsed();

    if config.verbosity > 0 {
        log::info!(
            "[FEM] System: {} DOFs, {} nnz, sparsity {:.4}%, CSR convert: {:.3}ms",
            csr.num_rows,
            csr.nnz(),
            csr.sparsity() * 100.0,
            csr_time.as_secs_f64() * 1000.0
        );
    }

    solve_csr(&csr, &problem.rhs, config)
}

/// Solve a CSR system directly
pub fn solve_csr(
    csr: &CsrMatrix,
    rhs: &Array1<f64>,
    config: &SolverConfig,
) -> Result<Solution, SolverError> {
    if csr.num_rows != rhs.len() || csr.num_cols != rhs.len() {
        return Err(SolverError::DimensionMismatch {
            expected: csr.num_rows,
            actual: rhs.len(),
        });
    }

    let solve_start = Instant::now();
    let result = match config.solver_type {
        SolverType::Cg => cg(csr, rhs, &config.cg),
        SolverType::CgJacobi => {
            let precond = DiagonalPreconditioner::from_csr(csr);
            cg_preconditioned(csr, &precond, rhs, &config.cg)
        }
        SolverType::CgIlu => {
            let precond = IluPreconditioner::from_csr(csr);
            cg_preconditioned(csr, &precond, rhs, &config.cg)
        }
    };
    let solve_time = solve_start.elapsed();

    if config.verbosity > 0 {
        log::info!(
            "[FEM] {:?}: {} iters, residual {:.2e}, time {:.3}ms",
            config.solver_type,
            result.iterations,
            result.residual,
            solve_time.as_secs_f64() * 1000.0
        );
    }

    into_solution(result)
}

fn into_solution(result: CgSolution) -> Result<Solution, SolverError> {
    if !result.converged || result.x.iter().any(|v| !v.is_finite()) {
        return Err(SolverError::ConvergenceFailure {
            iterations: result.iterations,
            residual: result.residual,
        });
    }
    Ok(Solution {
        values: result.x,
        iterations: result.iterations,
        residual: result.residual,
    })
}
