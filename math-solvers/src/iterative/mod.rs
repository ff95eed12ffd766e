//! Iterative solvers for linear systems
//!
//! The Poisson stiffness matrix is symmetric positive definite, so the only
//! Krylov method needed is Conjugate Gradient:
//! - [`cg`]: plain CG
//! - [`cg_preconditioned`]: CG with any [`crate::Preconditioner`]

mod cg;

pub use cg::{CgConfig, CgSolution, cg, cg_preconditioned};
