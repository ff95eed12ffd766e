//! P1 finite element solver for the 1-D Poisson equation
//!
//! This crate discretizes `-u'' = f` on an interval with continuous
//! piecewise-linear elements, applies Dirichlet conditions at the end points
//! and solves the resulting SPD system with preconditioned conjugate gradient.
//!
//! # Features
//!
//! - **Interval meshes**: uniform or user-given strictly increasing nodes
//! - **Lagrange elements**: P1 basis on the reference line element
//! - **Boundary conditions**: Dirichlet by row elimination with lifting
//! - **Solvers**: CG, CG + Jacobi, CG + ILU(0)
//!
//! # Example
//!
//! ```
//! use math_poisson_fem::assembly::PoissonProblem;
//! use math_poisson_fem::boundary::{DirichletBC, apply_dirichlet};
//! use math_poisson_fem::mesh::{LEFT_BOUNDARY, RIGHT_BOUNDARY, unit_interval};
//! use math_poisson_fem::solver::{SolverConfig, solve};
//! use math_poisson_fem::FemFunction;
//!
//! let mesh = unit_interval(16)?;
//! let mut problem = PoissonProblem::assemble(&mesh, 3, |_| 2.0);
//! apply_dirichlet(
//!     &mut problem,
//!     &mesh,
//!     &[DirichletBC::constant(LEFT_BOUNDARY, 0.0), DirichletBC::constant(RIGHT_BOUNDARY, 0.0)],
//! );
//! let solution = solve(&problem, &SolverConfig::default())?;
//! let u = FemFunction::new(mesh, solution.values)?;
//! // u = x (1 - x)
//! assert!((u.evaluate(0.5)? - 0.25).abs() < 1e-8);
//! # Ok::<(), math_poisson_fem::FemError>(())
//! ```

pub mod assembly;
pub mod basis;
pub mod boundary;
pub mod error;
pub mod function;
pub mod mesh;
pub mod quadrature;
pub mod solver;

pub use error::{FemError, Result};
pub use function::FemFunction;

/// Library version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
