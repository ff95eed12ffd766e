//! Linear solvers for symmetric positive definite FEM systems
//!
//! This crate provides the sparse storage, Krylov solver and preconditioners
//! used by the Poisson finite element discretization.
//!
//! # Features
//!
//! - **Iterative Solvers**: CG, preconditioned CG
//! - **Preconditioners**: Jacobi, ILU(0)
//! - **Sparse Matrices**: CSR format with efficient matrix-vector products
//!
//! # Example
//!
//! ```
//! use math_poisson_solvers::{CgConfig, CsrMatrix, IluPreconditioner, cg_preconditioned};
//! use ndarray::array;
//!
//! let triplets = vec![(0, 0, 2.0), (0, 1, -1.0), (1, 0, -1.0), (1, 1, 2.0)];
//! let matrix = CsrMatrix::from_triplets(2, 2, triplets);
//! let ilu = IluPreconditioner::from_csr(&matrix);
//!
//! let solution = cg_preconditioned(&matrix, &ilu, &array![1.0, 1.0], &CgConfig::default());
//! assert!(solution.converged);
//! assert!((solution.x[0] - 1.0).abs() < 1e-10);
//! ```

pub mod iterative;
pub mod preconditioners;
pub mod sparse;
pub mod traits;

// Re-export main types
pub use sparse::CsrMatrix;
pub use traits::{LinearOperator, Preconditioner, dot, norm2};

// Re-export iterative solvers
pub use iterative::{CgConfig, CgSolution, cg, cg_preconditioned};

// Re-export preconditioners
pub use preconditioners::{DiagonalPreconditioner, IdentityPreconditioner, IluPreconditioner};
