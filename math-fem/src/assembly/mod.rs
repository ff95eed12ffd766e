//! Finite element matrix assembly
//!
//! Assembles the stiffness matrix, the load vector and the combined Poisson
//! system from a mesh and the P1 basis.

mod load;
mod poisson;
mod stiffness;

pub use load::*;
pub use poisson::*;
pub use stiffness::*;
