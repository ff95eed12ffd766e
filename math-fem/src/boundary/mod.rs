//! Boundary condition handling for finite element problems
//!
//! Only essential (Dirichlet) conditions are needed at the end points of
//! an interval.

mod dirichlet;

pub use dirichlet::*;
