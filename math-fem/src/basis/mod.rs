//! Finite element basis functions
//!
//! Implements the linear (P1) Lagrange basis on the reference line element.

mod shape;

pub use shape::*;
