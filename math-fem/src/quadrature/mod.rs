//! Numerical quadrature rules for finite element integration
//!
//! Provides Gauss-Legendre rules on the reference line element [-1, 1].

mod gauss;
mod rules;

pub use gauss::*;
pub use rules::*;
