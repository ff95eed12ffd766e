//! Mesh types and generators for FEM
//!
//! This module provides the interval mesh used by 1-D P1 finite elements.

mod generators;
mod types;

pub use generators::*;
pub use types::*;
