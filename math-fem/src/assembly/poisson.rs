//! Poisson problem assembly: -u'' = f

use super::{StiffnessMatrix, assemble_load, assemble_stiffness};
use crate::mesh::Mesh;
use crate::quadrature::QuadratureRule;
use ndarray::Array1;

/// Default number of Gauss points for the load integral
pub const DEFAULT_LOAD_ORDER: usize = 3;

/// Assembled Poisson system K u = F
#[derive(Debug, Clone)]
pub struct PoissonProblem {
    /// Stiffness matrix K
    pub matrix: StiffnessMatrix,
    /// Load vector F
    pub rhs: Array1<f64>,
}

impl PoissonProblem {
    /// Assemble the weak form of -u'' = f on `mesh`
    ///
    /// The load integral uses a Gauss rule with `load_order` points; boundary
    /// conditions are applied separately.
    pub fn assemble<F>(mesh: &Mesh, load_order: usize, source: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        let matrix = assemble_stiffness(mesh);
        let rhs = assemble_load(mesh, &QuadratureRule::new(load_order), source);

        log::debug!(
            "Assembled Poisson system: {} dofs, {} triplets",
            matrix.dim,
            matrix.nnz()
        );

        Self { matrix, rhs }
    }

    /// Number of degrees of freedom
    pub fn num_dofs(&self) -> usize {
        self.matrix.dim
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::unit_interval;

    #[test]
    fn test_assemble_dimensions() {
        let mesh = unit_interval(8).unwrap();
        let problem = PoissonProblem::assemble(&mesh, DEFAULT_LOAD_ORDER, |x| x * x);
        assert_eq!(problem.num_dofs(), 9);
        assert_eq!(problem.rhs.len(), 9);
        assert_eq!(problem.matrix.nnz(), 4 * 8);
    }
}
