//! Stiffness matrix assembly
//!
//! Assembles the element stiffness matrix K where K_ij = ∫ φ_i' φ_j' dx

use crate::basis::{Jacobian, evaluate_shape};
use crate::mesh::Mesh;
use crate::quadrature::{QuadratureRule, for_stiffness};
use solvers::CsrMatrix;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Assembled stiffness matrix in triplet format
#[derive(Debug, Clone)]
pub struct StiffnessMatrix {
    /// Row indices
    pub rows: Vec<usize>,
    /// Column indices
    pub cols: Vec<usize>,
    /// Values
    pub values: Vec<f64>,
    /// Matrix dimension
    pub dim: usize,
}

impl StiffnessMatrix {
    pub fn new(dim: usize) -> Self {
        Self {
            rows: Vec::new(),
            cols: Vec::new(),
            values: Vec::new(),
            dim,
        }
    }

    /// Add a triplet (i, j, value)
    pub fn add(&mut self, i: usize, j: usize, value: f64) {
        self.rows.push(i);
        self.cols.push(j);
        self.values.push(value);
    }

    /// Number of stored triplets (duplicates included)
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Compress to CSR, summing duplicate entries
    pub fn to_csr(&self) -> CsrMatrix {
        let triplets = self
            .rows
            .iter()
            .zip(&self.cols)
            .zip(&self.values)
            .map(|((&i, &j), &v)| (i, j, v))
            .collect();
        CsrMatrix::from_triplets(self.dim, self.dim, triplets)
    }
}

/// Compute the element stiffness matrix of a P1 line element
///
/// For an element of length h this is [[1, -1], [-1, 1]] / h.
pub fn element_stiffness(
    mesh: &Mesh,
    elem_idx: usize,
    quad: &QuadratureRule,
) -> ([usize; 2], [[f64; 2]; 2]) {
    let nodes = mesh.elements[elem_idx].nodes;
    let coords = mesh.element_coords(elem_idx);

    let mut k_local = [[0.0; 2]; 2];

    for qp in quad.iter() {
        let shape = evaluate_shape(qp.xi);
        let jac = Jacobian::from_1d(&shape.gradients, &coords);
        let det_j = jac.det.abs();

        let grads_phys = shape.gradients.map(|g| jac.transform_gradient(g));

        // K_ij += (N_i' * N_j') * det(J) * weight
        for i in 0..2 {
            for j in 0..2 {
                k_local[i][j] += grads_phys[i] * grads_phys[j] * det_j * qp.weight;
            }
        }
    }

    (nodes, k_local)
}

/// Assemble the global stiffness matrix
pub fn assemble_stiffness(mesh: &Mesh) -> StiffnessMatrix {
    let quad = for_stiffness(1);

    #[cfg(feature = "parallel")]
    let locals: Vec<_> = (0..mesh.num_elements())
        .into_par_iter()
        .map(|e| element_stiffness(mesh, e, &quad))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let locals: Vec<_> = (0..mesh.num_elements())
        .map(|e| element_stiffness(mesh, e, &quad))
        .collect();

    let mut matrix = StiffnessMatrix::new(mesh.num_nodes());
    for (nodes, k_local) in locals {
        for (i, &gi) in nodes.iter().enumerate() {
            for (j, &gj) in nodes.iter().enumerate() {
                matrix.add(gi, gj, k_local[i][j]);
            }
        }
    }

    matrix
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{Mesh, unit_interval};
    use approx::assert_relative_eq;

    #[test]
    fn test_element_stiffness_p1() {
        let mesh = Mesh::from_nodes(vec![0.0, 0.25]).unwrap();
        let (nodes, k) = element_stiffness(&mesh, 0, &for_stiffness(1));
        assert_eq!(nodes, [0, 1]);
        assert_relative_eq!(k[0][0], 4.0, epsilon = 1e-12);
        assert_relative_eq!(k[0][1], -4.0, epsilon = 1e-12);
        assert_relative_eq!(k[1][0], -4.0, epsilon = 1e-12);
        assert_relative_eq!(k[1][1], 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_global_stiffness_is_tridiagonal_and_symmetric() {
        let n = 4;
        let mesh = unit_interval(n).unwrap();
        let csr = assemble_stiffness(&mesh).to_csr();
        let h = 1.0 / n as f64;

        assert_eq!(csr.num_rows, n + 1);
        assert_eq!(csr.nnz(), 3 * (n + 1) - 2);
        assert!(csr.is_symmetric(1e-12));
        assert_relative_eq!(csr.get(0, 0), 1.0 / h, epsilon = 1e-10);
        assert_relative_eq!(csr.get(2, 2), 2.0 / h, epsilon = 1e-10);
        assert_relative_eq!(csr.get(2, 3), -1.0 / h, epsilon = 1e-10);
        assert_eq!(csr.get(0, 2), 0.0);
    }

    #[test]
    fn test_constants_are_in_kernel() {
        let mesh = unit_interval(7).unwrap();
        let csr = assemble_stiffness(&mesh).to_csr();
        let ones = ndarray::Array1::ones(csr.num_cols);
        let k1 = csr.matvec(&ones);
        assert!(k1.iter().all(|v| v.abs() < 1e-10));
    }
}
