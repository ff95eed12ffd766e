//! Dirichlet (essential) boundary conditions
//!
//! Implements u = g on the boundary by modifying the system matrix and RHS.

use crate::assembly::{PoissonProblem, StiffnessMatrix};
use crate::mesh::Mesh;
use std::collections::HashMap;

/// Dirichlet boundary condition: u = g on boundary
pub struct DirichletBC {
    /// Boundary marker from mesh
    pub tag: usize,
    /// Value function g(x)
    value_fn: Box<dyn Fn(f64) -> f64 + Send + Sync>,
}

impl std::fmt::Debug for DirichletBC {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirichletBC")
            .field("tag", &self.tag)
            .finish()
    }
}

impl DirichletBC {
    pub fn new<F>(tag: usize, value_fn: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Self {
            tag,
            value_fn: Box::new(value_fn),
        }
    }

    /// Constant boundary value
    pub fn constant(tag: usize, value: f64) -> Self {
        Self::new(tag, move |_| value)
    }

    /// Evaluate the boundary value at a point
    pub fn value(&self, x: f64) -> f64 {
        (self.value_fn)(x)
    }

    /// Get boundary nodes from mesh with this tag (marker)
    pub fn boundary_nodes(&self, mesh: &Mesh) -> Vec<usize> {
        mesh.boundary_nodes(self.tag)
    }
}

/// Apply Dirichlet conditions to the Poisson system using row elimination
///
/// For each Dirichlet node i with value g_i:
/// - Set A[i, :] = 0 and A[:, i] = 0
/// - Set A[i, i] = 1
/// - Set b[i] = g_i
/// - Modify b[j] -= A[j, i] * g_i for all other j
///
/// The system stays symmetric positive definite, so CG applies.
/// If a node is listed by several conditions the first one wins.
pub fn apply_dirichlet(problem: &mut PoissonProblem, mesh: &Mesh, dirichlet_bcs: &[DirichletBC]) {
    let mut dirichlet_map: HashMap<usize, f64> = HashMap::new();
    for bc in dirichlet_bcs {
        for node in bc.boundary_nodes(mesh) {
            dirichlet_map
                .entry(node)
                .or_insert_with(|| bc.value(mesh.nodes[node]));
        }
    }

    if dirichlet_map.is_empty() {
        log::warn!("apply_dirichlet: no boundary nodes matched the given tags");
        return;
    }

    let matrix = &problem.matrix;
    let n = matrix.dim;

    // Lifting: move known columns to the right-hand side
    for k in 0..matrix.nnz() {
        let (row, col) = (matrix.rows[k], matrix.cols[k]);
        if dirichlet_map.contains_key(&row) {
            continue;
        }
        if let Some(&g) = dirichlet_map.get(&col) {
            problem.rhs[row] -= matrix.values[k] * g;
        }
    }

    for (&node, &value) in &dirichlet_map {
        problem.rhs[node] = value;
    }

    let mut reduced = StiffnessMatrix::new(n);
    for k in 0..matrix.nnz() {
        let (row, col) = (matrix.rows[k], matrix.cols[k]);
        if dirichlet_map.contains_key(&row) || dirichlet_map.contains_key(&col) {
            continue;
        }
        reduced.add(row, col, matrix.values[k]);
    }

    let mut constrained: Vec<usize> = dirichlet_map.keys().copied().collect();
    constrained.sort_unstable();
    for node in constrained {
        reduced.add(node, node, 1.0);
    }

    problem.matrix = reduced;
}

/// Apply homogeneous Dirichlet conditions (u = 0)
pub fn apply_homogeneous_dirichlet(problem: &mut PoissonProblem, mesh: &Mesh, tags: &[usize]) {
    let bcs: Vec<DirichletBC> = tags
        .iter()
        .map(|&tag| DirichletBC::constant(tag, 0.0))
        .collect();

    apply_dirichlet(problem, mesh, &bcs);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::PoissonProblem;
    use crate::mesh::{LEFT_BOUNDARY, RIGHT_BOUNDARY, unit_interval};
    use approx::assert_relative_eq;

    #[test]
    fn test_dirichlet_bc_creation() {
        let bc = DirichletBC::new(1, |x| 2.0 * x);
        assert_eq!(bc.tag, 1);
        assert_eq!(bc.value(1.5), 3.0);
    }

    #[test]
    fn test_apply_dirichlet_rows_and_lifting() {
        let n = 4;
        let mesh = unit_interval(n).unwrap();
        let mut problem = PoissonProblem::assemble(&mesh, 2, |_| 0.0);

        apply_dirichlet(
            &mut problem,
            &mesh,
            &[
                DirichletBC::constant(LEFT_BOUNDARY, 1.0),
                DirichletBC::constant(RIGHT_BOUNDARY, 3.0),
            ],
        );

        let csr = problem.matrix.to_csr();
        assert!(csr.is_symmetric(1e-12));
        assert_relative_eq!(csr.get(0, 0), 1.0);
        assert_eq!(csr.get(0, 1), 0.0);
        assert_eq!(csr.get(1, 0), 0.0);
        assert_relative_eq!(problem.rhs[0], 1.0);
        assert_relative_eq!(problem.rhs[n], 3.0);
        // b[1] -= K[1,0] * g_left with K[1,0] = -1/h
        assert_relative_eq!(problem.rhs[1], n as f64 * 1.0, epsilon = 1e-12);
        assert_relative_eq!(problem.rhs[n - 1], n as f64 * 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_first_condition_wins_on_shared_node() {
        let mesh = unit_interval(2).unwrap();
        let mut problem = PoissonProblem::assemble(&mesh, 2, |_| 1.0);
        apply_dirichlet(
            &mut problem,
            &mesh,
            &[
                DirichletBC::constant(LEFT_BOUNDARY, 5.0),
                DirichletBC::constant(LEFT_BOUNDARY, 7.0),
            ],
        );
        assert_relative_eq!(problem.rhs[0], 5.0);
    }

    #[test]
    fn test_apply_homogeneous_dirichlet() {
        let mesh = unit_interval(6).unwrap();
        let mut problem = PoissonProblem::assemble(&mesh, 2, |_| 1.0);
        apply_homogeneous_dirichlet(&mut problem, &mesh, &[LEFT_BOUNDARY, RIGHT_BOUNDARY]);
        assert_eq!(problem.rhs[0], 0.0);
        assert_eq!(problem.rhs[6], 0.0);
    }
}
