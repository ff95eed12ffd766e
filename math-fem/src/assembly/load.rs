//! Load vector assembly: F_i = ∫ f φ_i dx

use crate::basis::{Jacobian, evaluate_shape};
use crate::mesh::Mesh;
use crate::quadrature::QuadratureRule;
use ndarray::Array1;

/// Element load vector for source `f`
pub fn element_load<F>(mesh: &Mesh, elem_idx: usize, quad: &QuadratureRule, source: &F) -> [f64; 2]
where
    F: Fn(f64) -> f64,
{
    let coords = mesh.element_coords(elem_idx);
    let mut f_local = [0.0; 2];

    for qp in quad.iter() {
        let shape = evaluate_shape(qp.xi);
        let jac = Jacobian::from_1d(&shape.gradients, &coords);
        let fx = source(jac.to_physical(qp.xi));
        let scale = fx * jac.det.abs() * qp.weight;

        for (fi, ni) in f_local.iter_mut().zip(shape.values) {
            *fi += ni * scale;
        }
    }

    f_local
}

/// Assemble the global load vector
pub fn assemble_load<F>(mesh: &Mesh, quad: &QuadratureRule, source: F) -> Array1<f64>
where
    F: Fn(f64) -> f64,
{
    let mut rhs = Array1::zeros(mesh.num_nodes());
    for e in 0..mesh.num_elements() {
        let f_local = element_load(mesh, e, quad, &source);
        for (&node, value) in mesh.elements[e].nodes.iter().zip(f_local) {
            rhs[node] += value;
        }
    }
    rhs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::unit_interval;
    use approx::assert_relative_eq;

    #[test]
    fn test_constant_source_integrates_to_length() {
        let mesh = unit_interval(5).unwrap();
        let rhs = assemble_load(&mesh, &QuadratureRule::new(2), |_| 3.0);
        assert_relative_eq!(rhs.sum(), 3.0, epsilon = 1e-13);
        // Interior hat functions integrate to h
        assert_relative_eq!(rhs[2], 3.0 * 0.2, epsilon = 1e-13);
        assert_relative_eq!(rhs[0], 3.0 * 0.1, epsilon = 1e-13);
    }

    #[test]
    fn test_linear_source_is_exact() {
        // ∫_0^1 x φ_i dx with φ_i the hat at x_i = i h equals x_i h for interior nodes
        let n = 4;
        let mesh = unit_interval(n).unwrap();
        let rhs = assemble_load(&mesh, &QuadratureRule::new(2), |x| x);
        let h = 1.0 / n as f64;
        for i in 1..n {
            assert_relative_eq!(rhs[i], i as f64 * h * h, epsilon = 1e-13);
        }
    }
}
