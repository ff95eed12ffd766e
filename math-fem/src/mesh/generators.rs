//! Mesh generators for intervals

use super::types::Mesh;
use crate::error::{FemError, Result};

/// Uniform mesh of `[a, b]` with `n` equal elements (`n + 1` nodes)
///
/// The last node is set to `b` exactly so boundary conditions land on the
/// requested end point.
pub fn interval_mesh(a: f64, b: f64, n: usize) -> Result<Mesh> {
    if n == 0 {
        return Err(FemError::invalid_mesh("element count must be positive"));
    }
    if !(a.is_finite() && b.is_finite()) || b <= a {
        return Err(FemError::invalid_mesh(format!(
            "interval [{a}, {b}] is empty or not finite"
        )));
    }

    let h = (b - a) / n as f64;
    let mut nodes: Vec<f64> = (0..=n).map(|i| a + i as f64 * h).collect();
    nodes[n] = b;

    Mesh::from_nodes(nodes)
}

/// Uniform mesh of the unit interval `[0, 1]`
pub fn unit_interval(n: usize) -> Result<Mesh> {
    interval_mesh(0.0, 1.0, n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{LEFT_BOUNDARY, RIGHT_BOUNDARY};

    #[test]
    fn test_interval_mesh() {
        let mesh = interval_mesh(-1.0, 1.0, 4).unwrap();
        assert_eq!(mesh.num_nodes(), 5);
        assert_eq!(mesh.num_elements(), 4);
        assert_eq!(mesh.nodes[2], 0.0);
        assert_eq!(mesh.bounds(), (-1.0, 1.0));
    }

    #[test]
    fn test_unit_interval_end_points() {
        let mesh = unit_interval(3).unwrap();
        assert_eq!(mesh.nodes[mesh.boundary_nodes(LEFT_BOUNDARY)[0]], 0.0);
        assert_eq!(mesh.nodes[mesh.boundary_nodes(RIGHT_BOUNDARY)[0]], 1.0);
        let total: f64 = (0..mesh.num_elements())
            .map(|e| mesh.element_measure(e))
            .sum();
        assert!((total - 1.0).abs() < 1e-14);
    }

    #[test]
    fn test_rejects_degenerate_input() {
        assert!(unit_interval(0).is_err());
        assert!(interval_mesh(1.0, 1.0, 4).is_err());
        assert!(interval_mesh(0.0, f64::INFINITY, 4).is_err());
    }
}
