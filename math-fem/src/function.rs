//! Piecewise-linear finite element functions
//!
//! A [`FemFunction`] pairs a mesh with one value per node and evaluates the
//! P1 interpolant anywhere in the meshed interval.

use crate::basis::{Jacobian, evaluate_shape, p1_line_grad};
use crate::error::{FemError, Result};
use crate::mesh::Mesh;
use ndarray::Array1;

/// Distance outside the mesh within which points are clamped to the end points
pub const LOCATE_TOLERANCE: f64 = 1e-5;

/// Continuous piecewise-linear field on a 1-D mesh
#[derive(Debug, Clone)]
pub struct FemFunction {
    mesh: Mesh,
    values: Array1<f64>,
}

impl FemFunction {
    /// Wrap nodal values; there must be exactly one value per mesh node
    pub fn new(mesh: Mesh, values: Array1<f64>) -> Result<Self> {
        if values.len() != mesh.num_nodes() {
            return Err(FemError::DofMismatch {
                expected: mesh.num_nodes(),
                got: values.len(),
            });
        }
        Ok(Self { mesh, values })
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Nodal values
    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    /// Evaluate the interpolant at `x`
    ///
    /// Points up to [`LOCATE_TOLERANCE`] outside the interval are clamped onto
    /// the nearest end point; anything further out is an error.
    pub fn evaluate(&self, x: f64) -> Result<f64> {
        let (lower, upper) = self.mesh.bounds();
        let outside = || FemError::PointOutsideDomain { x, lower, upper };

        if !x.is_finite() || x < lower - LOCATE_TOLERANCE || x > upper + LOCATE_TOLERANCE {
            return Err(outside());
        }
        let x = x.clamp(lower, upper);
        let elem = self.mesh.locate(x).ok_or_else(outside)?;

        let coords = self.mesh.element_coords(elem);
        let jac = Jacobian::from_1d(&p1_line_grad(), &coords);
        let shape = evaluate_shape(jac.to_reference(x));
        let [a, b] = self.mesh.elements[elem].nodes;

        Ok(shape.values[0] * self.values[a] + shape.values[1] * self.values[b])
    }

    /// Evaluate the interpolant at every point, failing on the first bad one
    pub fn evaluate_many(&self, points: &[f64]) -> Result<Vec<f64>> {
        points.iter().map(|&x| self.evaluate(x)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::unit_interval;
    use approx::assert_relative_eq;

    fn hat_squared(n: usize) -> FemFunction {
        let mesh = unit_interval(n).unwrap();
        let values = Array1::from_iter(mesh.nodes.iter().map(|x| x * x));
        FemFunction::new(mesh, values).unwrap()
    }

    #[test]
    fn test_interpolates_nodes_exactly() {
        let u = hat_squared(4);
        assert_relative_eq!(u.evaluate(0.5).unwrap(), 0.25, epsilon = 1e-15);
        assert_relative_eq!(u.evaluate(1.0).unwrap(), 1.0, epsilon = 1e-15);
        assert_relative_eq!(u.evaluate(0.0).unwrap(), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_linear_between_nodes() {
        let u = hat_squared(2);
        // Between (0.5, 0.25) and (1.0, 1.0)
        assert_relative_eq!(u.evaluate(0.75).unwrap(), 0.625, epsilon = 1e-14);
    }

    #[test]
    fn test_clamps_within_tolerance() {
        let u = hat_squared(4);
        assert_relative_eq!(u.evaluate(1.0 + 5e-6).unwrap(), 1.0, epsilon = 1e-15);
        assert_relative_eq!(u.evaluate(-5e-6).unwrap(), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_rejects_points_outside() {
        let u = hat_squared(4);
        let err = u.evaluate(1.01).unwrap_err();
        assert!(matches!(err, FemError::PointOutsideDomain { .. }));
        assert!(u.evaluate(f64::NAN).is_err());
        assert!(u.evaluate_many(&[0.1, 2.0]).is_err());
    }

    #[test]
    fn test_dof_mismatch() {
        let mesh = unit_interval(4).unwrap();
        let err = FemFunction::new(mesh, Array1::zeros(3)).unwrap_err();
        assert!(matches!(err, FemError::DofMismatch { expected: 5, got: 3 }));
    }
}
