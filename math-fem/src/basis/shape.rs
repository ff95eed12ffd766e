//! Shape function evaluation for line elements
//!
//! The reference element is [-1, 1] with nodes at xi = -1 and xi = 1.

/// P1 line shape functions: N0 = (1 - xi)/2, N1 = (1 + xi)/2
pub fn p1_line(xi: f64) -> [f64; 2] {
    [0.5 * (1.0 - xi), 0.5 * (1.0 + xi)]
}

/// Gradients of P1 line shape functions with respect to xi
pub fn p1_line_grad() -> [f64; 2] {
    [-0.5, 0.5]
}

/// Shape functions evaluated at a point
#[derive(Debug, Clone, Copy)]
pub struct ShapeValues {
    /// Basis function values [N_0, N_1]
    pub values: [f64; 2],
    /// Basis function derivatives [dN_0/dxi, dN_1/dxi]
    pub gradients: [f64; 2],
}

/// Evaluate P1 shape functions at a reference point
pub fn evaluate_shape(xi: f64) -> ShapeValues {
    ShapeValues {
        values: p1_line(xi),
        gradients: p1_line_grad(),
    }
}

/// Jacobian of the map from the reference element to a physical element
#[derive(Debug, Clone, Copy)]
pub struct Jacobian {
    /// dx/dxi
    pub det: f64,
    /// dxi/dx
    pub inverse: f64,
    /// Physical coordinate of the reference origin
    center: f64,
}

impl Jacobian {
    /// Compute the Jacobian from shape function gradients and node coordinates
    pub fn from_1d(grad_ref: &[f64; 2], coords: &[f64; 2]) -> Self {
        let det = grad_ref[0] * coords[0] + grad_ref[1] * coords[1];
        Self {
            det,
            inverse: 1.0 / det,
            center: 0.5 * (coords[0] + coords[1]),
        }
    }

    /// Transform a reference derivative to physical space
    #[inline]
    pub fn transform_gradient(&self, grad_ref: f64) -> f64 {
        grad_ref * self.inverse
    }

    /// Physical coordinate of reference point `xi`
    #[inline]
    pub fn to_physical(&self, xi: f64) -> f64 {
        self.center + self.det * xi
    }

    /// Reference coordinate of physical point `x`
    #[inline]
    pub fn to_reference(&self, x: f64) -> f64 {
        (x - self.center) * self.inverse
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_partition_of_unity() {
        for &xi in &[-1.0, -0.3, 0.0, 0.7, 1.0] {
            let n = p1_line(xi);
            assert_relative_eq!(n[0] + n[1], 1.0, epsilon = 1e-15);
        }
        assert_eq!(p1_line(-1.0), [1.0, 0.0]);
        assert_eq!(p1_line(1.0), [0.0, 1.0]);
    }

    #[test]
    fn test_jacobian_maps_element() {
        let jac = Jacobian::from_1d(&p1_line_grad(), &[0.25, 0.75]);
        assert_relative_eq!(jac.det, 0.25, epsilon = 1e-15);
        assert_relative_eq!(jac.to_physical(-1.0), 0.25, epsilon = 1e-15);
        assert_relative_eq!(jac.to_physical(1.0), 0.75, epsilon = 1e-15);
        assert_relative_eq!(jac.to_reference(0.5), 0.0, epsilon = 1e-15);
        // dN1/dx = 1/h
        assert_relative_eq!(jac.transform_gradient(0.5), 2.0, epsilon = 1e-14);
    }
}
