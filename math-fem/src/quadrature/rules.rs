//! Quadrature rule selection based on polynomial degree

use super::gauss::{QuadraturePoint, gauss_legendre_1d};

/// Quadrature rule on the reference line element
#[derive(Debug, Clone)]
pub struct QuadratureRule {
    /// Number of Gauss points
    pub order: usize,
    /// Quadrature points and weights
    pub points: Vec<QuadraturePoint>,
}

impl QuadratureRule {
    /// Gauss-Legendre rule with `order` points
    pub fn new(order: usize) -> Self {
        let points = gauss_legendre_1d(order);
        Self {
            order: points.len(),
            points,
        }
    }

    /// Number of quadrature points
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Iterator over quadrature points
    pub fn iter(&self) -> impl Iterator<Item = &QuadraturePoint> {
        self.points.iter()
    }
}

/// Minimum number of Gauss points for the stiffness integrand of degree `p` elements
///
/// Derivatives reduce the degree by 1, so the integrand has degree 2p - 2
/// and `n` points with 2n - 1 >= 2p - 2 suffice.
pub fn required_order_for_stiffness(polynomial_degree: usize) -> usize {
    polynomial_degree.max(1)
}

/// Rule for the stiffness matrix of degree `p` elements
pub fn for_stiffness(polynomial_degree: usize) -> QuadratureRule {
    QuadratureRule::new(required_order_for_stiffness(polynomial_degree))
}
