//! Gauss-Legendre quadrature points and weights

/// A single quadrature point with weight
#[derive(Debug, Clone, Copy)]
pub struct QuadraturePoint {
    /// Reference coordinate in [-1, 1]
    pub xi: f64,
    /// Integration weight
    pub weight: f64,
}

impl QuadraturePoint {
    pub fn new(xi: f64, weight: f64) -> Self {
        Self { xi, weight }
    }
}

/// Highest tabulated order
pub const MAX_GAUSS_ORDER: usize = 5;

/// 1D Gauss-Legendre quadrature on [-1, 1]
///
/// An `order`-point rule integrates polynomials of degree `2 * order - 1`
/// exactly. Orders above [`MAX_GAUSS_ORDER`] use the 5-point rule, order 0
/// uses the 1-point rule.
pub fn gauss_legendre_1d(order: usize) -> Vec<QuadraturePoint> {
    match order {
        0 | 1 => vec![QuadraturePoint::new(0.0, 2.0)],
        2 => {
            let x = 1.0 / 3.0_f64.sqrt();
            vec![QuadraturePoint::new(-x, 1.0), QuadraturePoint::new(x, 1.0)]
        }
        3 => {
            let x = (3.0 / 5.0_f64).sqrt();
            vec![
                QuadraturePoint::new(-x, 5.0 / 9.0),
                QuadraturePoint::new(0.0, 8.0 / 9.0),
                QuadraturePoint::new(x, 5.0 / 9.0),
            ]
        }
        4 => {
            let a = (3.0 / 7.0 - 2.0 / 7.0 * (6.0 / 5.0_f64).sqrt()).sqrt();
            let b = (3.0 / 7.0 + 2.0 / 7.0 * (6.0 / 5.0_f64).sqrt()).sqrt();
            let wa = (18.0 + 30.0_f64.sqrt()) / 36.0;
            let wb = (18.0 - 30.0_f64.sqrt()) / 36.0;
            vec![
                QuadraturePoint::new(-b, wb),
                QuadraturePoint::new(-a, wa),
                QuadraturePoint::new(a, wa),
                QuadraturePoint::new(b, wb),
            ]
        }
        _ => {
            let a = (5.0 - 2.0 * (10.0 / 7.0_f64).sqrt()).sqrt() / 3.0;
            let b = (5.0 + 2.0 * (10.0 / 7.0_f64).sqrt()).sqrt() / 3.0;
            let wa = (322.0 + 13.0 * 70.0_f64.sqrt()) / 900.0;
            let wb = (322.0 - 13.0 * 70.0_f64.sqrt()) / 900.0;
            vec![
                QuadraturePoint::new(-b, wb),
                QuadraturePoint::new(-a, wa),
                QuadraturePoint::new(0.0, 128.0 / 225.0),
                QuadraturePoint::new(a, wa),
                QuadraturePoint::new(b, wb),
            ]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gauss_1d_integrates_polynomials() {
        for order in 1..=MAX_GAUSS_ORDER {
            let points = gauss_legendre_1d(order);
            assert_eq!(points.len(), order);

            let max_degree = 2 * order - 1;
            for degree in 0..=max_degree {
                let integral: f64 = points
                    .iter()
                    .map(|p| p.weight * p.xi.powi(degree as i32))
                    .sum();
                let exact = if degree % 2 == 1 {
                    0.0
                } else {
                    2.0 / (degree as f64 + 1.0)
                };
                assert_relative_eq!(integral, exact, epsilon = 1e-13);
            }
        }
    }

    #[test]
    fn test_high_orders_fall_back_to_five_points() {
        assert_eq!(gauss_legendre_1d(9).len(), 5);
    }
}
