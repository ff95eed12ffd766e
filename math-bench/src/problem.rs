//! The manufactured Poisson problem
//!
//! `-u'' = f` on [0, 1] with exact solution `u(x) = x exp(-x²)`, so
//! `f(x) = (6x - 4x³) exp(-x²)`, `u(0) = 0` and `u(1) = exp(-1)`.

use crate::error::{BenchError, Result};

/// Step of the central second difference used by [`verify_consistency`]
const CONSISTENCY_STEP: f64 = 1e-3;

/// Interior samples checked by [`verify_consistency`]
const CONSISTENCY_SAMPLES: usize = 100;

/// Closed-form solution
pub fn exact_solution(x: f64) -> f64 {
    x * (-x * x).exp()
}

/// Right-hand side `f = -u''`
pub fn source_term(x: f64) -> f64 {
    (6.0 * x - 4.0 * x.powi(3)) * (-x * x).exp()
}

/// Dirichlet value at the left end point
pub fn left_value() -> f64 {
    0.0
}

/// Dirichlet value at the right end point
pub fn right_value() -> f64 {
    (-1.0f64).exp()
}

/// The interval the problem is posed on
pub fn domain() -> (f64, f64) {
    (0.0, 1.0)
}

/// Check that the problem data fit together
///
/// `-u'' = f` is tested with a central second difference on an interior grid,
/// relative to `max(1, |f|)`; both boundary values must match `u` at the end
/// points. The first violation is returned.
pub fn verify_consistency(tol: f64) -> Result<()> {
    let (a, b) = domain();
    let h = CONSISTENCY_STEP;

    for i in 1..CONSISTENCY_SAMPLES {
        let x = a + (b - a) * i as f64 / CONSISTENCY_SAMPLES as f64;
        let d2 = (exact_solution(x + h) - 2.0 * exact_solution(x) + exact_solution(x - h)) / (h * h);
        let f = source_term(x);
        let residual = (-d2 - f).abs() / f.abs().max(1.0);
        if residual > tol {
            return Err(BenchError::Inconsistent {
                check: "-u'' = f",
                x,
                residual,
            });
        }
    }

    for (check, x, value) in [("u(a) = left", a, left_value()), ("u(b) = right", b, right_value())] {
        let residual = (exact_solution(x) - value).abs();
        if residual > tol {
            return Err(BenchError::Inconsistent { check, x, residual });
        }
    }

    log::debug!("problem data consistent to {tol:.1e}");
    Ok(())
}

/// Exact solution at every point, in order
pub fn ground_truth(points: &[f64]) -> Vec<f64> {
    points.iter().map(|&x| exact_solution(x)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pinn::Jet;

    #[test]
    fn test_boundary_values() {
        assert_eq!(exact_solution(0.0), left_value());
        assert_relative_eq!(exact_solution(1.0), right_value(), epsilon = 1e-15);
        assert_eq!(domain(), (0.0, 1.0));
    }

    #[test]
    fn test_consistency_passes() {
        verify_consistency(1e-4).unwrap();
    }

    #[test]
    fn test_source_matches_exact_second_derivative() {
        for i in 0..=20 {
            let x = i as f64 / 20.0;
            let xj = Jet::variable(x);
            let u = xj * (-(xj * xj)).exp();
            assert_relative_eq!(u.v, exact_solution(x), epsilon = 1e-14);
            assert_relative_eq!(-u.d2, source_term(x), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_impossible_tolerance_reports_first_violation() {
        let err = verify_consistency(0.0).unwrap_err();
        match err {
            BenchError::Inconsistent { check, x, .. } => {
                assert_eq!(check, "-u'' = f");
                assert_relative_eq!(x, 0.01, epsilon = 1e-15);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_ground_truth_preserves_order() {
        let truth = ground_truth(&[1.0, 0.0, 0.5]);
        assert_eq!(truth.len(), 3);
        assert_relative_eq!(truth[0], right_value());
        assert_eq!(truth[1], 0.0);
        assert_relative_eq!(truth[2], 0.5 * (-0.25f64).exp());
    }
}
