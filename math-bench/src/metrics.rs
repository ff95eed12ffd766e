//! Accuracy and aggregation metrics

use crate::error::{BenchError, Result};

/// Relative L2 error `‖pred − truth‖₂ / ‖truth‖₂`
///
/// Both slices must have the same length and `truth` must not be all zeros.
pub fn relative_l2(pred: &[f64], truth: &[f64]) -> Result<f64> {
    if pred.len() != truth.len() {
        return Err(BenchError::LengthMismatch {
            predicted: pred.len(),
            expected: truth.len(),
        });
    }

    let (num, den) = pred
        .iter()
        .zip(truth)
        .fold((0.0, 0.0), |(num, den), (p, t)| {
            (num + (p - t) * (p - t), den + t * t)
        });

    if den == 0.0 {
        return Err(BenchError::ZeroReference);
    }
    Ok((num / den).sqrt())
}

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population variance (divides by `n`), `None` for an empty slice
pub fn population_variance(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    Some(values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_exact_prediction_has_zero_error() {
        let truth = [0.1, -0.4, 2.0];
        assert_eq!(relative_l2(&truth, &truth).unwrap(), 0.0);
    }

    #[test]
    fn test_uniform_shift_scaling() {
        let truth = [0.3, 0.2, -0.5, 1.0];
        let norm = truth.iter().map(|t| t * t).sum::<f64>().sqrt();
        for c in [1e-3, -0.25, 2.0] {
            let shifted: Vec<f64> = truth.iter().map(|t| t + c).collect();
            let expected = c.abs() * (truth.len() as f64).sqrt() / norm;
            assert_relative_eq!(relative_l2(&shifted, &truth).unwrap(), expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_rejects_length_mismatch_and_zero_reference() {
        assert!(matches!(
            relative_l2(&[1.0, 2.0], &[1.0]),
            Err(BenchError::LengthMismatch { predicted: 2, expected: 1 })
        ));
        assert!(matches!(relative_l2(&[1.0], &[0.0]), Err(BenchError::ZeroReference)));
    }

    #[test]
    fn test_mean_and_variance() {
        assert_eq!(mean(&[]), None);
        assert_eq!(population_variance(&[]), None);
        assert_relative_eq!(mean(&[1.0, 2.0, 3.0, 6.0]).unwrap(), 3.0);
        assert_relative_eq!(population_variance(&[1.0, 2.0, 3.0, 6.0]).unwrap(), 3.5);
        assert_eq!(population_variance(&[4.2]), Some(0.0));
    }
}
