//! Latin hypercube sampling of collocation points

use ndarray::Array2;
use rand::Rng;
use rand::seq::SliceRandom;

/// Latin hypercube sample of `n_samples` points in the box `[lower, upper]`
///
/// Each dimension is split into `n_samples` equal strata; one uniform draw is
/// taken inside every stratum and the strata are randomly permuted per
/// dimension. Returns an array of shape `[n_samples, dim]`.
pub fn latin_hypercube<R: Rng + ?Sized>(
    n_samples: usize,
    lower: &[f64],
    upper: &[f64],
    rng: &mut R,
) -> Array2<f64> {
    let dim = lower.len().min(upper.len());
    let mut samples = Array2::<f64>::zeros((n_samples, dim));

    for j in 0..dim {
        let mut vals: Vec<f64> = (0..n_samples)
            .map(|k| (k as f64 + rng.random::<f64>()) / n_samples as f64)
            .collect();
        vals.shuffle(rng);
        for (i, v) in vals.into_iter().enumerate() {
            samples[(i, j)] = lower[j] + v * (upper[j] - lower[j]);
        }
    }

    samples
}

/// One-dimensional Latin hypercube sample in `[lower, upper]`
pub fn latin_hypercube_1d<R: Rng + ?Sized>(
    n_samples: usize,
    lower: f64,
    upper: f64,
    rng: &mut R,
) -> Vec<f64> {
    latin_hypercube(n_samples, &[lower], &[upper], rng)
        .column(0)
        .to_vec()
}
