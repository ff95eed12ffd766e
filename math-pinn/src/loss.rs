//! Physics-informed loss for `-u'' = f` with Dirichlet end points
//!
//! `L = mean_i (-u''(x_i) - f(x_i))² + mean_b (u(x_b) - g_b)²`

use crate::jet::Jet;
use crate::network::Mlp;
use crate::sampling::latin_hypercube_1d;
use rand::Rng;
use std::sync::Arc;

/// Source term `f`
pub type SourceFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// Collocation points of one loss evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// Interior points where the PDE residual is penalized
    pub interior: Vec<f64>,
    /// Boundary points with their prescribed values `(x, g)`
    pub boundary: Vec<(f64, f64)>,
}

/// Loss value split into its two terms
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LossParts {
    pub pde: f64,
    pub boundary: f64,
}

impl LossParts {
    pub fn total(&self) -> f64 {
        self.pde + self.boundary
    }
}

/// PDE and boundary data of the 1-D Poisson problem
#[derive(Clone)]
pub struct PoissonLoss {
    source: SourceFn,
    domain: (f64, f64),
    left: f64,
    right: f64,
}

impl std::fmt::Debug for PoissonLoss {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoissonLoss")
            .field("domain", &self.domain)
            .field("left", &self.left)
            .field("right", &self.right)
            .finish()
    }
}

impl PoissonLoss {
    pub fn new<F>(source: F, domain: (f64, f64), left: f64, right: f64) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Self {
            source: Arc::new(source),
            domain,
            left,
            right,
        }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Fresh batch: `n_interior` Latin hypercube points plus both end points
    pub fn sample_batch<R: Rng + ?Sized>(&self, n_interior: usize, rng: &mut R) -> Batch {
        let (lower, upper) = self.domain;
        Batch {
            interior: latin_hypercube_1d(n_interior, lower, upper, rng),
            boundary: vec![(lower, self.left), (upper, self.right)],
        }
    }

    /// PDE residual `-u'' - f` at `x` given the network jet there
    #[inline]
    fn residual(&self, x: f64, u: Jet) -> f64 {
        -u.d2 - (self.source)(x)
    }

    /// Loss terms without gradients
    pub fn evaluate(&self, net: &Mlp, batch: &Batch) -> LossParts {
        let pde = mean(batch.interior.iter().map(|&x| {
            let r = self.residual(x, net.forward_jet(x));
            r * r
        }));
        let boundary = mean(batch.boundary.iter().map(|&(x, g)| {
            let r = net.forward(x) - g;
            r * r
        }));
        LossParts { pde, boundary }
    }

    /// Loss terms and the gradient of the total loss with respect to every parameter
    ///
    /// The gradient has the shape of `net`.
    pub fn value_and_grad(&self, net: &Mlp, batch: &Batch) -> (LossParts, Mlp) {
        let mut grads = net.zeros_like();

        let n_int = batch.interior.len().max(1) as f64;
        let mut pde = 0.0;
        for &x in &batch.interior {
            let mut r = 0.0;
            net.backward_jet(
                x,
                |u| {
                    r = self.residual(x, u);
                    Jet::new(0.0, 0.0, -2.0 * r / n_int)
                },
                &mut grads,
            );
            pde += r * r;
        }

        let n_bnd = batch.boundary.len().max(1) as f64;
        let mut boundary = 0.0;
        for &(x, g) in &batch.boundary {
            let mut r = 0.0;
            net.backward_jet(
                x,
                |u| {
                    r = u.v - g;
                    Jet::new(2.0 * r / n_bnd, 0.0, 0.0)
                },
                &mut grads,
            );
            boundary += r * r;
        }

        let parts = LossParts {
            pde: if batch.interior.is_empty() { 0.0 } else { pde / n_int },
            boundary: if batch.boundary.is_empty() {
                0.0
            } else {
                boundary / n_bnd
            },
        };
        (parts, grads)
    }
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    values.sum::<f64>() / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{SeedableRng, rngs::StdRng};

    fn loss() -> PoissonLoss {
        PoissonLoss::new(|x| 6.0 * x, (0.0, 1.0), 0.0, 1.0)
    }

    #[test]
    fn test_batch_layout() {
        let mut rng = StdRng::seed_from_u64(0);
        let batch = loss().sample_batch(256, &mut rng);
        assert_eq!(batch.interior.len(), 256);
        assert_eq!(batch.boundary, vec![(0.0, 0.0), (1.0, 1.0)]);
    }

    #[test]
    fn test_value_and_grad_agrees_with_evaluate() {
        let net = Mlp::new(&[6, 6], 3).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let batch = loss().sample_batch(32, &mut rng);

        let plain = loss().evaluate(&net, &batch);
        let (parts, grads) = loss().value_and_grad(&net, &batch);
        assert_relative_eq!(parts.pde, plain.pde, epsilon = 1e-12);
        assert_relative_eq!(parts.boundary, plain.boundary, epsilon = 1e-12);
        assert_eq!(grads.num_params(), net.num_params());
    }

    #[test]
    fn test_exact_representation_has_zero_boundary_loss() {
        // Zero network, zero boundary data
        let net = Mlp::new(&[2], 0).unwrap().zeros_like();
        let loss = PoissonLoss::new(|_| 0.0, (0.0, 1.0), 0.0, 0.0);
        let batch = Batch {
            interior: vec![0.5],
            boundary: vec![(0.0, 0.0), (1.0, 0.0)],
        };
        let (parts, grads) = loss.value_and_grad(&net, &batch);
        assert_eq!(parts.total(), 0.0);
        assert!(grads.layers().iter().all(|l| l.weights.iter().all(|&w| w == 0.0)));
    }
}
