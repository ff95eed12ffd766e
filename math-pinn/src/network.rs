//! Fully connected tanh networks with scalar input and output
//!
//! Hidden layers apply `tanh`, the output layer is linear. Besides the plain
//! forward pass the network propagates [`Jet`]s, which gives `u`, `u'` and
//! `u''` with respect to the input in one sweep, and it can push gradients
//! with respect to those three quantities back onto every weight and bias.

use crate::error::{PinnError, Result};
use crate::jet::Jet;
use ndarray::{Array1, Array2};
use rand::{Rng, SeedableRng, rngs::StdRng};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Affine layer `a = W h + b`
#[derive(Debug, Clone, PartialEq)]
pub struct DenseLayer {
    /// Weights, shape `[out, in]`
    pub weights: Array2<f64>,
    /// Bias, shape `[out]`
    pub bias: Array1<f64>,
}

impl DenseLayer {
    /// Layer with all parameters zero
    pub fn zeros(fan_in: usize, fan_out: usize) -> Self {
        Self {
            weights: Array2::zeros((fan_out, fan_in)),
            bias: Array1::zeros(fan_out),
        }
    }

    /// Glorot/Xavier uniform weights in `[-a, a]`, `a = sqrt(6 / (fan_in + fan_out))`,
    /// and zero bias
    pub fn xavier<R: Rng + ?Sized>(fan_in: usize, fan_out: usize, rng: &mut R) -> Self {
        let a = (6.0 / (fan_in + fan_out) as f64).sqrt();
        let weights = Array2::from_shape_fn((fan_out, fan_in), |_| rng.random_range(-a..=a));
        Self {
            weights,
            bias: Array1::zeros(fan_out),
        }
    }

    pub fn fan_in(&self) -> usize {
        self.weights.ncols()
    }

    pub fn fan_out(&self) -> usize {
        self.weights.nrows()
    }

    /// Number of trainable scalars
    pub fn num_params(&self) -> usize {
        self.weights.len() + self.bias.len()
    }

    fn forward(&self, input: &[f64]) -> Vec<f64> {
        self.weights
            .rows()
            .into_iter()
            .zip(self.bias.iter())
            .map(|(row, &b)| b + row.iter().zip(input).map(|(w, h)| w * h).sum::<f64>())
            .collect()
    }

    fn forward_jets(&self, input: &[Jet]) -> Vec<Jet> {
        self.weights
            .rows()
            .into_iter()
            .zip(self.bias.iter())
            .map(|(row, &b)| {
                row.iter()
                    .zip(input)
                    .fold(Jet::constant(b), |acc, (&w, &h)| acc + h * w)
            })
            .collect()
    }

    /// Accumulate parameter gradients and return the gradient with respect to the input jets
    ///
    /// Each jet component is a linear function of the weights, so
    /// `dL/dW_ij = Σ_k g_i[k] h_j[k]` over the three components, while the
    /// bias only enters the value component.
    fn backward_jets(&self, input: &[Jet], grad_pre: &[Jet], grads: &mut DenseLayer) -> Vec<Jet> {
        let mut grad_input = vec![Jet::default(); input.len()];
        for (i, g) in grad_pre.iter().enumerate() {
            grads.bias[i] += g.v;
            for (j, h) in input.iter().enumerate() {
                grads.weights[[i, j]] += g.v * h.v + g.d1 * h.d1 + g.d2 * h.d2;
                grad_input[j] = grad_input[j] + *g * self.weights[[i, j]];
            }
        }
        grad_input
    }
}

/// Pull a jet gradient back through `h = tanh(a)`
///
/// With t = tanh(a.v) and s = 1 - t²:
/// h.v = t, h.d1 = s a.d1, h.d2 = s a.d2 - 2 t s a.d1²
fn tanh_backward(pre: Jet, grad_out: Jet) -> Jet {
    let t = pre.v.tanh();
    let s = 1.0 - t * t;
    let (a1, a2) = (pre.d1, pre.d2);

    let dv = grad_out.v * s
        + grad_out.d1 * (-2.0 * t * s * a1)
        + grad_out.d2 * (-2.0 * t * s * a2 - 2.0 * a1 * a1 * s * (1.0 - 3.0 * t * t));
    let d1 = grad_out.d1 * s + grad_out.d2 * (-4.0 * t * s * a1);
    let d2 = grad_out.d2 * s;

    Jet::new(dv, d1, d2)
}

/// Multi-layer perceptron `1 → w1 → … → wk → 1`
#[derive(Debug, Clone, PartialEq)]
pub struct Mlp {
    layers: Vec<DenseLayer>,
}

impl Mlp {
    /// Network with the given hidden widths, Xavier-initialized from `seed`
    pub fn new(hidden: &[usize], seed: u64) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::with_rng(hidden, &mut rng)
    }

    /// Network with the given hidden widths, Xavier-initialized from `rng`
    pub fn with_rng<R: Rng + ?Sized>(hidden: &[usize], rng: &mut R) -> Result<Self> {
        if let Some(pos) = hidden.iter().position(|&w| w == 0) {
            return Err(PinnError::invalid_architecture(format!(
                "hidden layer {pos} has zero width"
            )));
        }

        let widths: Vec<usize> = std::iter::once(1)
            .chain(hidden.iter().copied())
            .chain(std::iter::once(1))
            .collect();
        let layers = widths
            .windows(2)
            .map(|w| DenseLayer::xavier(w[0], w[1], rng))
            .collect();

        Ok(Self { layers })
    }

    /// Assemble a network from explicit layers, checking that shapes chain
    pub fn from_layers(layers: Vec<DenseLayer>) -> Result<Self> {
        let (Some(first), Some(last)) = (layers.first(), layers.last()) else {
            return Err(PinnError::invalid_architecture("network has no layers"));
        };
        if first.fan_in() != 1 || last.fan_out() != 1 {
            return Err(PinnError::invalid_architecture(format!(
                "expected scalar input and output, got {} → {}",
                first.fan_in(),
                last.fan_out()
            )));
        }
        for (idx, layer) in layers.iter().enumerate() {
            if layer.bias.len() != layer.fan_out() {
                return Err(PinnError::invalid_architecture(format!(
                    "layer {idx}: bias length {} does not match {} outputs",
                    layer.bias.len(),
                    layer.fan_out()
                )));
            }
        }
        if let Some(idx) = layers
            .windows(2)
            .position(|w| w[0].fan_out() != w[1].fan_in())
        {
            return Err(PinnError::invalid_architecture(format!(
                "layer {idx} has {} outputs but layer {} expects {} inputs",
                layers[idx].fan_out(),
                idx + 1,
                layers[idx + 1].fan_in()
            )));
        }
        Ok(Self { layers })
    }

    /// Network of the same shape with every parameter zero
    ///
    /// Used as the accumulator for parameter gradients.
    pub fn zeros_like(&self) -> Self {
        Self {
            layers: self
                .layers
                .iter()
                .map(|l| DenseLayer::zeros(l.fan_in(), l.fan_out()))
                .collect(),
        }
    }

    pub fn layers(&self) -> &[DenseLayer] {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut [DenseLayer] {
        &mut self.layers
    }

    /// Hidden widths, i.e. the architecture without input and output
    pub fn hidden_widths(&self) -> Vec<usize> {
        self.layers[..self.layers.len() - 1]
            .iter()
            .map(DenseLayer::fan_out)
            .collect()
    }

    /// Number of trainable scalars
    pub fn num_params(&self) -> usize {
        self.layers.iter().map(DenseLayer::num_params).sum()
    }

    /// Network output at `x`
    pub fn forward(&self, x: f64) -> f64 {
        let last = self.layers.len() - 1;
        let mut h = vec![x];
        for (idx, layer) in self.layers.iter().enumerate() {
            h = layer.forward(&h);
            if idx < last {
                h.iter_mut().for_each(|v| *v = v.tanh());
            }
        }
        h[0]
    }

    /// Network output and its first two input derivatives at `x`
    pub fn forward_jet(&self, x: f64) -> Jet {
        let last = self.layers.len() - 1;
        let mut h = vec![Jet::variable(x)];
        for (idx, layer) in self.layers.iter().enumerate() {
            h = layer.forward_jets(&h);
            if idx < last {
                h.iter_mut().for_each(|j| *j = j.tanh());
            }
        }
        h[0]
    }

    /// Jet forward pass followed by a reverse pass
    ///
    /// `upstream` maps the output jet to `(dL/du, dL/du', dL/du'')`; the
    /// resulting parameter gradients are added into `grads`, which must have
    /// the shape of `self` (see [`Mlp::zeros_like`]). Returns the output jet.
    pub fn backward_jet<G>(&self, x: f64, upstream: G, grads: &mut Mlp) -> Jet
    where
        G: FnOnce(Jet) -> Jet,
    {
        let last = self.layers.len() - 1;

        // inputs[l] feeds layer l, pre[l] is its affine output
        let mut inputs: Vec<Vec<Jet>> = Vec::with_capacity(self.layers.len());
        let mut pre: Vec<Vec<Jet>> = Vec::with_capacity(self.layers.len());
        let mut h = vec![Jet::variable(x)];
        for (idx, layer) in self.layers.iter().enumerate() {
            let a = layer.forward_jets(&h);
            inputs.push(h);
            h = if idx < last {
                a.iter().map(|j| j.tanh()).collect()
            } else {
                a.clone()
            };
            pre.push(a);
        }
        let output = h[0];

        let mut grad = vec![upstream(output)];
        for idx in (0..self.layers.len()).rev() {
            let grad_pre: Vec<Jet> = if idx < last {
                pre[idx]
                    .iter()
                    .zip(&grad)
                    .map(|(&a, &g)| tanh_backward(a, g))
                    .collect()
            } else {
                grad
            };
            grad = self.layers[idx].backward_jets(&inputs[idx], &grad_pre, &mut grads.layers[idx]);
        }

        output
    }

    /// Network output at every point
    pub fn predict(&self, xs: &[f64]) -> Vec<f64> {
        #[cfg(feature = "parallel")]
        {
            xs.par_iter().map(|&x| self.forward(x)).collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            xs.iter().map(|&x| self.forward(x)).collect()
        }
    }

    /// `self += scale * other` parameter-wise
    pub fn add_scaled(&mut self, scale: f64, other: &Mlp) {
        for (mine, theirs) in self.layers.iter_mut().zip(&other.layers) {
            mine.weights.scaled_add(scale, &theirs.weights);
            mine.bias.scaled_add(scale, &theirs.bias);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_architecture_and_param_count() {
        let net = Mlp::new(&[16, 16], 0).unwrap();
        assert_eq!(net.layers().len(), 3);
        assert_eq!(net.hidden_widths(), vec![16, 16]);
        // (1*16 + 16) + (16*16 + 16) + (16*1 + 1)
        assert_eq!(net.num_params(), 32 + 272 + 17);
    }

    #[test]
    fn test_xavier_bounds_and_zero_bias() {
        let net = Mlp::new(&[32, 32, 32], 7).unwrap();
        for layer in net.layers() {
            let a = (6.0 / (layer.fan_in() + layer.fan_out()) as f64).sqrt();
            assert!(layer.weights.iter().all(|w| w.abs() <= a));
            assert!(layer.bias.iter().all(|&b| b == 0.0));
        }
    }

    #[test]
    fn test_add_scaled() {
        let base = Mlp::new(&[8, 4], 1).unwrap();
        let other = Mlp::new(&[8, 4], 2).unwrap();

        let mut sum = base.clone();
        sum.add_scaled(0.5, &other);
        for ((s, b), o) in sum.layers().iter().zip(base.layers()).zip(other.layers()) {
            for ((s, b), o) in s.weights.iter().zip(&b.weights).zip(&o.weights) {
                assert_relative_eq!(*s, b + 0.5 * o, epsilon = 1e-15);
            }
        }

        let mut zero = base.clone();
        zero.add_scaled(-1.0, &base);
        assert!(zero.layers().iter().all(|l| l.weights.iter().all(|&w| w == 0.0)));
    }

    #[test]
    fn test_seed_is_reproducible() {
        assert_eq!(Mlp::new(&[8], 3).unwrap(), Mlp::new(&[8], 3).unwrap());
        assert_ne!(Mlp::new(&[8], 3).unwrap(), Mlp::new(&[8], 4).unwrap());
    }

    #[test]
    fn test_rejects_zero_width() {
        let err = Mlp::new(&[4, 0], 0).unwrap_err();
        assert!(err.is_shape_error());
    }

    #[test]
    fn test_from_layers_checks_chaining() {
        let ok = Mlp::from_layers(vec![DenseLayer::zeros(1, 3), DenseLayer::zeros(3, 1)]);
        assert!(ok.is_ok());
        let bad = Mlp::from_layers(vec![DenseLayer::zeros(1, 3), DenseLayer::zeros(2, 1)]);
        assert!(bad.is_err());
        assert!(Mlp::from_layers(Vec::new()).is_err());
    }

    #[test]
    fn test_jet_value_matches_forward() {
        let net = Mlp::new(&[8, 8], 11).unwrap();
        for &x in &[0.0, 0.3, 1.0] {
            assert_relative_eq!(net.forward_jet(x).v, net.forward(x), epsilon = 1e-14);
        }
    }

    #[test]
    fn test_jet_derivatives_match_finite_differences() {
        let net = Mlp::new(&[8, 8], 5).unwrap();
        let h = 1e-4;
        for &x in &[0.1, 0.5, 0.9] {
            let jet = net.forward_jet(x);
            let (fm, f0, fp) = (net.forward(x - h), net.forward(x), net.forward(x + h));
            assert_relative_eq!(jet.d1, (fp - fm) / (2.0 * h), epsilon = 1e-6);
            assert_relative_eq!(jet.d2, (fp - 2.0 * f0 + fm) / (h * h), epsilon = 1e-4);
        }
    }

    #[test]
    fn test_predict_matches_forward() {
        let net = Mlp::new(&[4], 1).unwrap();
        let xs = [0.0, 0.25, 0.5];
        let pred = net.predict(&xs);
        for (x, p) in xs.iter().zip(pred) {
            assert_eq!(p, net.forward(*x));
        }
    }

    #[test]
    fn test_linear_network_has_zero_curvature() {
        let net = Mlp::new(&[], 2).unwrap();
        let jet = net.forward_jet(0.3);
        assert_eq!(jet.d2, 0.0);
    }
}
