//! Flat parameter vectors
//!
//! Optimizers work on a single `Vec<f64>`. [`flatten`] walks the network in
//! tree order (per layer: weight `[out, in]` row-major, then bias `[out]`)
//! and records every tensor shape in a [`ParamSpec`]; [`unflatten`] rebuilds
//! the identical network from a vector of the matching length.

use crate::error::{PinnError, Result};
use crate::network::{DenseLayer, Mlp};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Shapes of every layer, enough to rebuild the network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    /// `(fan_out, fan_in)` of each layer in order
    pub layers: Vec<(usize, usize)>,
}

impl ParamSpec {
    pub fn of(net: &Mlp) -> Self {
        Self {
            layers: net
                .layers()
                .iter()
                .map(|l| (l.fan_out(), l.fan_in()))
                .collect(),
        }
    }

    /// Total number of scalars described
    pub fn num_params(&self) -> usize {
        self.layers.iter().map(|&(o, i)| o * i + o).sum()
    }

    /// Shape of every tensor in tree order
    pub fn tensor_shapes(&self) -> Vec<Vec<usize>> {
        self.layers
            .iter()
            .flat_map(|&(o, i)| [vec![o, i], vec![o]])
            .collect()
    }
}

/// Copy every parameter into `out` in tree order
pub fn flatten_into(net: &Mlp, out: &mut Vec<f64>) {
    out.clear();
    out.reserve(net.num_params());
    for layer in net.layers() {
        out.extend(layer.weights.iter().copied());
        out.extend(layer.bias.iter().copied());
    }
}

/// Flat parameter vector and its layout
pub fn flatten(net: &Mlp) -> (Vec<f64>, ParamSpec) {
    let mut flat = Vec::new();
    flatten_into(net, &mut flat);
    (flat, ParamSpec::of(net))
}

/// Overwrite the parameters of `net` from a flat vector in tree order
pub fn assign_flat(net: &mut Mlp, flat: &[f64]) -> Result<()> {
    let expected = net.num_params();
    if flat.len() != expected {
        return Err(PinnError::ParamLengthMismatch {
            expected,
            got: flat.len(),
        });
    }

    let mut offset = 0;
    for layer in net.layers_mut() {
        let nw = layer.weights.len();
        layer
            .weights
            .iter_mut()
            .zip(&flat[offset..offset + nw])
            .for_each(|(w, &v)| *w = v);
        offset += nw;

        let nb = layer.bias.len();
        layer
            .bias
            .iter_mut()
            .zip(&flat[offset..offset + nb])
            .for_each(|(b, &v)| *b = v);
        offset += nb;
    }
    Ok(())
}

/// Rebuild a network from a flat vector and its layout
pub fn unflatten(flat: &[f64], spec: &ParamSpec) -> Result<Mlp> {
    let expected = spec.num_params();
    if flat.len() != expected {
        return Err(PinnError::ParamLengthMismatch {
            expected,
            got: flat.len(),
        });
    }

    let mut offset = 0;
    let mut layers = Vec::with_capacity(spec.layers.len());
    for &(fan_out, fan_in) in &spec.layers {
        let nw = fan_out * fan_in;
        let weights = Array2::from_shape_vec((fan_out, fan_in), flat[offset..offset + nw].to_vec())
            .map_err(|e| PinnError::invalid_architecture(e.to_string()))?;
        offset += nw;
        let bias = Array1::from(flat[offset..offset + fan_out].to_vec());
        offset += fan_out;
        layers.push(DenseLayer { weights, bias });
    }

    Mlp::from_layers(layers)
}
