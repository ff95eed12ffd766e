//! Finite-difference checks of the reverse pass through the jet computation
//!
//! Every parameter gradient returned by `PoissonLoss::value_and_grad` is
//! compared with a central difference of the loss in that parameter.

use math_poisson_pinn::params::assign_flat;
use math_poisson_pinn::{Batch, Jet, Mlp, PoissonLoss, flatten};

fn loss() -> PoissonLoss {
    PoissonLoss::new(
        |x| (6.0 * x - 4.0 * x.powi(3)) * (-x * x).exp(),
        (0.0, 1.0),
        0.0,
        (-1.0f64).exp(),
    )
}

fn batch() -> Batch {
    Batch {
        interior: vec![0.05, 0.3, 0.55, 0.8, 0.97],
        boundary: vec![(0.0, 0.0), (1.0, (-1.0f64).exp())],
    }
}

fn check_architecture(hidden: &[usize], seed: u64) {
    let net = Mlp::new(hidden, seed).unwrap();
    let loss = loss();
    let batch = batch();

    let (_, grads) = loss.value_and_grad(&net, &batch);
    let (analytic, _) = flatten(&grads);
    let (theta, _) = flatten(&net);

    let h = 1e-6;
    let mut perturbed = net.clone();
    for i in 0..theta.len() {
        let mut shifted = theta.clone();
        shifted[i] = theta[i] + h;
        assign_flat(&mut perturbed, &shifted).unwrap();
        let plus = loss.evaluate(&perturbed, &batch).total();
        shifted[i] = theta[i] - h;
        assign_flat(&mut perturbed, &shifted).unwrap();
        let minus = loss.evaluate(&perturbed, &batch).total();

        let numeric = (plus - minus) / (2.0 * h);
        let tol = 1e-5 * (1.0 + numeric.abs().max(analytic[i].abs()));
        assert!(
            (numeric - analytic[i]).abs() < tol,
            "{hidden:?} param {i}: analytic {} vs numeric {numeric}",
            analytic[i]
        );
    }
}

#[test]
fn test_gradient_single_hidden_layer() {
    check_architecture(&[8], 0);
}

#[test]
fn test_gradient_tiny_deep_network() {
    check_architecture(&[1, 1], 1);
}

#[test]
fn test_gradient_two_hidden_layers() {
    check_architecture(&[6, 5], 2);
}

#[test]
fn test_gradient_three_hidden_layers() {
    check_architecture(&[4, 4, 4], 3);
}

#[test]
fn test_backward_of_value_matches_parameter_perturbation() {
    // d u(x) / dθ via the reverse pass with upstream (1, 0, 0)
    let net = Mlp::new(&[5, 5], 9).unwrap();
    let x = 0.4;
    let mut grads = net.zeros_like();
    let out = net.backward_jet(x, |_| Jet::new(1.0, 0.0, 0.0), &mut grads);
    assert_eq!(out.v, net.forward(x));

    let (analytic, _) = flatten(&grads);
    let (theta, _) = flatten(&net);
    let h = 1e-6;
    let mut perturbed = net.clone();
    for i in 0..theta.len() {
        let mut shifted = theta.clone();
        shifted[i] += h;
        assign_flat(&mut perturbed, &shifted).unwrap();
        let plus = perturbed.forward(x);
        shifted[i] -= 2.0 * h;
        assign_flat(&mut perturbed, &shifted).unwrap();
        let minus = perturbed.forward(x);
        let numeric = (plus - minus) / (2.0 * h);
        assert!((numeric - analytic[i]).abs() < 1e-7, "param {i}");
    }
}

#[test]
fn test_backward_of_second_derivative() {
    // d u''(x) / dθ via the reverse pass with upstream (0, 0, 1)
    let net = Mlp::new(&[3, 3], 4).unwrap();
    let x = 0.7;
    let mut grads = net.zeros_like();
    net.backward_jet(x, |_| Jet::new(0.0, 0.0, 1.0), &mut grads);

    let (analytic, _) = flatten(&grads);
    let (theta, _) = flatten(&net);
    let h = 1e-6;
    let mut perturbed = net.clone();
    for i in 0..theta.len() {
        let mut shifted = theta.clone();
        shifted[i] += h;
        assign_flat(&mut perturbed, &shifted).unwrap();
        let plus = perturbed.forward_jet(x).d2;
        shifted[i] -= 2.0 * h;
        assign_flat(&mut perturbed, &shifted).unwrap();
        let minus = perturbed.forward_jet(x).d2;
        let numeric = (plus - minus) / (2.0 * h);
        assert!(
            (numeric - analytic[i]).abs() < 1e-6 * (1.0 + numeric.abs()),
            "param {i}: analytic {} vs numeric {numeric}",
            analytic[i]
        );
    }
}
