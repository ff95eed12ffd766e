//! Two-phase PINN training: Adam on resampled batches, then L-BFGS on a fixed batch

use crate::error::{PinnError, Result, TrainingPhase};
use crate::loss::{Batch, PoissonLoss};
use crate::network::Mlp;
use crate::optim::{Adam, ConvergenceStatus, Lbfgs};
use crate::params::{assign_flat, flatten, flatten_into};
use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Training hyper-parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Number of Adam steps
    pub adam_steps: usize,
    /// Adam learning rate
    pub learning_rate: f64,
    /// L-BFGS iteration budget
    pub lbfgs_max_iterations: usize,
    /// Correction pairs kept by L-BFGS
    pub lbfgs_history: usize,
    /// Relative function decrease tolerance of L-BFGS
    pub lbfgs_ftol: f64,
    /// Max-abs gradient tolerance of L-BFGS
    pub lbfgs_gtol: f64,
    /// Interior collocation points per batch
    pub n_interior: usize,
    /// Record and log the loss every N Adam steps (0 disables)
    pub log_every: usize,
    /// Seed of the batch sampler
    pub seed: u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            adam_steps: 15_000,
            learning_rate: 1e-4,
            lbfgs_max_iterations: 50_000,
            lbfgs_history: 50,
            lbfgs_ftol: f64::EPSILON,
            lbfgs_gtol: 1e-12,
            n_interior: 256,
            log_every: 1_000,
            seed: 0,
        }
    }
}

/// Loss values recorded during training
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LossHistory {
    /// `(step, loss)` every `log_every` Adam steps, plus the last step
    pub adam: Vec<(usize, f64)>,
    /// Final L-BFGS loss and iteration count
    pub lbfgs: Option<(usize, f64)>,
}

/// Summary of the Adam phase
#[derive(Debug, Clone)]
pub struct AdamReport {
    pub steps: usize,
    pub final_loss: f64,
    pub elapsed: Duration,
}

/// Summary of the L-BFGS phase
#[derive(Debug, Clone)]
pub struct LbfgsReport {
    pub iterations: usize,
    pub evaluations: usize,
    pub final_loss: f64,
    pub status: ConvergenceStatus,
    pub elapsed: Duration,
}

/// Drives both training phases for one network
#[derive(Debug)]
pub struct PinnTrainer {
    config: TrainConfig,
    loss: PoissonLoss,
    rng: StdRng,
    history: LossHistory,
}

impl PinnTrainer {
    pub fn new(config: TrainConfig, loss: PoissonLoss) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            loss,
            rng,
            history: LossHistory::default(),
        }
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    pub fn history(&self) -> &LossHistory {
        &self.history
    }

    /// Adam phase: one freshly sampled batch per step, all parameters updated jointly
    pub fn train_adam(&mut self, net: &mut Mlp) -> Result<AdamReport> {
        let start = Instant::now();
        let mut adam = Adam::new(self.config.learning_rate);
        let (mut theta, _) = flatten(net);
        let mut grad_flat = Vec::with_capacity(theta.len());
        let mut last_loss = f64::NAN;

        for step in 0..self.config.adam_steps {
            let batch = self.loss.sample_batch(self.config.n_interior, &mut self.rng);
            let (parts, grads) = self.loss.value_and_grad(net, &batch);
            let loss = parts.total();

            if !loss.is_finite() {
                return Err(PinnError::NonFiniteLoss {
                    phase: TrainingPhase::Adam,
                    step,
                });
            }
            last_loss = loss;

            if self.config.log_every > 0 && step % self.config.log_every == 0 {
                log::info!(
                    "adam step {step}: loss {loss:.6e} (pde {:.3e}, boundary {:.3e})",
                    parts.pde,
                    parts.boundary
                );
                self.history.adam.push((step, loss));
            }

            flatten_into(&grads, &mut grad_flat);
            adam.step(&mut theta, &grad_flat);
            assign_flat(net, &theta)?;
        }

        if self.config.adam_steps > 0 {
            let last = self.config.adam_steps - 1;
            if self.history.adam.last().is_none_or(|&(s, _)| s != last) {
                self.history.adam.push((last, last_loss));
            }
        }

        Ok(AdamReport {
            steps: self.config.adam_steps,
            final_loss: last_loss,
            elapsed: start.elapsed(),
        })
    }

    /// L-BFGS phase on one batch drawn at the start, so the objective is deterministic
    pub fn refine_lbfgs(&mut self, net: &mut Mlp) -> Result<LbfgsReport> {
        let start = Instant::now();
        let batch: Batch = self.loss.sample_batch(self.config.n_interior, &mut self.rng);
        let (theta0, _) = flatten(net);

        let mut work = net.clone();
        let loss = &self.loss;
        let objective = |theta: &[f64]| -> (f64, Vec<f64>) {
            if assign_flat(&mut work, theta).is_err() {
                return (f64::NAN, vec![f64::NAN; theta.len()]);
            }
            let (parts, grads) = loss.value_and_grad(&work, &batch);
            let mut flat = Vec::new();
            flatten_into(&grads, &mut flat);
            (parts.total(), flat)
        };

        let mut lbfgs = Lbfgs::new(
            self.config.lbfgs_max_iterations,
            self.config.lbfgs_ftol,
            self.config.lbfgs_gtol,
            self.config.lbfgs_history,
        );
        let result = lbfgs.minimize(objective, theta0);

        if result.status == ConvergenceStatus::NumericalError || !result.value.is_finite() {
            return Err(PinnError::NonFiniteLoss {
                phase: TrainingPhase::Lbfgs,
                step: result.iterations,
            });
        }

        assign_flat(net, &result.x)?;
        self.history.lbfgs = Some((result.iterations, result.value));

        log::info!(
            "lbfgs: {:?} after {} iterations ({} evaluations), loss {:.6e}",
            result.status,
            result.iterations,
            result.evaluations,
            result.value
        );

        Ok(LbfgsReport {
            iterations: result.iterations,
            evaluations: result.evaluations,
            final_loss: result.value,
            status: result.status,
            elapsed: start.elapsed(),
        })
    }
}
