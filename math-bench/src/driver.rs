//! Benchmark driver
//!
//! Runs every configuration of one method a fixed number of times, scores
//! each repetition against the closed-form solution and folds the trials of a
//! configuration into a [`ConfigurationSummary`]. The running report is handed
//! to a persistence callback after every configuration.

use crate::adapter::{FemAdapter, Phase, PinnAdapter, SolverAdapter, TrialResult};
use crate::config::BenchConfig;
use crate::error::{BenchError, Result};
use crate::metrics::{mean, population_variance, relative_l2};
use crate::points::EvaluationPoints;
use crate::problem;
use crate::report;
use std::time::Instant;

/// Tolerance of the problem self-check run before a sweep
const CONSISTENCY_TOLERANCE: f64 = 1e-4;

/// Aggregate over the successful trials of one configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationSummary {
    /// Mean duration in seconds of every phase, in execution order
    pub mean_times: Vec<(Phase, f64)>,
    /// Mean relative L2 error
    pub l2_rel: f64,
    /// Population variance of the relative L2 error
    pub l2_rel_var: f64,
    /// Prediction of the last successful trial
    pub u_pred: Vec<f64>,
    /// Wall-clock seconds of each successful trial, all phases included
    pub trial_times: Vec<f64>,
}

impl ConfigurationSummary {
    /// Fold scored trials; `None` if there are none
    pub fn from_trials(trials: Vec<TrialResult>, errors: &[f64]) -> Option<Self> {
        debug_assert_eq!(trials.len(), errors.len());
        let l2_rel = mean(errors)?;
        let l2_rel_var = population_variance(errors)?;

        let mean_times = trials
            .first()?
            .timings
            .iter()
            .map(|&(phase, _)| {
                let secs: Vec<f64> = trials.iter().map(|t| t.time(phase).as_secs_f64()).collect();
                (phase, mean(&secs).unwrap_or(0.0))
            })
            .collect();
        let trial_times = trials.iter().map(|t| t.total().as_secs_f64()).collect();
        let u_pred = trials.into_iter().last()?.prediction;

        Some(Self {
            mean_times,
            l2_rel,
            l2_rel_var,
            u_pred,
            trial_times,
        })
    }

    /// Number of trials aggregated
    pub fn trials(&self) -> usize {
        self.trial_times.len()
    }

    /// Mean seconds spent in `phase`, zero if the method has no such phase
    pub fn mean_time(&self, phase: Phase) -> f64 {
        self.mean_times
            .iter()
            .find(|(p, _)| *p == phase)
            .map_or(0.0, |(_, t)| *t)
    }
}

/// Summaries of one sweep, in configuration order
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkReport<C> {
    /// Evaluation points shared by every configuration
    pub points: Vec<f64>,
    /// Exact solution at `points`
    pub ground_truth: Vec<f64>,
    /// `(configuration, summary)` pairs
    pub entries: Vec<(C, ConfigurationSummary)>,
}

impl<C> BenchmarkReport<C> {
    pub fn new(points: Vec<f64>, ground_truth: Vec<f64>) -> Self {
        Self {
            points,
            ground_truth,
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A configuration none of whose trials succeeded
#[derive(Debug, Clone, PartialEq)]
pub struct FailedConfiguration<C> {
    pub config: C,
    /// Message of the last trial error
    pub last_error: String,
}

/// Result of a complete sweep
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkOutcome<C> {
    pub report: BenchmarkReport<C>,
    pub failed: Vec<FailedConfiguration<C>>,
}

/// Sequential repeat-and-aggregate loop over configurations
#[derive(Debug, Clone)]
pub struct BenchmarkDriver {
    points: EvaluationPoints,
    ground_truth: Vec<f64>,
    trials: usize,
}

impl BenchmarkDriver {
    pub fn new(points: EvaluationPoints, trials: usize) -> Result<Self> {
        if trials == 0 {
            return Err(BenchError::config("trials must be >= 1"));
        }
        let ground_truth = problem::ground_truth(points.as_slice());
        if ground_truth.iter().all(|&u| u == 0.0) {
            return Err(BenchError::points(
                "exact solution vanishes at every evaluation point; relative error is undefined",
            ));
        }
        Ok(Self {
            points,
            ground_truth,
            trials,
        })
    }

    pub fn points(&self) -> &EvaluationPoints {
        &self.points
    }

    pub fn ground_truth(&self) -> &[f64] {
        &self.ground_truth
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    /// Run every configuration in order
    ///
    /// Divergent trials are logged and left out of the aggregate; any other
    /// error aborts the sweep. `persist` receives the report after each
    /// configuration and its errors are fatal.
    pub fn run<A, P>(
        &self,
        adapter: &mut A,
        configs: &[A::Config],
        mut persist: P,
    ) -> Result<BenchmarkOutcome<A::Config>>
    where
        A: SolverAdapter,
        P: FnMut(&BenchmarkReport<A::Config>) -> Result<()>,
    {
        let mut report = BenchmarkReport::new(self.points.as_slice().to_vec(), self.ground_truth.clone());
        let mut failed = Vec::new();
        let sweep_start = Instant::now();

        for config in configs {
            let mut trials = Vec::with_capacity(self.trials);
            let mut errors = Vec::with_capacity(self.trials);
            let mut last_error = None;

            for trial in 0..self.trials {
                match adapter.run_trial(config, trial, self.points.as_slice()) {
                    Ok(result) => {
                        errors.push(relative_l2(&result.prediction, &self.ground_truth)?);
                        trials.push(result);
                    }
                    Err(e) if e.is_divergence() => {
                        log::warn!("{} {config:?} trial {trial} failed: {e}", adapter.name());
                        last_error = Some(e.to_string());
                    }
                    Err(e) => return Err(e),
                }
            }

            match ConfigurationSummary::from_trials(trials, &errors) {
                Some(summary) => {
                    log::info!(
                        "{} {config:?}: l2_rel {:.3e} (var {:.2e}), {}/{} trials, {}",
                        adapter.name(),
                        summary.l2_rel,
                        summary.l2_rel_var,
                        summary.trials(),
                        self.trials,
                        summary
                            .mean_times
                            .iter()
                            .map(|(p, t)| format!("{p} {t:.4}s"))
                            .collect::<Vec<_>>()
                            .join(", ")
                    );
                    report.entries.push((config.clone(), summary));
                }
                None => {
                    log::warn!("{} {config:?}: every trial failed", adapter.name());
                    failed.push(FailedConfiguration {
                        config: config.clone(),
                        last_error: last_error.unwrap_or_default(),
                    });
                }
            }

            persist(&report)?;
        }

        log::info!(
            "{} sweep finished: {} configurations, {} failed, {:.2}s",
            adapter.name(),
            report.len(),
            failed.len(),
            sweep_start.elapsed().as_secs_f64()
        );

        Ok(BenchmarkOutcome { report, failed })
    }
}

fn prepare(config: &BenchConfig) -> Result<BenchmarkDriver> {
    config.validate()?;
    problem::verify_consistency(CONSISTENCY_TOLERANCE)?;
    let points = EvaluationPoints::load(&config.points_path)?;
    BenchmarkDriver::new(points, config.trials)
}

/// Finite element sweep over `config.fem.mesh_sizes`, persisted to `FEM_results.json`
pub fn run_fem_benchmark(config: &BenchConfig) -> Result<BenchmarkOutcome<usize>> {
    let driver = prepare(config)?;
    let mut adapter = FemAdapter::new(&config.fem);
    driver.run(&mut adapter, &config.fem.mesh_sizes, |partial| {
        report::write_fem_results(&config.output_dir, partial).map(|_| ())
    })
}

/// PINN sweep over `config.pinn.architectures`, persisted to the two PINN files
pub fn run_pinn_benchmark(config: &BenchConfig) -> Result<BenchmarkOutcome<Vec<usize>>> {
    let driver = prepare(config)?;
    let mut adapter = PinnAdapter::new(&config.pinn);
    driver.run(&mut adapter, &config.pinn.architectures, |partial| {
        report::write_pinn_results(&config.output_dir, partial).map(|_| ())
    })
}
