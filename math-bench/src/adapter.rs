//! Solver adapters
//!
//! An adapter turns one configuration (an element count, a list of hidden
//! widths) into a timed prediction on the evaluation points. The driver only
//! sees the [`SolverAdapter`] trait.

use crate::config::{FemBenchConfig, PinnBenchConfig};
use crate::error::Result;
use crate::problem;
use fem::FemError;
use fem::FemFunction;
use fem::assembly::{DEFAULT_LOAD_ORDER, PoissonProblem};
use fem::boundary::{DirichletBC, apply_dirichlet};
use fem::mesh::{LEFT_BOUNDARY, RIGHT_BOUNDARY, interval_mesh};
use fem::solver::{SolverConfig, solve};
use pinn::{LossHistory, Mlp, PinnTrainer, PoissonLoss};
use std::fmt;
use std::time::{Duration, Instant};

/// A timed phase of one trial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// FEM mesh, assembly, boundary conditions and linear solve
    Solve,
    /// PINN first-order training
    Adam,
    /// PINN quasi-Newton refinement
    Lbfgs,
    /// Prediction at the evaluation points
    Eval,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Solve => write!(f, "solve"),
            Phase::Adam => write!(f, "adam"),
            Phase::Lbfgs => write!(f, "lbfgs"),
            Phase::Eval => write!(f, "eval"),
        }
    }
}

/// Raw record of a single repetition
#[derive(Debug, Clone)]
pub struct TrialResult {
    /// Wall-clock duration of each phase, in execution order
    pub timings: Vec<(Phase, Duration)>,
    /// Predicted values at the evaluation points
    pub prediction: Vec<f64>,
    /// Training losses (PINN only)
    pub loss_history: Option<LossHistory>,
}

impl TrialResult {
    /// Duration of `phase`, zero if the trial did not run it
    pub fn time(&self, phase: Phase) -> Duration {
        self.timings
            .iter()
            .filter(|(p, _)| *p == phase)
            .map(|(_, d)| *d)
            .sum()
    }

    /// Sum over all phases
    pub fn total(&self) -> Duration {
        self.timings.iter().map(|(_, d)| *d).sum()
    }
}

/// One method under benchmark
pub trait SolverAdapter {
    /// Identifies a configuration of this method
    type Config: Clone + fmt::Debug;

    /// Short method name used in logs
    fn name(&self) -> &'static str;

    /// Solve (or train) for `config` and predict at `points`
    ///
    /// `trial` is the zero-based repetition index; adapters derive any
    /// per-trial randomness from it.
    fn run_trial(&mut self, config: &Self::Config, trial: usize, points: &[f64])
    -> Result<TrialResult>;
}

/// P1 finite elements with an ILU(0)-preconditioned CG solve
#[derive(Debug, Clone)]
pub struct FemAdapter {
    solver: SolverConfig,
}

impl FemAdapter {
    pub fn new(config: &FemBenchConfig) -> Self {
        Self {
            solver: config.solver_config(),
        }
    }

    /// Build and solve the discrete problem on `n` equal elements
    pub fn solve(&self, n: usize) -> Result<FemFunction> {
        let (a, b) = problem::domain();
        let mesh = interval_mesh(a, b, n)?;
        let mut system = PoissonProblem::assemble(&mesh, DEFAULT_LOAD_ORDER, problem::source_term);
        apply_dirichlet(
            &mut system,
            &mesh,
            &[
                DirichletBC::constant(LEFT_BOUNDARY, problem::left_value()),
                DirichletBC::constant(RIGHT_BOUNDARY, problem::right_value()),
            ],
        );
        let solution = solve(&system, &self.solver).map_err(FemError::from)?;
        log::debug!(
            "fem n={n}: {} cg iterations, residual {:.2e}",
            solution.iterations,
            solution.residual
        );
        Ok(FemFunction::new(mesh, solution.values)?)
    }
}

impl SolverAdapter for FemAdapter {
    type Config = usize;

    fn name(&self) -> &'static str {
        "fem"
    }

    fn run_trial(&mut self, n: &usize, _trial: usize, points: &[f64]) -> Result<TrialResult> {
        let start = Instant::now();
        let u = self.solve(*n)?;
        let solve_time = start.elapsed();

        let start = Instant::now();
        let prediction = u.evaluate_many(points)?;
        let eval_time = start.elapsed();

        Ok(TrialResult {
            timings: vec![(Phase::Solve, solve_time), (Phase::Eval, eval_time)],
            prediction,
            loss_history: None,
        })
    }
}

/// Tanh MLP trained with Adam followed by L-BFGS
#[derive(Debug, Clone)]
pub struct PinnAdapter {
    config: PinnBenchConfig,
}

impl PinnAdapter {
    pub fn new(config: &PinnBenchConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    fn loss() -> PoissonLoss {
        PoissonLoss::new(
            problem::source_term,
            problem::domain(),
            problem::left_value(),
            problem::right_value(),
        )
    }
}

impl SolverAdapter for PinnAdapter {
    type Config = Vec<usize>;

    fn name(&self) -> &'static str {
        "pinn"
    }

    fn run_trial(&mut self, arch: &Vec<usize>, trial: usize, points: &[f64]) -> Result<TrialResult> {
        let seed = self.config.trial_seed(trial);
        let mut net = Mlp::new(arch, seed)?;
        let mut trainer = PinnTrainer::new(self.config.train_config(trial), Self::loss());

        let adam = trainer.train_adam(&mut net)?;
        let lbfgs = trainer.refine_lbfgs(&mut net)?;
        log::debug!(
            "pinn {arch:?} trial {trial}: adam loss {:.3e}, lbfgs loss {:.3e} ({:?})",
            adam.final_loss,
            lbfgs.final_loss,
            lbfgs.status
        );

        let start = Instant::now();
        let prediction = net.predict(points);
        let eval_time = start.elapsed();

        Ok(TrialResult {
            timings: vec![
                (Phase::Adam, adam.elapsed),
                (Phase::Lbfgs, lbfgs.elapsed),
                (Phase::Eval, eval_time),
            ],
            prediction,
            loss_history: Some(trainer.history().clone()),
        })
    }
}
