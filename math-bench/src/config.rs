//! Benchmark configuration
//!
//! Every field has a default that reproduces the reference experiment, so an
//! empty JSON object is a complete configuration.

use crate::error::{BenchError, Result};
use fem::solver::SolverConfig;
use pinn::TrainConfig;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Top-level run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// JSON file with the evaluation points
    pub points_path: PathBuf,
    /// Directory receiving the result files
    pub output_dir: PathBuf,
    /// Repetitions per configuration
    pub trials: usize,
    pub fem: FemBenchConfig,
    pub pinn: PinnBenchConfig,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            points_path: PathBuf::from("eval_points.json"),
            output_dir: PathBuf::from("results"),
            trials: 10,
            fem: FemBenchConfig::default(),
            pinn: PinnBenchConfig::default(),
        }
    }
}

/// Finite element sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FemBenchConfig {
    /// Element counts, run in order
    pub mesh_sizes: Vec<usize>,
    /// Relative residual tolerance of the CG solve
    pub cg_tolerance: f64,
    /// CG iteration cap
    pub cg_max_iterations: usize,
}

impl Default for FemBenchConfig {
    fn default() -> Self {
        Self {
            mesh_sizes: vec![64, 128, 256, 512, 1024, 2048, 4096],
            cg_tolerance: 1e-10,
            cg_max_iterations: 20_000,
        }
    }
}

impl FemBenchConfig {
    /// ILU(0)-preconditioned CG with this sweep's limits
    pub fn solver_config(&self) -> SolverConfig {
        let mut config = SolverConfig::default();
        config.cg.tolerance = self.cg_tolerance;
        config.cg.max_iterations = self.cg_max_iterations;
        config
    }
}

/// PINN sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinnBenchConfig {
    /// Hidden-layer widths per configuration; the scalar output layer is implied
    pub architectures: Vec<Vec<usize>>,
    pub adam_steps: usize,
    pub learning_rate: f64,
    pub lbfgs_max_iterations: usize,
    pub lbfgs_history: usize,
    pub lbfgs_ftol: f64,
    pub lbfgs_gtol: f64,
    /// Interior collocation points per batch
    pub n_interior: usize,
    /// Base seed; trial `k` uses `seed + k`
    pub seed: u64,
    /// Adam steps between loss log lines
    pub log_every: usize,
}

impl Default for PinnBenchConfig {
    fn default() -> Self {
        let train = TrainConfig::default();
        Self {
            architectures: vec![vec![1, 1], vec![8], vec![16, 16], vec![32, 32, 32]],
            adam_steps: train.adam_steps,
            learning_rate: train.learning_rate,
            lbfgs_max_iterations: train.lbfgs_max_iterations,
            lbfgs_history: train.lbfgs_history,
            lbfgs_ftol: train.lbfgs_ftol,
            lbfgs_gtol: train.lbfgs_gtol,
            n_interior: train.n_interior,
            seed: train.seed,
            log_every: train.log_every,
        }
    }
}

impl PinnBenchConfig {
    /// Seed used by trial `trial`
    pub fn trial_seed(&self, trial: usize) -> u64 {
        self.seed.wrapping_add(trial as u64)
    }

    /// Trainer settings for one trial
    pub fn train_config(&self, trial: usize) -> TrainConfig {
        TrainConfig {
            adam_steps: self.adam_steps,
            learning_rate: self.learning_rate,
            lbfgs_max_iterations: self.lbfgs_max_iterations,
            lbfgs_history: self.lbfgs_history,
            lbfgs_ftol: self.lbfgs_ftol,
            lbfgs_gtol: self.lbfgs_gtol,
            n_interior: self.n_interior,
            log_every: self.log_every,
            seed: self.trial_seed(trial),
        }
    }
}

impl BenchConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| BenchError::io(path, e))?;
        let config: Self =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| BenchError::json(path, e))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no run can succeed with
    pub fn validate(&self) -> Result<()> {
        if self.trials == 0 {
            return Err(BenchError::config("trials must be >= 1"));
        }
        if let Some(&n) = self.fem.mesh_sizes.iter().find(|&&n| n == 0) {
            return Err(BenchError::config(format!("mesh size {n} has no elements")));
        }
        if !(self.fem.cg_tolerance > 0.0) {
            return Err(BenchError::config("cg_tolerance must be positive"));
        }
        if let Some(arch) = self.pinn.architectures.iter().find(|a| a.contains(&0)) {
            return Err(BenchError::config(format!(
                "architecture {arch:?} has a zero-width layer"
            )));
        }
        if !(self.pinn.learning_rate > 0.0) {
            return Err(BenchError::config("learning_rate must be positive"));
        }
        if self.pinn.n_interior == 0 {
            return Err(BenchError::config("n_interior must be >= 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_reproduce_experiment() {
        let config = BenchConfig::default();
        assert_eq!(config.trials, 10);
        assert_eq!(config.output_dir, PathBuf::from("results"));
        assert_eq!(config.fem.mesh_sizes.first(), Some(&64));
        assert_eq!(config.fem.mesh_sizes.last(), Some(&4096));
        assert_eq!(config.pinn.architectures[0], vec![1, 1]);
        assert_eq!(config.pinn.adam_steps, 15_000);
        assert_eq!(config.pinn.lbfgs_history, 50);
        assert_eq!(config.pinn.n_interior, 256);
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bench.json");
        fs::write(&path, r#"{"trials": 3, "pinn": {"adam_steps": 50}}"#).unwrap();

        let config = BenchConfig::from_file(&path).unwrap();
        assert_eq!(config.trials, 3);
        assert_eq!(config.pinn.adam_steps, 50);
        assert_eq!(config.pinn.n_interior, 256);
        assert_eq!(config.fem, FemBenchConfig::default());
    }

    #[test]
    fn test_validation_failures() {
        let mut config = BenchConfig::default();
        config.trials = 0;
        assert!(config.validate().unwrap_err().is_input_error());

        let mut config = BenchConfig::default();
        config.fem.mesh_sizes = vec![8, 0];
        assert!(config.validate().is_err());

        let mut config = BenchConfig::default();
        config.pinn.architectures = vec![vec![4, 0]];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_trial_seeds_and_solver_limits() {
        let pinn = PinnBenchConfig {
            seed: 7,
            ..Default::default()
        };
        assert_eq!(pinn.train_config(0).seed, 7);
        assert_eq!(pinn.train_config(3).seed, 10);

        let fem = FemBenchConfig {
            cg_tolerance: 1e-8,
            cg_max_iterations: 99,
            ..Default::default()
        };
        let solver = fem.solver_config();
        assert_eq!(solver.cg.max_iterations, 99);
        assert_eq!(solver.cg.tolerance, 1e-8);
    }
}
