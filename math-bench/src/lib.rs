//! Benchmark of finite elements against a physics-informed neural network
//!
//! Both methods solve the same 1-D Poisson problem,
//! `-u'' = (6x - 4x³) exp(-x²)` on [0, 1] with `u(0) = 0` and `u(1) = exp(-1)`,
//! and are scored by their relative L2 error at a shared set of evaluation
//! points together with the time spent solving (or training) and evaluating.
//!
//! # Example
//!
//! ```
//! use math_poisson_bench::{BenchmarkDriver, EvaluationPoints, FemAdapter, FemBenchConfig};
//!
//! let points = EvaluationPoints::uniform(20)?;
//! let driver = BenchmarkDriver::new(points, 2)?;
//! let mut fem = FemAdapter::new(&FemBenchConfig::default());
//! let outcome = driver.run(&mut fem, &[16, 32], |_| Ok(()))?;
//!
//! let errors: Vec<f64> = outcome.report.entries.iter().map(|(_, s)| s.l2_rel).collect();
//! assert!(errors[1] < errors[0]);
//! # Ok::<(), math_poisson_bench::BenchError>(())
//! ```

pub mod adapter;
pub mod compare;
pub mod config;
pub mod driver;
pub mod error;
pub mod metrics;
pub mod points;
pub mod problem;
pub mod report;

pub use adapter::{FemAdapter, Phase, PinnAdapter, SolverAdapter, TrialResult};
pub use config::{BenchConfig, FemBenchConfig, PinnBenchConfig};
pub use driver::{
    BenchmarkDriver, BenchmarkOutcome, BenchmarkReport, ConfigurationSummary, FailedConfiguration,
    run_fem_benchmark, run_pinn_benchmark,
};
pub use error::{BenchError, Result};
pub use metrics::relative_l2;
pub use points::{EvaluationPoints, uniform_grid};
