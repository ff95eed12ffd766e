//! Physics-informed neural network for the 1-D Poisson equation
//!
//! A small tanh MLP `u_θ(x)` is trained so that `-u_θ'' = f` in the interior
//! and `u_θ` matches the Dirichlet data at the end points.
//!
//! # Features
//!
//! - **Jets**: second-order forward mode gives `u''` without finite differences
//! - **Reverse pass**: exact parameter gradients through the jet computation
//! - **Optimizers**: Adam and L-BFGS with Armijo backtracking
//! - **Sampling**: Latin hypercube collocation points
//! - **Parallelism**: batch prediction with rayon (`parallel` feature)
//!
//! # Example
//!
//! ```
//! use math_poisson_pinn::{Mlp, PinnTrainer, PoissonLoss, TrainConfig};
//!
//! let loss = PoissonLoss::new(|_| 2.0, (0.0, 1.0), 0.0, 0.0);
//! let config = TrainConfig { adam_steps: 10, lbfgs_max_iterations: 5, n_interior: 16, ..Default::default() };
//! let mut net = Mlp::new(&[4], 42)?;
//! let mut trainer = PinnTrainer::new(config, loss);
//! trainer.train_adam(&mut net)?;
//! trainer.refine_lbfgs(&mut net)?;
//! let u = net.predict(&[0.0, 0.5, 1.0]);
//! assert_eq!(u.len(), 3);
//! # Ok::<(), math_poisson_pinn::PinnError>(())
//! ```

pub mod error;
pub mod jet;
pub mod loss;
pub mod network;
pub mod optim;
pub mod params;
pub mod sampling;
pub mod train;

pub use error::{PinnError, Result, TrainingPhase};
pub use jet::Jet;
pub use loss::{Batch, LossParts, PoissonLoss};
pub use network::{DenseLayer, Mlp};
pub use optim::{Adam, BacktrackingLineSearch, ConvergenceStatus, Lbfgs, OptimizationResult};
pub use params::{ParamSpec, flatten, unflatten};
pub use sampling::{latin_hypercube, latin_hypercube_1d};
pub use train::{AdamReport, LbfgsReport, LossHistory, PinnTrainer, TrainConfig};
