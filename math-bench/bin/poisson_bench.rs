use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use math_poisson_bench::{
    BenchConfig, BenchmarkOutcome, EvaluationPoints, compare, report, run_fem_benchmark,
    run_pinn_benchmark,
};
use std::fmt::Debug;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "poisson-bench",
    about = "Compare FEM and PINN solutions of -u'' = f on [0, 1] by accuracy and cost"
)]
struct Cli {
    /// JSON configuration file; missing fields take their defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for result files (overrides the configuration)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sweep P1 finite elements over mesh sizes
    Fem {
        #[command(flatten)]
        run: RunArgs,

        /// Element counts, comma separated
        #[arg(long, value_delimiter = ',')]
        mesh_sizes: Option<Vec<usize>>,

        /// Relative residual tolerance of the CG solve
        #[arg(long)]
        cg_tolerance: Option<f64>,
    },

    /// Sweep PINN architectures
    Pinn {
        #[command(flatten)]
        run: RunArgs,

        /// Hidden-layer widths, comma separated; repeat for several architectures
        #[arg(long, value_parser = parse_arch)]
        arch: Vec<Arch>,

        /// Adam steps per trial
        #[arg(long)]
        adam_steps: Option<usize>,

        /// L-BFGS iteration cap per trial
        #[arg(long)]
        lbfgs_iterations: Option<usize>,

        /// Base random seed; trial k uses seed + k
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Write n + 1 uniformly spaced evaluation points as a JSON array
    GenPoints {
        /// Number of intervals
        #[arg(long, default_value_t = 1000)]
        n: usize,

        /// Destination file
        #[arg(long, default_value = "eval_points.json")]
        file: PathBuf,
    },

    /// Tabulate and plot error against time from existing result files
    Compare,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Evaluation points file (overrides the configuration)
    #[arg(long)]
    points: Option<PathBuf>,

    /// Repetitions per configuration (overrides the configuration)
    #[arg(long)]
    trials: Option<usize>,
}

/// Hidden-layer widths of one network
#[derive(Debug, Clone)]
struct Arch(Vec<usize>);

fn parse_arch(s: &str) -> std::result::Result<Arch, String> {
    s.split(',')
        .map(|w| {
            w.trim()
                .parse::<usize>()
                .map_err(|e| format!("invalid layer width '{w}': {e}"))
        })
        .collect::<std::result::Result<Vec<_>, _>>()
        .map(Arch)
}

fn load_config(cli: &Cli) -> Result<BenchConfig> {
    let mut config = match &cli.config {
        Some(path) => BenchConfig::from_file(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => BenchConfig::default(),
    };
    if let Some(output) = &cli.output {
        config.output_dir = output.clone();
    }
    Ok(config)
}

fn apply_run_args(config: &mut BenchConfig, run: &RunArgs) {
    if let Some(points) = &run.points {
        config.points_path = points.clone();
    }
    if let Some(trials) = run.trials {
        config.trials = trials;
    }
}

fn report_outcome<C: Debug>(method: &str, outcome: &BenchmarkOutcome<C>) -> Result<()> {
    for (config, summary) in &outcome.report.entries {
        println!(
            "{method} {config:?}: l2_rel {:.4e}, {} trials",
            summary.l2_rel,
            summary.trials()
        );
    }
    if !outcome.failed.is_empty() {
        for failed in &outcome.failed {
            eprintln!("{method} {:?} failed: {}", failed.config, failed.last_error);
        }
        if outcome.report.is_empty() {
            bail!("every {method} configuration failed");
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = load_config(&cli)?;

    match &cli.command {
        Command::Fem {
            run,
            mesh_sizes,
            cg_tolerance,
        } => {
            apply_run_args(&mut config, run);
            if let Some(sizes) = mesh_sizes {
                config.fem.mesh_sizes = sizes.clone();
            }
            if let Some(tol) = cg_tolerance {
                config.fem.cg_tolerance = *tol;
            }
            let outcome = run_fem_benchmark(&config).context("FEM benchmark")?;
            report_outcome("fem", &outcome)?;
            println!(
                "results: {}",
                config.output_dir.join(report::FEM_RESULTS_FILE).display()
            );
        }
        Command::Pinn {
            run,
            arch,
            adam_steps,
            lbfgs_iterations,
            seed,
        } => {
            apply_run_args(&mut config, run);
            if !arch.is_empty() {
                config.pinn.architectures = arch.iter().map(|a| a.0.clone()).collect();
            }
            if let Some(steps) = adam_steps {
                config.pinn.adam_steps = *steps;
            }
            if let Some(iters) = lbfgs_iterations {
                config.pinn.lbfgs_max_iterations = *iters;
            }
            if let Some(seed) = seed {
                config.pinn.seed = *seed;
            }
            let outcome = run_pinn_benchmark(&config).context("PINN benchmark")?;
            report_outcome("pinn", &outcome)?;
            println!(
                "results: {} and {}",
                config.output_dir.join(report::PINN_PREDICTIONS_FILE).display(),
                config.output_dir.join(report::PINN_EVALUATION_FILE).display()
            );
        }
        Command::GenPoints { n, file } => {
            let points = EvaluationPoints::uniform(*n)?;
            points
                .save(file)
                .with_context(|| format!("writing {}", file.display()))?;
            println!("wrote {} points to {}", points.len(), file.display());
        }
        Command::Compare => {
            let rows = compare::load_rows(&config.output_dir)?;
            print!("{}", compare::Table(&rows));
            let (solving, evaluation) = compare::write_plots(&rows, config.output_dir.join("fig"))?;
            println!("plots: {} and {}", solving.display(), evaluation.display());
        }
    }

    Ok(())
}
