//! Benchmark: 1-D Poisson solver scaling
//!
//! Tests how assembly and the preconditioned CG solve scale with the number
//! of elements.
//!
//! Problem: -u'' = f on [0, 1], u = x exp(-x²), Dirichlet at both ends
//!
//! Run with:
//!   cargo bench -p math-poisson-fem --bench poisson_1d_scaling

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use math_poisson_fem::assembly::{DEFAULT_LOAD_ORDER, PoissonProblem};
use math_poisson_fem::boundary::{DirichletBC, apply_dirichlet};
use math_poisson_fem::mesh::{LEFT_BOUNDARY, RIGHT_BOUNDARY, unit_interval};
use math_poisson_fem::solver::{SolverConfig, SolverType, solve};
use std::hint::black_box;
use std::time::Duration;

const SIZES: [usize; 7] = [64, 128, 256, 512, 1024, 2048, 4096];

fn source(x: f64) -> f64 {
    (6.0 * x - 4.0 * x.powi(3)) * (-x * x).exp()
}

fn boundary_conditions() -> [DirichletBC; 2] {
    [
        DirichletBC::constant(LEFT_BOUNDARY, 0.0),
        DirichletBC::constant(RIGHT_BOUNDARY, (-1.0f64).exp()),
    ]
}

/// Benchmark assembly of stiffness matrix and load vector
fn bench_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("assembly_1d");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(3));

    for &n in &SIZES {
        let mesh = unit_interval(n).expect("valid mesh");
        group.throughput(Throughput::Elements(n as u64));

        group.bench_with_input(BenchmarkId::new("poisson", n), &mesh, |b, mesh| {
            b.iter(|| black_box(PoissonProblem::assemble(mesh, DEFAULT_LOAD_ORDER, source)));
        });
    }

    group.finish();
}

/// Benchmark the full pipeline per preconditioner
fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve_1d");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(5));

    for solver_type in [SolverType::CgIlu, SolverType::CgJacobi] {
        let config = SolverConfig {
            solver_type,
            ..Default::default()
        };

        for &n in &SIZES {
            group.throughput(Throughput::Elements(n as u64));
            let id = BenchmarkId::new(format!("{solver_type:?}"), n);

            group.bench_with_input(id, &n, |b, &n| {
                b.iter(|| {
                    let mesh = unit_interval(n).expect("valid mesh");
                    let mut problem = PoissonProblem::assemble(&mesh, DEFAULT_LOAD_ORDER, source);
                    apply_dirichlet(&mut problem, &mesh, &boundary_conditions());
                    black_box(solve(&problem, &config).expect("converged"))
                });
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_assembly, bench_solve);
criterion_main!(benches);
