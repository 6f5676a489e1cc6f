extern crate layersat;

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use layersat::generator::threshold_formula;
use layersat::{Bruteforce, LayeredSolver, Solver, CNF};
use rand::rngs::StdRng;
use rand::SeedableRng;

const SEED: u64 = 2020;

fn formulae(sizes: &[usize]) -> Vec<(usize, CNF)> {
    let mut rng = StdRng::seed_from_u64(SEED);
    sizes.iter()
        .map(|&num_variables| (num_variables, threshold_formula(num_variables, &mut rng)))
        .collect()
}

fn create_group_for_solver(c: &mut Criterion, name: &str, solver: impl Solver, sizes: &[usize]) {
    let mut group = c.benchmark_group(name);

    for (num_variables, formula) in formulae(sizes) {
        group.bench_with_input(BenchmarkId::from_parameter(num_variables), &formula, |b, formula| {
            b.iter_batched(|| formula.clone(), |formula| solver.solve(&formula), BatchSize::SmallInput)
        });
    }

    group.finish()
}

fn criterion_benchmark(c: &mut Criterion) {
    create_group_for_solver(c, "Layered", LayeredSolver::new(), &[8, 12, 16]);
    create_group_for_solver(c, "Layered parallel", LayeredSolver::new().parallel(true), &[8, 12, 16]);
    create_group_for_solver(c, "Bruteforce", Bruteforce, &[8, 12, 16]);
}

criterion_group!{
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = criterion_benchmark
}
criterion_main!(benches);
