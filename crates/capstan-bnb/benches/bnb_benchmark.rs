// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use capstan_bnb::{
    bnb::BnbSolver, config::BnbSolverConfigBuilder, heuristics::HeuristicSeeder,
    partial::PartialSchedule, relaxation::PreemptiveBoundEngine,
};
use capstan_model::instance::{Instance, InstanceBuilder};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::hint::black_box;

fn random_instance(seed: u64, num_jobs: usize) -> Instance<i64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let max_release = (num_jobs as i64) * 10;
    let mut builder = InstanceBuilder::with_capacity(num_jobs);
    for _ in 0..num_jobs {
        builder.add_job(rng.random_range(1..=20), rng.random_range(0..=max_release));
    }
    builder.build()
}

fn bench_relaxation(c: &mut Criterion) {
    let mut group = c.benchmark_group("srpt_relaxation");
    for num_jobs in [20usize, 100, 500] {
        let instance = random_instance(1, num_jobs);
        let root = PartialSchedule::empty(num_jobs);
        let mut engine = PreemptiveBoundEngine::preallocated(num_jobs);

        group.throughput(Throughput::Elements(num_jobs as u64));
        group.bench_with_input(BenchmarkId::from_parameter(num_jobs), &num_jobs, |b, _| {
            b.iter(|| {
                engine
                    .evaluate(black_box(&instance), black_box(&root))
                    .expect("relaxation of a valid instance")
            })
        });
    }
    group.finish();
}

fn bench_heuristics(c: &mut Criterion) {
    let instance = random_instance(2, 500);
    c.bench_function("dispatch_heuristics_500", |b| {
        b.iter(|| HeuristicSeeder::best(black_box(&instance)).expect("seed schedule"))
    });
}

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("bnb_solve");
    group.sample_size(10);

    for num_jobs in [10usize, 14] {
        let instance = random_instance(3, num_jobs);
        for num_workers in [1usize, 4] {
            let solver = BnbSolver::new(
                BnbSolverConfigBuilder::new()
                    .with_num_workers(num_workers)
                    .build(),
            );
            group.bench_with_input(
                BenchmarkId::new(format!("{}_jobs", num_jobs), num_workers),
                &instance,
                |b, instance| {
                    b.iter(|| {
                        let outcome = solver.solve(black_box(instance)).expect("valid instance");
                        assert!(outcome.is_optimal());
                        outcome.objective_value()
                    })
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_relaxation, bench_heuristics, bench_solve);
criterion_main!(benches);
