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

mod common;

use capstan_bnb::{
    bnb::BnbSolver,
    config::BnbSolverConfigBuilder,
    monitor::search_monitor::{PruneReason, SearchMonitor},
    node::TreeNode,
    result::{SolverResult, TerminationReason},
    stats::BnbSolverStatistics,
};
use capstan_model::{
    instance::{Instance, InstanceBuilder},
    solution::Solution,
};
use common::{IntegerType, brute_force_optimum, init_tracing, random_instance};
use std::sync::{Arc, Mutex};

fn solver(num_workers: usize, dominance_pruning: bool) -> BnbSolver {
    BnbSolver::new(
        BnbSolverConfigBuilder::new()
            .with_num_workers(num_workers)
            .with_dominance_pruning(dominance_pruning)
            .build(),
    )
}

#[test]
fn test_single_job_starts_at_release() {
    init_tracing();
    let inst = InstanceBuilder::<IntegerType>::new().with_job(5, 0).build();
    let outcome = solver(1, true).solve(&inst).unwrap();

    assert!(matches!(outcome.result(), SolverResult::Optimal(_)));
    assert_eq!(
        outcome.termination_reason(),
        &TerminationReason::OptimalityProven
    );
    assert_eq!(outcome.objective_value(), 5);
    assert_eq!(outcome.gap(), 0);
    assert_eq!(outcome.remaining_lower_bound(), None);
}

#[test]
fn test_two_jobs_shortest_first() {
    init_tracing();
    let inst = InstanceBuilder::<IntegerType>::new()
        .with_job(3, 0)
        .with_job(2, 0)
        .build();
    let outcome = solver(2, true).solve(&inst).unwrap();

    assert!(outcome.is_optimal());
    assert_eq!(outcome.objective_value(), 7);
    let order: Vec<usize> = outcome
        .solution()
        .sequence()
        .iter()
        .map(|j| j.get())
        .collect();
    assert_eq!(order, vec![1, 0]);
}

#[test]
fn test_machine_idles_until_release() {
    init_tracing();
    let inst = InstanceBuilder::<IntegerType>::new()
        .with_job(2, 0)
        .with_job(1, 5)
        .build();
    let outcome = solver(1, true).solve(&inst).unwrap();

    assert!(outcome.is_optimal());
    assert_eq!(outcome.objective_value(), 8);
    assert_eq!(outcome.solution().start_times(), &[0, 5]);
    assert_eq!(outcome.solution().completion_times(), &[2, 6]);
}

#[test]
fn test_late_job_is_dominated() {
    init_tracing();
    let inst = InstanceBuilder::<IntegerType>::new()
        .with_job(2, 0)
        .with_job(3, 0)
        .with_job(1, 10)
        .build();
    let outcome = solver(1, true).solve(&inst).unwrap();

    assert!(outcome.is_optimal());
    assert_eq!(outcome.objective_value(), 18);
    assert!(outcome.statistics().prunings_dominance > 0);
}

#[test]
fn test_matches_brute_force_on_random_instances() {
    init_tracing();
    for seed in 0..40 {
        let num_jobs = 2 + (seed as usize % 7);
        let inst = random_instance(seed, num_jobs, 20, 40);
        let expected = brute_force_optimum(&inst);

        let outcome = solver(1, true).solve(&inst).unwrap();
        assert!(outcome.is_optimal(), "seed {}", seed);
        assert_eq!(outcome.objective_value(), expected, "seed {}", seed);
        assert!(outcome.solution().validate(&inst).is_ok(), "seed {}", seed);
    }
}

#[test]
fn test_multiple_workers_match_brute_force() {
    init_tracing();
    for seed in 100..120 {
        let inst = random_instance(seed, 8, 15, 30);
        let expected = brute_force_optimum(&inst);

        let outcome = solver(4, true).solve(&inst).unwrap();
        assert!(outcome.is_optimal(), "seed {}", seed);
        assert_eq!(outcome.objective_value(), expected, "seed {}", seed);
        assert_eq!(outcome.statistics().num_workers, 4);
        assert!(outcome.solution().validate(&inst).is_ok(), "seed {}", seed);
    }
}

#[test]
fn test_dominance_pruning_does_not_change_the_optimum() {
    init_tracing();
    for seed in 200..230 {
        let inst = random_instance(seed, 7, 10, 60);
        let with = solver(1, true).solve(&inst).unwrap();
        let without = solver(1, false).solve(&inst).unwrap();

        assert_eq!(with.objective_value(), without.objective_value(), "seed {}", seed);
        assert_eq!(without.statistics().prunings_dominance, 0);
    }
}

#[test]
fn test_solving_twice_yields_the_same_objective() {
    init_tracing();
    let inst = random_instance(7, 12, 25, 80);
    let first = solver(3, true).solve(&inst).unwrap();
    let second = solver(3, true).solve(&inst).unwrap();
    let sequential = solver(1, true).solve(&inst).unwrap();

    assert!(
        first.is_optimal() && second.is_optimal() && sequential.is_optimal()
    );
    assert_eq!(first.objective_value(), second.objective_value());
    assert_eq!(first.objective_value(), sequential.objective_value());
}

#[test]
fn test_bounds_bracket_the_optimum() {
    init_tracing();
    let inst = random_instance(11, 10, 30, 100);
    let outcome = solver(2, true).solve(&inst).unwrap();
    let stats = outcome.statistics();

    assert!(stats.root_lower_bound <= outcome.objective_value());
    assert!(outcome.objective_value() <= stats.seed_upper_bound);
    if outcome.objective_value() < stats.seed_upper_bound {
        assert!(stats.solutions_found > 0);
    }
}

#[test]
fn test_narrow_integer_type() {
    init_tracing();
    let inst: Instance<i32> = vec![(4, 0), (1, 1), (3, 2), (2, 9), (6, 3)].into();
    let wide: Instance<i64> = vec![(4, 0), (1, 1), (3, 2), (2, 9), (6, 3)].into();

    let narrow = solver(2, true).solve(&inst).unwrap();
    assert!(narrow.is_optimal());
    assert_eq!(narrow.objective_value(), brute_force_optimum(&wide));
}

/// Records the objective of every schedule installed as the new incumbent.
struct ImprovementRecorder {
    objectives: Arc<Mutex<Vec<i64>>>,
}

impl SearchMonitor<IntegerType> for ImprovementRecorder {
    fn name(&self) -> &str {
        "ImprovementRecorder"
    }

    fn on_enter_search(
        &mut self,
        _instance: &Instance<IntegerType>,
        _statistics: &BnbSolverStatistics,
    ) {
    }

    fn on_node_expanded(
        &mut self,
        _node: &TreeNode<IntegerType>,
        _statistics: &BnbSolverStatistics,
    ) {
    }

    fn on_prune(
        &mut self,
        _depth: usize,
        _reason: PruneReason,
        _statistics: &BnbSolverStatistics,
    ) {
    }

    fn on_solution_found(
        &mut self,
        solution: &Solution<IntegerType>,
        _statistics: &BnbSolverStatistics,
    ) {
        self.objectives
            .lock()
            .unwrap()
            .push(solution.objective_value());
    }

    fn on_exit_search(&mut self, _statistics: &BnbSolverStatistics) {}
}

#[test]
fn test_installed_objectives_strictly_decrease() {
    init_tracing();
    for seed in 300..340 {
        let inst = random_instance(seed, 8, 20, 50);
        let objectives = Arc::new(Mutex::new(Vec::new()));
        let outcome = solver(1, true)
            .solve_with_monitor(&inst, |_worker| ImprovementRecorder {
                objectives: Arc::clone(&objectives),
            })
            .unwrap();
        let recorded = objectives.lock().unwrap().clone();
        let stats = outcome.statistics();

        assert!(outcome.is_optimal(), "seed {}", seed);
        assert_eq!(recorded.len() as u64, stats.solutions_found, "seed {}", seed);
        assert!(
            recorded.windows(2).all(|w| w[1] < w[0]),
            "seed {}: {:?}",
            seed,
            recorded
        );
        assert!(
            recorded
                .iter()
                .all(|&objective| objective < stats.seed_upper_bound),
            "seed {}",
            seed
        );
        if outcome.objective_value() < stats.seed_upper_bound {
            assert_eq!(recorded.last(), Some(&outcome.objective_value()), "seed {}", seed);
        } else {
            assert!(recorded.is_empty(), "seed {}", seed);
        }
        assert_eq!(outcome.objective_value(), brute_force_optimum(&inst), "seed {}", seed);
    }
}
