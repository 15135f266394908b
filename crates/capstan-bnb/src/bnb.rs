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

//! # Parallel Best-First Branch-and-Bound
//!
//! `BnbSolver` computes a schedule minimizing the sum of completion times on
//! one machine with release dates. Nodes sequence jobs left to right; their
//! bound is the SRPT relaxation of the unscheduled rest.
//!
//! ## Phases
//!
//! 1. The instance is validated; nothing is searched for an invalid one.
//! 2. The shared incumbent is seeded with the best dispatch heuristic.
//! 3. The root is evaluated and expanded on the calling thread. A root
//!    relaxation that happens to be non-preemptive is adopted at once.
//! 4. With more than one worker, the calling thread keeps expanding
//!    best-first until the frontier holds `ramp_up_nodes` nodes.
//! 5. A `std::thread::scope` pool drains the shared frontier. Each worker
//!    owns its expander, statistics and monitor stack; the incumbent and the
//!    frontier are the only shared state.
//! 6. Statistics are merged and the outcome is built. A stopped search
//!    reports the smallest bound left on the frontier.
//!
//! ## Termination
//!
//! - The frontier drains: the incumbent is optimal.
//! - A monitor terminates (time limit, interrupt flag, user monitor): every
//!   worker finishes the node in hand, so the frontier keeps every
//!   unexplored node and the reported gap is sound. If no remaining node can
//!   still improve the incumbent, optimality is reported anyway.
//! - An internal inconsistency stops the pool and is returned as an error.
//!
//! ## Usage
//!
//! ```rust
//! use capstan_bnb::{bnb::BnbSolver, config::BnbSolverConfigBuilder};
//! use capstan_model::instance::InstanceBuilder;
//!
//! let instance = InstanceBuilder::<i64>::new()
//!     .with_job(3, 0)
//!     .with_job(2, 0)
//!     .build();
//!
//! let solver = BnbSolver::new(BnbSolverConfigBuilder::new().with_num_workers(2).build());
//! let outcome = solver.solve(&instance).unwrap();
//! assert!(outcome.is_optimal());
//! assert_eq!(outcome.objective_value(), 2 + 5);
//! ```

use crate::{
    branching::NodeExpander,
    config::BnbSolverConfig,
    error::{BnbError, InconsistencyError},
    frontier::{FrontierPop, SharedFrontier},
    heuristics::HeuristicSeeder,
    incumbent::SharedIncumbent,
    monitor::{
        composite::CompositeMonitor,
        interrupt::InterruptMonitor,
        log::LogMonitor,
        no_op::NoOperationMonitor,
        search_monitor::{PruneReason, SearchCommand, SearchMonitor},
        time_limit::TimeLimitMonitor,
    },
    node::TreeNode,
    relaxation::Relaxation,
    result::{BnbSolverOutcome, TerminationReason},
    stats::BnbSolverStatistics,
};
use capstan_core::num::SolverNumeric;
use capstan_model::instance::Instance;
use std::{
    sync::atomic::{AtomicBool, AtomicU64},
    time::Instant,
};

/// State shared by the calling thread and every worker of one solve.
struct SearchSession<'a, T> {
    instance: &'a Instance<T>,
    config: &'a BnbSolverConfig,
    incumbent: SharedIncumbent<T>,
    frontier: SharedFrontier<T>,
    sequence: AtomicU64,
    stop_flag: &'a AtomicBool,
    deadline: Option<Instant>,
}

impl<'a, T> SearchSession<'a, T>
where
    T: SolverNumeric,
{
    #[inline]
    fn expander(&self) -> NodeExpander<'_, T> {
        NodeExpander::new(
            self.instance,
            &self.incumbent,
            &self.sequence,
            self.config.dominance_pruning,
        )
    }

    /// Builds the monitor stack of one worker around the caller's monitor.
    fn monitor<'m, M>(&'m self, worker: usize, user: M) -> CompositeMonitor<'m, T>
    where
        M: SearchMonitor<T> + 'm,
    {
        let mut monitor = CompositeMonitor::with_capacity(4);
        monitor.add_monitor(InterruptMonitor::new(self.stop_flag));
        if let Some(deadline) = self.deadline {
            monitor.add_monitor(TimeLimitMonitor::with_deadline(
                deadline,
                self.config.clock_check_mask,
            ));
        }
        if let Some(interval) = self.config.log_interval {
            monitor.add_monitor(LogMonitor::new(
                worker,
                interval,
                self.config.clock_check_mask,
            ));
        }
        monitor.add_monitor(user);
        monitor
    }

    /// Pops and expands nodes until the frontier is exhausted, the search is
    /// stopped, or the frontier has grown to `ramp_up_target` nodes.
    fn drain<M>(
        &self,
        expander: &mut NodeExpander<'_, T>,
        monitor: &mut M,
        stats: &mut BnbSolverStatistics,
        ramp_up_target: Option<usize>,
    ) -> Result<(), InconsistencyError>
    where
        M: SearchMonitor<T> + ?Sized,
    {
        loop {
            if let Some(target) = ramp_up_target
                && self.frontier.len() >= target
            {
                return Ok(());
            }

            if let SearchCommand::Terminate(reason) = monitor.search_command(stats) {
                self.frontier.stop(reason);
                return Ok(());
            }

            let node = match self.frontier.pop() {
                FrontierPop::Node(node) => node,
                FrontierPop::Exhausted | FrontierPop::Stopped => return Ok(()),
            };

            // The incumbent may have improved since the node was admitted.
            if let Some(lower_bound) = node.lower_bound()
                && lower_bound >= self.incumbent.upper_bound()
            {
                stats.on_pruning_bound();
                monitor.on_prune(node.depth(), PruneReason::Bound, stats);
                self.frontier.complete(Vec::new());
                continue;
            }

            match expander.expand(&node, stats, monitor) {
                Ok(children) => {
                    stats.on_node_expanded();
                    monitor.on_node_expanded(&node, stats);
                    self.frontier.complete(children);
                }
                Err(error) => {
                    self.frontier.complete(Vec::new());
                    self.frontier.stop(TerminationReason::Aborted(
                        "internal inconsistency".to_string(),
                    ));
                    return Err(error);
                }
            }
        }
    }

    /// Evaluates and expands the root, then grows the frontier on the calling
    /// thread. With a single worker this runs the whole search.
    fn run_calling_thread<M>(
        &self,
        monitor: &mut M,
        stats: &mut BnbSolverStatistics,
        ramp_up_target: Option<usize>,
    ) -> Result<(), InconsistencyError>
    where
        M: SearchMonitor<T> + ?Sized,
    {
        let mut expander = self.expander();
        let mut root = TreeNode::root(self.instance.num_jobs());
        let relaxation = expander.evaluate(&mut root)?;
        stats.root_lower_bound = relaxation.lower_bound();
        tracing::debug!(lower_bound = stats.root_lower_bound, "root relaxation");

        if let Relaxation::NonPreemptive { start_times, .. } = relaxation {
            stats.on_fast_accept();
            expander.offer(start_times, stats, monitor)?;
        }

        let children = expander.expand(&root, stats, monitor)?;
        stats.on_node_expanded();
        monitor.on_node_expanded(&root, stats);
        self.frontier.push_all(children);

        self.drain(&mut expander, monitor, stats, ramp_up_target)
    }

    /// Runs one pool worker to completion and returns its counters. Pool
    /// workers are numbered from `1`; `0` is the calling thread.
    fn run_worker<F, M>(
        &self,
        worker: usize,
        factory: &F,
    ) -> (BnbSolverStatistics, Result<(), InconsistencyError>)
    where
        F: Fn(usize) -> M,
        M: SearchMonitor<T>,
    {
        let mut stats = BnbSolverStatistics::default();
        let mut monitor = self.monitor(worker, factory(worker));
        let mut expander = self.expander();

        monitor.on_enter_search(self.instance, &stats);
        let result = self.drain(&mut expander, &mut monitor, &mut stats, None);
        monitor.on_exit_search(&stats);

        (stats, result)
    }
}

/// Parallel best-first branch-and-bound solver for `1|r_j|sum C_j`.
#[derive(Clone, Debug, Default)]
pub struct BnbSolver {
    config: BnbSolverConfig,
}

impl BnbSolver {
    #[inline]
    pub fn new(config: BnbSolverConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &BnbSolverConfig {
        &self.config
    }

    /// Solves `instance` to optimality or until the time limit.
    pub fn solve<T>(&self, instance: &Instance<T>) -> Result<BnbSolverOutcome<T>, BnbError>
    where
        T: SolverNumeric,
    {
        let never = AtomicBool::new(false);
        self.solve_internal(instance, &never, &|_: usize| NoOperationMonitor::<T>::new())
    }

    /// Like `solve`, but aborts once `stop_flag` becomes `true`. The flag is
    /// polled between node expansions.
    pub fn solve_with_interrupt<T>(
        &self,
        instance: &Instance<T>,
        stop_flag: &AtomicBool,
    ) -> Result<BnbSolverOutcome<T>, BnbError>
    where
        T: SolverNumeric,
    {
        self.solve_internal(instance, stop_flag, &|_: usize| {
            NoOperationMonitor::<T>::new()
        })
    }

    /// Like `solve`, with an additional monitor per worker. `factory` is
    /// called on the thread that uses the monitor, with `0` for the calling
    /// thread and `1..=num_workers` for the pool workers.
    pub fn solve_with_monitor<T, F, M>(
        &self,
        instance: &Instance<T>,
        factory: F,
    ) -> Result<BnbSolverOutcome<T>, BnbError>
    where
        T: SolverNumeric,
        F: Fn(usize) -> M + Sync,
        M: SearchMonitor<T>,
    {
        let never = AtomicBool::new(false);
        self.solve_internal(instance, &never, &factory)
    }

    fn solve_internal<T, F, M>(
        &self,
        instance: &Instance<T>,
        stop_flag: &AtomicBool,
        factory: &F,
    ) -> Result<BnbSolverOutcome<T>, BnbError>
    where
        T: SolverNumeric,
        F: Fn(usize) -> M + Sync,
        M: SearchMonitor<T>,
    {
        let start_time = Instant::now();
        instance.validate()?;
        tracing::debug!(
            jobs = instance.num_jobs(),
            total_processing_time = ?instance.total_processing_time(),
            latest_release = ?instance.max_release_time(),
            "instance validated"
        );

        let num_workers = self.config.resolved_num_workers();
        let deadline = self
            .config
            .time_limit
            .and_then(|limit| start_time.checked_add(limit));

        let (rule, seed) = HeuristicSeeder::best(instance)?;
        tracing::info!(
            rule = rule.name(),
            upper_bound = seed.objective_value(),
            "seeded incumbent"
        );

        let mut stats = BnbSolverStatistics::default();
        stats.seed_upper_bound = seed.objective_value();

        let session = SearchSession {
            instance,
            config: &self.config,
            incumbent: SharedIncumbent::with_solution(seed.clone()),
            frontier: SharedFrontier::new(),
            sequence: AtomicU64::new(1),
            stop_flag,
            deadline,
        };

        let ramp_up_target = (num_workers > 1).then(|| self.config.resolved_ramp_up_nodes());
        let mut failure = {
            let mut monitor = session.monitor(0, factory(0));
            monitor.on_enter_search(instance, &stats);
            let result = session.run_calling_thread(&mut monitor, &mut stats, ramp_up_target);
            monitor.on_exit_search(&stats);
            result.err()
        };

        if failure.is_none()
            && num_workers > 1
            && !session.frontier.is_stopped()
            && !session.frontier.is_empty()
        {
            tracing::debug!(
                workers = num_workers,
                frontier = session.frontier.len(),
                "dispatching to worker pool"
            );

            let session = &session;
            let results = std::thread::scope(|scope| {
                let handles: Vec<_> = (1..=num_workers)
                    .map(|worker| {
                        scope.spawn(move || session.run_worker(worker, factory))
                    })
                    .collect();
                handles
                    .into_iter()
                    .map(|handle| {
                        handle
                            .join()
                            .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
                    })
                    .collect::<Vec<_>>()
            });

            for (worker_stats, result) in results {
                stats.merge(&worker_stats);
                if failure.is_none() {
                    failure = result.err();
                }
            }
        }

        stats.num_workers = num_workers;
        stats.set_total_time(start_time.elapsed());

        if let Some(error) = failure {
            tracing::warn!(%error, "search stopped on internal inconsistency");
            return Err(BnbError::InternalInconsistency(error));
        }

        let solution = session.incumbent.snapshot().unwrap_or(seed);
        let remaining_lower_bound = session
            .frontier
            .min_lower_bound_below(solution.objective_value());

        let outcome = match (session.frontier.stop_reason(), remaining_lower_bound) {
            (Some(reason), Some(lower_bound)) => {
                BnbSolverOutcome::stopped(solution, reason, lower_bound, stats)
            }
            _ => BnbSolverOutcome::optimal(solution, stats),
        };

        tracing::info!(
            reason = %outcome.termination_reason(),
            objective = outcome.objective_value(),
            nodes = outcome.statistics().nodes_expanded,
            gap = outcome.gap(),
            "search finished"
        );

        Ok(outcome)
    }
}

impl std::fmt::Display for BnbSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BnbSolver({})", self.config)
    }
}
