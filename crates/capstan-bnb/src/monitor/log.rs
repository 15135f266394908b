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

use crate::{
    monitor::search_monitor::{PruneReason, SearchMonitor},
    node::TreeNode,
    stats::BnbSolverStatistics,
};
use capstan_core::num::SolverNumeric;
use capstan_model::{instance::Instance, solution::Solution};
use std::marker::PhantomData;
use std::time::{Duration, Instant};

/// Emits a periodic progress line per worker through `tracing`.
///
/// The clock is only read on expansions where
/// `nodes_expanded & clock_check_mask == 0`.
#[derive(Debug, Clone)]
pub struct LogMonitor<T> {
    worker: usize,
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    clock_check_mask: u64,
    best_objective: Option<i64>,
    lines: u64,
    _marker: PhantomData<T>,
}

impl<T> LogMonitor<T> {
    pub fn new(worker: usize, log_interval: Duration, clock_check_mask: u64) -> Self {
        let now = Instant::now();
        Self {
            worker,
            start_time: now,
            last_log_time: now,
            log_interval,
            clock_check_mask,
            best_objective: None,
            lines: 0,
            _marker: PhantomData,
        }
    }

    /// Number of progress lines emitted so far.
    #[inline]
    pub fn lines_logged(&self) -> u64 {
        self.lines
    }

    #[inline(always)]
    fn log_line(&mut self, node: &TreeNode<T>, stats: &BnbSolverStatistics)
    where
        T: SolverNumeric,
    {
        let now = Instant::now();
        let best = match self.best_objective {
            Some(objective) => objective.to_string(),
            None => "-".to_string(),
        };
        tracing::info!(
            worker = self.worker,
            elapsed_secs = now.duration_since(self.start_time).as_secs_f64(),
            nodes = stats.nodes_expanded,
            depth = node.depth(),
            lower_bound = node.lower_bound().unwrap_or_default(),
            best = %best,
            pruned_dominance = stats.prunings_dominance,
            pruned_bound = stats.prunings_bound,
            "search progress"
        );
        self.last_log_time = now;
        self.lines += 1;
    }
}

impl<T> Default for LogMonitor<T> {
    fn default() -> Self {
        Self::new(0, Duration::from_secs(1), 4095)
    }
}

impl<T> std::fmt::Display for LogMonitor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogMonitor(worker: {}, log_interval: {:.2?}, clock_check_mask: {})",
            self.worker, self.log_interval, self.clock_check_mask
        )
    }
}

impl<T> SearchMonitor<T> for LogMonitor<T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "LogMonitor"
    }

    fn on_enter_search(&mut self, instance: &Instance<T>, _statistics: &BnbSolverStatistics) {
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        self.best_objective = None;
        tracing::debug!(
            worker = self.worker,
            jobs = instance.num_jobs(),
            "worker entered search"
        );
    }

    fn on_node_expanded(&mut self, node: &TreeNode<T>, statistics: &BnbSolverStatistics) {
        if (statistics.nodes_expanded & self.clock_check_mask) == 0
            && self.last_log_time.elapsed() >= self.log_interval
        {
            self.log_line(node, statistics);
        }
    }

    fn on_prune(&mut self, _depth: usize, _reason: PruneReason, _statistics: &BnbSolverStatistics) {
    }

    fn on_solution_found(&mut self, solution: &Solution<T>, _statistics: &BnbSolverStatistics) {
        self.best_objective = Some(solution.objective_value());
    }

    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics) {
        tracing::debug!(
            worker = self.worker,
            nodes = statistics.nodes_expanded,
            elapsed = ?self.start_time.elapsed(),
            "worker left search"
        );
    }
}
