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

use capstan_core::num::ops::SaturatingAddVal;
use std::time::Duration;

/// Counters collected during a branch-and-bound run.
///
/// Every worker owns one instance and the driver merges them at the end,
/// so the hot path never touches shared counters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BnbSolverStatistics {
    /// Nodes whose children were generated.
    pub nodes_expanded: u64,
    /// Children considered during expansion, pruned or not.
    pub nodes_generated: u64,
    /// Children discarded because another unscheduled job dominates them.
    pub prunings_dominance: u64,
    /// Children or frontier nodes whose lower bound reached the upper bound.
    pub prunings_bound: u64,
    /// Children whose relaxation was already a non-preemptive schedule.
    pub fast_accepts: u64,
    /// Complete schedules reached at depth `n`.
    pub leaves_reached: u64,
    /// Improvements installed into the shared incumbent during the search.
    pub solutions_found: u64,
    /// The deepest node created.
    pub max_depth: u64,
    /// Relaxation bound of the empty sequence.
    pub root_lower_bound: i64,
    /// Objective of the best dispatch heuristic.
    pub seed_upper_bound: i64,
    /// Number of workers in the pool.
    pub num_workers: usize,
    /// Total time spent in the solver.
    pub time_total: Duration,
}

impl BnbSolverStatistics {
    #[inline]
    pub fn on_node_expanded(&mut self) {
        self.nodes_expanded = self.nodes_expanded.saturating_add_val(1);
    }

    #[inline]
    pub fn on_node_generated(&mut self, depth: usize) {
        self.nodes_generated = self.nodes_generated.saturating_add_val(1);
        self.max_depth = self.max_depth.max(depth as u64);
    }

    #[inline]
    pub fn on_pruning_dominance(&mut self) {
        self.prunings_dominance = self.prunings_dominance.saturating_add_val(1);
    }

    #[inline]
    pub fn on_pruning_bound(&mut self) {
        self.prunings_bound = self.prunings_bound.saturating_add_val(1);
    }

    #[inline]
    pub fn on_fast_accept(&mut self) {
        self.fast_accepts = self.fast_accepts.saturating_add_val(1);
    }

    #[inline]
    pub fn on_leaf_reached(&mut self) {
        self.leaves_reached = self.leaves_reached.saturating_add_val(1);
    }

    #[inline]
    pub fn on_solution_found(&mut self) {
        self.solutions_found = self.solutions_found.saturating_add_val(1);
    }

    /// Adds the counters of `other` into `self`. Run-level values
    /// (bounds, worker count, time) are kept from `self`.
    pub fn merge(&mut self, other: &BnbSolverStatistics) {
        self.nodes_expanded = self.nodes_expanded.saturating_add_val(other.nodes_expanded);
        self.nodes_generated = self.nodes_generated.saturating_add_val(other.nodes_generated);
        self.prunings_dominance = self
            .prunings_dominance
            .saturating_add_val(other.prunings_dominance);
        self.prunings_bound = self.prunings_bound.saturating_add_val(other.prunings_bound);
        self.fast_accepts = self.fast_accepts.saturating_add_val(other.fast_accepts);
        self.leaves_reached = self.leaves_reached.saturating_add_val(other.leaves_reached);
        self.solutions_found = self.solutions_found.saturating_add_val(other.solutions_found);
        self.max_depth = self.max_depth.max(other.max_depth);
    }

    /// Total prunings of either kind.
    #[inline]
    pub fn prunings(&self) -> u64 {
        self.prunings_dominance.saturating_add_val(self.prunings_bound)
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }
}

impl std::fmt::Display for BnbSolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Capstan-BnB Solver Statistics:")?;
        writeln!(f, "  Workers:               {}", self.num_workers)?;
        writeln!(f, "  Nodes expanded:        {}", self.nodes_expanded)?;
        writeln!(f, "  Nodes generated:       {}", self.nodes_generated)?;
        writeln!(f, "  Max depth reached:     {}", self.max_depth)?;
        writeln!(f, "  Prunings (dominance):  {}", self.prunings_dominance)?;
        writeln!(f, "  Prunings (bound):      {}", self.prunings_bound)?;
        writeln!(f, "  Fast accepts:          {}", self.fast_accepts)?;
        writeln!(f, "  Leaves reached:        {}", self.leaves_reached)?;
        writeln!(f, "  Solutions found:       {}", self.solutions_found)?;
        writeln!(f, "  Root lower bound:      {}", self.root_lower_bound)?;
        writeln!(f, "  Seed upper bound:      {}", self.seed_upper_bound)?;
        writeln!(f, "  Total time:            {:.2?}", self.time_total)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_increment() {
        let mut stats = BnbSolverStatistics::default();
        stats.on_node_expanded();
        stats.on_node_generated(3);
        stats.on_node_generated(1);
        stats.on_pruning_dominance();
        stats.on_pruning_bound();
        stats.on_pruning_bound();
        stats.on_fast_accept();
        stats.on_leaf_reached();
        stats.on_solution_found();

        assert_eq!(stats.nodes_expanded, 1);
        assert_eq!(stats.nodes_generated, 2);
        assert_eq!(stats.max_depth, 3);
        assert_eq!(stats.prunings(), 3);
        assert_eq!(stats.fast_accepts, 1);
        assert_eq!(stats.leaves_reached, 1);
        assert_eq!(stats.solutions_found, 1);
    }

    #[test]
    fn test_counters_saturate() {
        let mut stats = BnbSolverStatistics {
            nodes_expanded: u64::MAX,
            ..Default::default()
        };
        stats.on_node_expanded();
        assert_eq!(stats.nodes_expanded, u64::MAX);
    }

    #[test]
    fn test_merge_sums_counters_and_keeps_run_values() {
        let mut a = BnbSolverStatistics {
            nodes_expanded: 2,
            prunings_bound: 1,
            max_depth: 4,
            root_lower_bound: 10,
            seed_upper_bound: 12,
            num_workers: 2,
            ..Default::default()
        };
        let b = BnbSolverStatistics {
            nodes_expanded: 3,
            prunings_bound: 5,
            prunings_dominance: 1,
            max_depth: 6,
            root_lower_bound: 99,
            ..Default::default()
        };
        a.merge(&b);

        assert_eq!(a.nodes_expanded, 5);
        assert_eq!(a.prunings_bound, 6);
        assert_eq!(a.prunings_dominance, 1);
        assert_eq!(a.max_depth, 6);
        assert_eq!(a.root_lower_bound, 10);
        assert_eq!(a.seed_upper_bound, 12);
        assert_eq!(a.num_workers, 2);
    }

    #[test]
    fn test_display_has_one_line_per_field() {
        let s = format!("{}", BnbSolverStatistics::default());
        assert!(s.starts_with("Capstan-BnB Solver Statistics:"));
        assert_eq!(s.lines().count(), 13);
    }
}
