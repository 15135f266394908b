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

//! # Node Expansion
//!
//! `NodeExpander` turns one active node into its children, one per
//! unscheduled job, and classifies each child. A worker owns one expander and
//! reuses its relaxation scratch space for every node.
//!
//! For every unscheduled job `j`, in index order:
//!
//! 1. **Dominance.** If another unscheduled job `i` satisfies
//!    `r_j >= max(makespan, r_i) + p_i`, job `i` fits entirely before `j`
//!    becomes available, so sequencing `j` next is dominated. The child is
//!    dropped without being built.
//! 2. **Extension.** The child schedule appends `j` at
//!    `max(makespan, r_j)`.
//! 3. **Bound.** The SRPT relaxation of the child is evaluated; a child with
//!    `lower_bound >= upper_bound` is dropped.
//! 4. **Leaf.** A complete child is offered to the incumbent.
//! 5. **Fast accept.** A child whose relaxation is non-preemptive is solved
//!    exactly by that schedule; it is offered to the incumbent and not
//!    explored further.
//! 6. Every other child is returned as a new active node.

use crate::{
    error::{InconsistencyError, InconsistencyKind},
    incumbent::SharedIncumbent,
    monitor::search_monitor::{PruneReason, SearchMonitor},
    node::TreeNode,
    partial::PartialSchedule,
    relaxation::{PreemptiveBoundEngine, Relaxation},
    stats::BnbSolverStatistics,
};
use capstan_core::num::SolverNumeric;
use capstan_model::{index::JobIndex, instance::Instance, solution::Solution};
use std::sync::atomic::{AtomicU64, Ordering};

pub struct NodeExpander<'a, T> {
    instance: &'a Instance<T>,
    incumbent: &'a SharedIncumbent<T>,
    sequence: &'a AtomicU64,
    dominance_pruning: bool,
    engine: PreemptiveBoundEngine,
}

impl<'a, T> NodeExpander<'a, T>
where
    T: SolverNumeric,
{
    /// Creates an expander. `sequence` hands out node sequence numbers and
    /// is shared by all expanders of one search.
    pub fn new(
        instance: &'a Instance<T>,
        incumbent: &'a SharedIncumbent<T>,
        sequence: &'a AtomicU64,
        dominance_pruning: bool,
    ) -> Self {
        Self {
            instance,
            incumbent,
            sequence,
            dominance_pruning,
            engine: PreemptiveBoundEngine::preallocated(instance.num_jobs()),
        }
    }

    /// Evaluates the relaxation of `node` in place.
    #[inline]
    pub fn evaluate(
        &mut self,
        node: &mut TreeNode<T>,
    ) -> Result<Relaxation<T>, InconsistencyError> {
        node.evaluate(&mut self.engine, self.instance)
    }

    /// Returns `true` if some other unscheduled job can be completed before
    /// `job` is released when started right after `partial`.
    pub fn is_dominated(&self, partial: &PartialSchedule<T>, job: JobIndex) -> bool {
        let release: i64 = self.instance.release_time(job).into();
        let makespan: i64 = partial.makespan().into();
        partial.unscheduled().any(|other| {
            if other == job {
                return false;
            }
            let other_release: i64 = self.instance.release_time(other).into();
            let other_processing: i64 = self.instance.processing_time(other).into();
            release >= makespan.max(other_release).saturating_add(other_processing)
        })
    }

    /// Expands `node` and returns the children that stay active.
    pub fn expand<M>(
        &mut self,
        node: &TreeNode<T>,
        stats: &mut BnbSolverStatistics,
        monitor: &mut M,
    ) -> Result<Vec<TreeNode<T>>, InconsistencyError>
    where
        M: SearchMonitor<T> + ?Sized,
    {
        let partial = node.partial();
        let child_depth = partial.depth() + 1;
        let candidates: Vec<JobIndex> = partial.unscheduled().collect();
        let mut children = Vec::with_capacity(candidates.len());

        for job in candidates {
            stats.on_node_generated(child_depth);

            if self.dominance_pruning && self.is_dominated(partial, job) {
                stats.on_pruning_dominance();
                monitor.on_prune(child_depth, PruneReason::Dominance, stats);
                continue;
            }

            let sequence_number = self.sequence.fetch_add(1, Ordering::Relaxed);
            let mut child = TreeNode::new(partial.extended(self.instance, job)?, sequence_number);
            let relaxation = self.evaluate(&mut child)?;

            if relaxation.lower_bound() >= self.incumbent.upper_bound() {
                stats.on_pruning_bound();
                monitor.on_prune(child_depth, PruneReason::Bound, stats);
                continue;
            }

            if child.is_leaf() {
                stats.on_leaf_reached();
                let start_times = child.partial().start_times().to_vec();
                self.offer(start_times, stats, monitor)?;
                continue;
            }

            if let Relaxation::NonPreemptive { start_times, .. } = relaxation {
                stats.on_fast_accept();
                self.offer(start_times, stats, monitor)?;
                continue;
            }

            children.push(child);
        }

        Ok(children)
    }

    /// Offers a complete schedule to the incumbent. Returns `true` if it
    /// became the new incumbent.
    pub fn offer<M>(
        &mut self,
        start_times: Vec<T>,
        stats: &mut BnbSolverStatistics,
        monitor: &mut M,
    ) -> Result<bool, InconsistencyError>
    where
        M: SearchMonitor<T> + ?Sized,
    {
        for job in self.instance.job_indices() {
            if start_times[job.get()] < self.instance.release_time(job) {
                return Err(InconsistencyError::for_job(
                    InconsistencyKind::StartBeforeRelease,
                    job,
                ));
            }
        }

        let solution = Solution::from_start_times(self.instance, start_times)
            .ok_or_else(InconsistencyError::overflow)?;
        if !self.incumbent.improves(solution.objective_value()) {
            return Ok(false);
        }

        let objective = solution.objective_value();
        let report = solution.clone();
        if !self.incumbent.try_install(solution) {
            return Ok(false);
        }

        stats.on_solution_found();
        tracing::debug!(objective, "improved incumbent");
        monitor.on_solution_found(&report, stats);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::no_op::NoOperationMonitor;
    use capstan_model::instance::InstanceBuilder;

    type IntegerType = i64;

    fn ji(i: usize) -> JobIndex {
        JobIndex::new(i)
    }

    fn root(
        expander: &mut NodeExpander<'_, IntegerType>,
        n: usize,
    ) -> TreeNode<IntegerType> {
        let mut node = TreeNode::root(n);
        expander.evaluate(&mut node).unwrap();
        node
    }

    #[test]
    fn test_dominance_detects_late_release() {
        // Job 3 is released at 10, both other jobs finish by then.
        let inst = InstanceBuilder::<IntegerType>::new()
            .with_job(2, 0)
            .with_job(3, 0)
            .with_job(1, 10)
            .build();
        let incumbent = SharedIncumbent::new();
        let sequence = AtomicU64::new(1);
        let expander = NodeExpander::new(&inst, &incumbent, &sequence, true);
        let empty = PartialSchedule::empty(3);

        assert!(expander.is_dominated(&empty, ji(2)));
        assert!(!expander.is_dominated(&empty, ji(0)));
        assert!(!expander.is_dominated(&empty, ji(1)));
    }

    #[test]
    fn test_expand_counts_dominance_and_keeps_active_children() {
        let inst = InstanceBuilder::<IntegerType>::new()
            .with_job(2, 0)
            .with_job(3, 0)
            .with_job(1, 10)
            .build();
        let incumbent = SharedIncumbent::new();
        let sequence = AtomicU64::new(1);
        let mut expander = NodeExpander::new(&inst, &incumbent, &sequence, true);
        let mut stats = BnbSolverStatistics::default();
        let mut monitor = NoOperationMonitor::<IntegerType>::new();

        let node = root(&mut expander, 3);
        let children = expander.expand(&node, &mut stats, &mut monitor).unwrap();

        assert_eq!(stats.nodes_generated, 3);
        assert_eq!(stats.prunings_dominance, 1);
        // Job 1 first is solved exactly (2 + 5 + 11); job 2 first then
        // costs 3 + 5 + 11 and is cut by the new bound.
        assert!(children.is_empty());
        assert_eq!(stats.fast_accepts, 1);
        assert_eq!(stats.prunings_bound, 1);
        assert_eq!(incumbent.upper_bound(), 18);
        assert_eq!(stats.solutions_found, 1);
    }

    #[test]
    fn test_disabled_dominance_generates_all_children() {
        let inst = InstanceBuilder::<IntegerType>::new()
            .with_job(2, 0)
            .with_job(3, 0)
            .with_job(1, 10)
            .build();
        let incumbent = SharedIncumbent::new();
        let sequence = AtomicU64::new(1);
        let mut expander = NodeExpander::new(&inst, &incumbent, &sequence, false);
        let mut stats = BnbSolverStatistics::default();
        let node = root(&mut expander, 3);
        expander
            .expand(
                &node,
                &mut stats,
                &mut NoOperationMonitor::<IntegerType>::new(),
            )
            .unwrap();
        assert_eq!(stats.prunings_dominance, 0);
        assert_eq!(incumbent.upper_bound(), 18);
    }

    #[test]
    fn test_bound_pruning_uses_incumbent() {
        let inst: capstan_model::instance::Instance<IntegerType> =
            vec![(3, 0), (1, 0), (2, 0)].into();
        let optimal = Solution::from_start_times(&inst, vec![3, 0, 1]).unwrap();
        assert_eq!(optimal.objective_value(), 1 + 3 + 6);
        let incumbent = SharedIncumbent::with_solution(optimal);
        let sequence = AtomicU64::new(1);
        let mut expander = NodeExpander::new(&inst, &incumbent, &sequence, true);
        let mut stats = BnbSolverStatistics::default();
        let node = root(&mut expander, 3);

        let children = expander
            .expand(
                &node,
                &mut stats,
                &mut NoOperationMonitor::<IntegerType>::new(),
            )
            .unwrap();
        assert!(children.is_empty());
        assert_eq!(stats.prunings_bound, 3);
        assert_eq!(stats.solutions_found, 0);
    }

    #[test]
    fn test_preemptive_children_stay_active() {
        // After a long first job, job 4 arrives while the other long job
        // runs and interrupts it.
        let inst = InstanceBuilder::<IntegerType>::new()
            .with_job(10, 0)
            .with_job(10, 0)
            .with_job(1, 5)
            .with_job(1, 15)
            .build();
        let incumbent = SharedIncumbent::new();
        let sequence = AtomicU64::new(1);
        let mut expander = NodeExpander::new(&inst, &incumbent, &sequence, true);
        let mut stats = BnbSolverStatistics::default();
        let node = root(&mut expander, 4);
        let children = expander
            .expand(
                &node,
                &mut stats,
                &mut NoOperationMonitor::<IntegerType>::new(),
            )
            .unwrap();

        assert!(!children.is_empty());
        for child in &children {
            assert_eq!(child.depth(), 1);
            assert!(child.is_relaxation_preemptive());
            assert!(child.lower_bound().unwrap() < incumbent.upper_bound());
        }
        let mut seqs: Vec<u64> = children.iter().map(|c| c.sequence_number()).collect();
        seqs.sort_unstable();
        seqs.dedup();
        assert_eq!(seqs.len(), children.len());
    }

    #[test]
    fn test_offer_rejects_start_before_release() {
        let inst: capstan_model::instance::Instance<IntegerType> = vec![(1, 5)].into();
        let incumbent = SharedIncumbent::new();
        let sequence = AtomicU64::new(1);
        let mut expander = NodeExpander::new(&inst, &incumbent, &sequence, true);
        let err = expander
            .offer(
                vec![0],
                &mut BnbSolverStatistics::default(),
                &mut NoOperationMonitor::<IntegerType>::new(),
            )
            .unwrap_err();
        assert_eq!(err.kind(), InconsistencyKind::StartBeforeRelease);
    }
}
