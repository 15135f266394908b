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

//! # Partial Schedules
//!
//! `PartialSchedule<T>` is the per-node overlay of the search tree: which jobs
//! have been sequenced so far, in which order, and at which start times. Jobs
//! themselves stay in the read-only `Instance`; only this small overlay is
//! copied when a node branches, so sibling nodes never share mutable state.
//!
//! ## Highlights
//!
//! - Membership in a `FixedBitSet`, so "is scheduled" is a bit test and the
//!   unscheduled jobs are enumerated with `zeroes()`.
//! - `makespan` and `sum_completion_times` are maintained incrementally on
//!   every `extended` call, never recomputed from scratch.
//! - `extended` is copy-extension: it returns a fresh schedule containing the
//!   parent plus exactly one more job, leaving the parent untouched.

use crate::error::{InconsistencyError, InconsistencyKind};
use capstan_core::num::SolverNumeric;
use capstan_model::{index::JobIndex, instance::Instance, solution::Solution};
use fixedbitset::FixedBitSet;

/// A sequence of jobs fixed at the front of the machine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartialSchedule<T> {
    scheduled: FixedBitSet,
    sequence: Vec<JobIndex>,
    start_times: Vec<T>,
    makespan: T,
    sum_completion_times: i64,
}

impl<T> PartialSchedule<T>
where
    T: SolverNumeric,
{
    /// Creates the empty schedule for an instance with `num_jobs` jobs.
    #[inline]
    pub fn empty(num_jobs: usize) -> Self {
        Self {
            scheduled: FixedBitSet::with_capacity(num_jobs),
            sequence: Vec::with_capacity(num_jobs),
            start_times: vec![T::ZERO; num_jobs],
            makespan: T::ZERO,
            sum_completion_times: 0,
        }
    }

    /// Returns the number of jobs in the underlying instance.
    #[inline]
    pub fn num_jobs(&self) -> usize {
        self.start_times.len()
    }

    /// Returns the number of sequenced jobs, which is the node depth.
    #[inline]
    pub fn depth(&self) -> usize {
        self.sequence.len()
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.sequence.len() == self.start_times.len()
    }

    #[inline]
    pub fn is_scheduled(&self, job: JobIndex) -> bool {
        self.scheduled.contains(job.get())
    }

    /// Returns the sequenced jobs in processing order.
    #[inline]
    pub fn sequence(&self) -> &[JobIndex] {
        &self.sequence
    }

    /// Returns the start time of `job` if it is scheduled.
    #[inline]
    pub fn start_time(&self, job: JobIndex) -> Option<T> {
        if self.is_scheduled(job) {
            Some(self.start_times[job.get()])
        } else {
            None
        }
    }

    /// Returns the start times indexed by job. Entries of unscheduled jobs are zero.
    #[inline]
    pub fn start_times(&self) -> &[T] {
        &self.start_times
    }

    /// Returns the completion time of the last sequenced job (zero when empty).
    #[inline]
    pub fn makespan(&self) -> T {
        self.makespan
    }

    #[inline]
    pub fn sum_completion_times(&self) -> i64 {
        self.sum_completion_times
    }

    /// Returns an iterator over the jobs not yet sequenced, in index order.
    #[inline]
    pub fn unscheduled(&self) -> impl Iterator<Item = JobIndex> + '_ {
        self.scheduled.zeroes().map(JobIndex::new)
    }

    /// Returns a copy of this schedule with `job` appended at
    /// `max(makespan, release_time(job))`.
    pub fn extended(
        &self,
        instance: &Instance<T>,
        job: JobIndex,
    ) -> Result<Self, InconsistencyError> {
        if self.is_scheduled(job) {
            return Err(InconsistencyError::for_job(
                InconsistencyKind::JobScheduledTwice,
                job,
            ));
        }

        let start = self.makespan.max(instance.release_time(job));
        let completion = start
            .checked_add_val(instance.processing_time(job))
            .ok_or_else(InconsistencyError::overflow)?;
        let sum_completion_times = self
            .sum_completion_times
            .checked_add(completion.into())
            .ok_or_else(InconsistencyError::overflow)?;

        let mut child = self.clone();
        child.scheduled.insert(job.get());
        child.sequence.push(job);
        child.start_times[job.get()] = start;
        child.makespan = completion;
        child.sum_completion_times = sum_completion_times;
        Ok(child)
    }

    /// Converts a complete schedule into a `Solution`.
    /// Returns `None` if jobs are still missing or a completion time overflows.
    pub fn to_solution(&self, instance: &Instance<T>) -> Option<Solution<T>> {
        if !self.is_complete() {
            return None;
        }
        Solution::from_start_times(instance, self.start_times.clone())
    }
}

impl<T> std::fmt::Display for PartialSchedule<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PartialSchedule([")?;
        for (i, job) in self.sequence.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}@{}", job.get() + 1, self.start_times[job.get()])?;
        }
        write!(
            f,
            "], makespan: {}, sum: {})",
            self.makespan, self.sum_completion_times
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capstan_model::instance::InstanceBuilder;

    type IntegerType = i64;

    fn ji(i: usize) -> JobIndex {
        JobIndex::new(i)
    }

    fn instance() -> Instance<IntegerType> {
        InstanceBuilder::new()
            .with_job(2, 0)
            .with_job(1, 5)
            .with_job(3, 1)
            .build()
    }

    #[test]
    fn test_empty_schedule() {
        let p = PartialSchedule::<IntegerType>::empty(3);
        assert_eq!(p.depth(), 0);
        assert_eq!(p.makespan(), 0);
        assert_eq!(p.sum_completion_times(), 0);
        assert!(!p.is_complete());
        assert_eq!(
            p.unscheduled().collect::<Vec<_>>(),
            vec![ji(0), ji(1), ji(2)]
        );
    }

    #[test]
    fn test_extension_maintains_makespan_and_sum() {
        let inst = instance();
        let root = PartialSchedule::empty(3);

        let a = root.extended(&inst, ji(1)).unwrap();
        assert_eq!(a.start_time(ji(1)), Some(5));
        assert_eq!(a.makespan(), 6);
        assert_eq!(a.sum_completion_times(), 6);

        let b = a.extended(&inst, ji(0)).unwrap();
        assert_eq!(b.start_time(ji(0)), Some(6));
        assert_eq!(b.makespan(), 8);
        assert_eq!(b.sum_completion_times(), 14);
        assert_eq!(b.sequence(), &[ji(1), ji(0)]);
        assert_eq!(b.unscheduled().collect::<Vec<_>>(), vec![ji(2)]);

        // The parent is untouched by extension.
        assert_eq!(a.depth(), 1);
        assert!(!a.is_scheduled(ji(0)));
        assert_eq!(root.depth(), 0);
    }

    #[test]
    fn test_extension_rejects_duplicate_job() {
        let inst = instance();
        let p = PartialSchedule::empty(3).extended(&inst, ji(0)).unwrap();
        let err = p.extended(&inst, ji(0)).unwrap_err();
        assert_eq!(err.kind(), InconsistencyKind::JobScheduledTwice);
        assert_eq!(err.job(), Some(ji(0)));
    }

    #[test]
    fn test_extension_detects_overflow() {
        let inst: Instance<IntegerType> = vec![(IntegerType::MAX, 0), (1, 0)].into();
        let p = PartialSchedule::empty(2).extended(&inst, ji(0)).unwrap();
        let err = p.extended(&inst, ji(1)).unwrap_err();
        assert_eq!(err.kind(), InconsistencyKind::ArithmeticOverflow);
    }

    #[test]
    fn test_to_solution_only_when_complete() {
        let inst = instance();
        let p = PartialSchedule::empty(3)
            .extended(&inst, ji(0))
            .unwrap()
            .extended(&inst, ji(2))
            .unwrap();
        assert!(p.to_solution(&inst).is_none());

        let full = p.extended(&inst, ji(1)).unwrap();
        let sol = full.to_solution(&inst).unwrap();
        assert_eq!(sol.objective_value(), full.sum_completion_times());
        assert_eq!(sol.objective_value(), 2 + 5 + 6);
        assert!(sol.validate(&inst).is_ok());
    }

    #[test]
    fn test_display() {
        let inst = instance();
        let p = PartialSchedule::empty(3).extended(&inst, ji(2)).unwrap();
        assert_eq!(format!("{}", p), "PartialSchedule([3@1], makespan: 4, sum: 4)");
    }
}
