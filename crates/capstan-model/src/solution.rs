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

//! # Schedules
//!
//! A `Solution<T>` is a complete non-preemptive schedule: one start time and one
//! completion time per job, stored as parallel arrays indexed by `JobIndex`,
//! plus the sum of completion times as objective value. The objective is an
//! `i64` regardless of `T`, so summing many `i32` times cannot overflow the
//! time type.
//!
//! `Solution::validate` re-checks feasibility against an instance: every job is
//! scheduled exactly once, never before its release time, runs for exactly its
//! processing time and never overlaps another job on the single machine.

use crate::{index::JobIndex, instance::Instance};
use num_traits::{PrimInt, Signed};

/// A feasibility violation found by `Solution::validate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleViolation {
    /// The schedule covers a different number of jobs than the instance.
    JobCountMismatch { expected: usize, actual: usize },
    /// The job starts before it is released.
    StartBeforeRelease { job: JobIndex },
    /// The completion time is not the start time plus the processing time.
    CompletionMismatch { job: JobIndex },
    /// `second` starts before `first` completes.
    Overlap { first: JobIndex, second: JobIndex },
    /// The stored objective differs from the recomputed sum of completion times.
    ObjectiveMismatch { stored: i64, actual: i64 },
}

impl std::fmt::Display for ScheduleViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::JobCountMismatch { expected, actual } => write!(
                f,
                "Schedule covers {} jobs, instance has {}",
                actual, expected
            ),
            Self::StartBeforeRelease { job } => {
                write!(f, "Job {} starts before its release time", job.get() + 1)
            }
            Self::CompletionMismatch { job } => write!(
                f,
                "Job {} does not complete exactly one processing time after its start",
                job.get() + 1
            ),
            Self::Overlap { first, second } => write!(
                f,
                "Job {} starts before job {} completes",
                second.get() + 1,
                first.get() + 1
            ),
            Self::ObjectiveMismatch { stored, actual } => write!(
                f,
                "Stored objective {} differs from sum of completion times {}",
                stored, actual
            ),
        }
    }
}

impl std::error::Error for ScheduleViolation {}

/// A complete schedule of all jobs of an instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution<T> {
    objective_value: i64,
    start_times: Vec<T>,
    completion_times: Vec<T>,
}

impl<T> Solution<T>
where
    T: PrimInt + Signed + Into<i64>,
{
    /// Creates a new solution.
    ///
    /// # Panics
    ///
    /// Panics if `start_times` and `completion_times` differ in length.
    #[inline]
    pub fn new(objective_value: i64, start_times: Vec<T>, completion_times: Vec<T>) -> Self {
        assert_eq!(
            start_times.len(),
            completion_times.len(),
            "called `Solution::new` with {} start times but {} completion times",
            start_times.len(),
            completion_times.len()
        );

        Self {
            objective_value,
            start_times,
            completion_times,
        }
    }

    /// Builds a solution from per-job start times, deriving completion times and
    /// the objective from the instance. Returns `None` if the lengths disagree
    /// or a completion time or the objective overflows.
    pub fn from_start_times(instance: &Instance<T>, start_times: Vec<T>) -> Option<Self> {
        if start_times.len() != instance.num_jobs() {
            return None;
        }

        let mut completion_times = Vec::with_capacity(start_times.len());
        let mut objective_value = 0i64;
        for (job, &start) in instance.jobs().iter().zip(start_times.iter()) {
            let completion = start.checked_add(&job.processing_time())?;
            objective_value = objective_value.checked_add(completion.into())?;
            completion_times.push(completion);
        }

        Some(Self {
            objective_value,
            start_times,
            completion_times,
        })
    }

    /// Returns the sum of completion times.
    #[inline]
    pub fn objective_value(&self) -> i64 {
        self.objective_value
    }

    /// Returns the number of scheduled jobs.
    #[inline]
    pub fn num_jobs(&self) -> usize {
        self.start_times.len()
    }

    /// Returns the start time of the job at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn start_time(&self, index: JobIndex) -> T {
        let i = index.get();
        debug_assert!(
            i < self.start_times.len(),
            "called `Solution::start_time` with index out of bounds: the len is {} but the index is {}",
            self.start_times.len(),
            i
        );
        self.start_times[i]
    }

    /// Returns the completion time of the job at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn completion_time(&self, index: JobIndex) -> T {
        self.completion_times[index.get()]
    }

    #[inline]
    pub fn start_times(&self) -> &[T] {
        &self.start_times
    }

    #[inline]
    pub fn completion_times(&self) -> &[T] {
        &self.completion_times
    }

    /// Returns the time the last job completes, or `None` if no job is scheduled.
    #[inline]
    pub fn makespan(&self) -> Option<T> {
        self.completion_times.iter().copied().max()
    }

    /// Returns the job indices in processing order (by start time, ties by index).
    pub fn sequence(&self) -> Vec<JobIndex> {
        let mut order: Vec<JobIndex> = (0..self.start_times.len()).map(JobIndex::new).collect();
        order.sort_by_key(|&j| (self.start_times[j.get()], j));
        order
    }

    /// Checks that this solution is a feasible non-preemptive schedule of
    /// `instance` and that the stored objective is exact.
    pub fn validate(&self, instance: &Instance<T>) -> Result<(), ScheduleViolation> {
        if self.num_jobs() != instance.num_jobs() {
            return Err(ScheduleViolation::JobCountMismatch {
                expected: instance.num_jobs(),
                actual: self.num_jobs(),
            });
        }

        let mut actual = 0i64;
        for job in instance.job_indices() {
            let start = self.start_time(job);
            if start < instance.release_time(job) {
                return Err(ScheduleViolation::StartBeforeRelease { job });
            }
            let completion = self.completion_time(job);
            if start.checked_add(&instance.processing_time(job)) != Some(completion) {
                return Err(ScheduleViolation::CompletionMismatch { job });
            }
            actual = actual.saturating_add(completion.into());
        }

        let order = self.sequence();
        for pair in order.windows(2) {
            let (first, second) = (pair[0], pair[1]);
            if self.start_time(second) < self.completion_time(first) {
                return Err(ScheduleViolation::Overlap { first, second });
            }
        }

        if actual != self.objective_value {
            return Err(ScheduleViolation::ObjectiveMismatch {
                stored: self.objective_value,
                actual,
            });
        }

        Ok(())
    }
}

impl<T> std::fmt::Display for Solution<T>
where
    T: PrimInt + Signed + Into<i64> + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution Summary")?;
        writeln!(f, "   Sum of Completion Times: {}", self.objective_value)?;
        writeln!(f)?;

        if self.num_jobs() == 0 {
            writeln!(f, "   (No jobs scheduled)")?;
            return Ok(());
        }

        writeln!(
            f,
            "   {:<10} | {:<12} | {:<15}",
            "Job", "Start Time", "Completion Time"
        )?;
        writeln!(f, "   {:-<10}-+-{:-<12}-+-{:-<15}", "", "", "")?;
        for job in self.sequence() {
            writeln!(
                f,
                "   {:<10} | {:<12} | {:<15}",
                job.get() + 1,
                self.start_time(job),
                self.completion_time(job)
            )?;
        }

        Ok(())
    }
}
