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

//! # Preemptive SRPT Relaxation
//!
//! Lower bounds for `1 | r_j | Σ C_j` come from the preemptive relaxation
//! `1 | r_j, pmtn | Σ C_j`, which the shortest-remaining-processing-time rule
//! solves exactly. Given a partial schedule, `PreemptiveBoundEngine` simulates
//! SRPT on the jobs that are not yet sequenced, starting at the partial
//! schedule's makespan, and adds their completion times to the completion
//! times already fixed.
//!
//! ## Algorithm
//!
//! The simulation is event driven. Jobs wait in a min-heap keyed by
//! `(release, index)` until the clock reaches their release time, then move
//! into a min-heap keyed by `(remaining, index)`. The shortest job runs until
//! it finishes or the next release happens, whichever comes first; when the
//! ready heap is empty the clock jumps to the next release.
//!
//! ## Non-preemptive detection
//!
//! A job that was interrupted finishes more than `p_j` after it first started.
//! If no job was interrupted the simulated schedule is itself feasible for the
//! original problem, so its value is both a lower bound and an upper bound for
//! the subtree. The engine then returns the complete start times alongside the
//! bound (`Relaxation::NonPreemptive`).
//!
//! ## Numerics
//!
//! The clock, remaining times and the bound are `i64` regardless of `T`, with
//! checked arithmetic throughout.

use crate::{
    error::{InconsistencyError, InconsistencyKind},
    partial::PartialSchedule,
};
use capstan_core::num::SolverNumeric;
use capstan_model::{index::JobIndex, instance::Instance};
use std::{cmp::Reverse, collections::BinaryHeap};

/// The result of evaluating the relaxation for one partial schedule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Relaxation<T> {
    /// At least one job was preempted; only the bound is meaningful.
    Preemptive { lower_bound: i64 },
    /// No job was preempted; `start_times` (indexed by job) is a complete
    /// feasible schedule whose objective equals `lower_bound`.
    NonPreemptive { lower_bound: i64, start_times: Vec<T> },
}

impl<T> Relaxation<T> {
    #[inline]
    pub fn lower_bound(&self) -> i64 {
        match self {
            Self::Preemptive { lower_bound } | Self::NonPreemptive { lower_bound, .. } => {
                *lower_bound
            }
        }
    }

    #[inline]
    pub fn is_preemptive(&self) -> bool {
        matches!(self, Self::Preemptive { .. })
    }
}

/// The simulation state of a job that is not yet sequenced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct RunningJob {
    remaining: i64,
    first_start: Option<i64>,
    completion: Option<i64>,
}

impl RunningJob {
    #[inline]
    fn new(processing_time: i64) -> Self {
        Self {
            remaining: processing_time,
            first_start: None,
            completion: None,
        }
    }

    /// Returns the start time of a job the simulation ran to completion.
    #[inline]
    fn finished_start(&self, job: JobIndex) -> Result<i64, InconsistencyError> {
        match (self.first_start, self.completion) {
            (Some(first_start), Some(_)) => Ok(first_start),
            _ => Err(InconsistencyError::for_job(
                InconsistencyKind::UnfinishedJob,
                job,
            )),
        }
    }
}

/// Evaluates the SRPT relaxation.
///
/// The engine owns its scratch buffers and reuses them between evaluations,
/// so each search worker keeps one engine for the whole run.
#[derive(Clone, Debug, Default)]
pub struct PreemptiveBoundEngine {
    pending: BinaryHeap<Reverse<(i64, usize)>>,
    ready: BinaryHeap<Reverse<(i64, usize)>>,
    running: Vec<Option<RunningJob>>,
}

impl PreemptiveBoundEngine {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with scratch space for `num_jobs` jobs.
    #[inline]
    pub fn preallocated(num_jobs: usize) -> Self {
        Self {
            pending: BinaryHeap::with_capacity(num_jobs),
            ready: BinaryHeap::with_capacity(num_jobs),
            running: Vec::with_capacity(num_jobs),
        }
    }

    /// Computes the relaxation bound for every completion of `partial`.
    pub fn evaluate<T>(
        &mut self,
        instance: &Instance<T>,
        partial: &PartialSchedule<T>,
    ) -> Result<Relaxation<T>, InconsistencyError>
    where
        T: SolverNumeric,
    {
        self.pending.clear();
        self.ready.clear();
        self.running.clear();
        self.running.resize(instance.num_jobs(), None);

        for job in partial.unscheduled() {
            let release: i64 = instance.release_time(job).into();
            self.running[job.get()] = Some(RunningJob::new(instance.processing_time(job).into()));
            self.pending.push(Reverse((release, job.get())));
        }

        let mut lower_bound = partial.sum_completion_times();
        let mut clock: i64 = partial.makespan().into();
        let mut preempted = false;

        loop {
            while let Some(&Reverse((release, job))) = self.pending.peek() {
                if release > clock {
                    break;
                }
                self.pending.pop();
                let remaining = self.state(job)?.remaining;
                self.ready.push(Reverse((remaining, job)));
            }

            let next_release = self.pending.peek().map(|&Reverse((release, _))| release);

            let Some(Reverse((remaining, job))) = self.ready.pop() else {
                match next_release {
                    Some(release) => {
                        clock = release;
                        continue;
                    }
                    None => break,
                }
            };

            let run_for = match next_release {
                Some(release) => remaining.min(release - clock),
                None => remaining,
            };
            let left = remaining - run_for;
            if left < 0 || run_for <= 0 {
                return Err(InconsistencyError::for_job(
                    InconsistencyKind::NegativeRemainingTime,
                    JobIndex::new(job),
                ));
            }

            let start = clock;
            clock = clock
                .checked_add(run_for)
                .ok_or_else(InconsistencyError::overflow)?;

            let state = self.state_mut(job)?;
            state.first_start.get_or_insert(start);
            state.remaining = left;

            if left > 0 {
                self.ready.push(Reverse((left, job)));
                continue;
            }

            state.completion = Some(clock);
            let first_start = state.first_start.unwrap_or(start);
            let processing_time: i64 = instance.processing_time(JobIndex::new(job)).into();
            if clock - first_start != processing_time {
                preempted = true;
            }
            lower_bound = lower_bound
                .checked_add(clock)
                .ok_or_else(InconsistencyError::overflow)?;
        }

        if preempted {
            return Ok(Relaxation::Preemptive { lower_bound });
        }

        let mut start_times = partial.start_times().to_vec();
        for job in partial.unscheduled() {
            let first_start = self.state(job.get())?.finished_start(job)?;
            start_times[job.get()] =
                T::from_i64(first_start).ok_or_else(InconsistencyError::overflow)?;
        }

        Ok(Relaxation::NonPreemptive {
            lower_bound,
            start_times,
        })
    }

    #[inline]
    fn state(&self, job: usize) -> Result<&RunningJob, InconsistencyError> {
        self.running[job].as_ref().ok_or(InconsistencyError::for_job(
            InconsistencyKind::JobScheduledTwice,
            JobIndex::new(job),
        ))
    }

    #[inline]
    fn state_mut(&mut self, job: usize) -> Result<&mut RunningJob, InconsistencyError> {
        self.running[job].as_mut().ok_or(InconsistencyError::for_job(
            InconsistencyKind::JobScheduledTwice,
            JobIndex::new(job),
        ))
    }
}
