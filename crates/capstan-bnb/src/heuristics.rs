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

//! # Dispatch Heuristics
//!
//! Constructive schedules that seed the initial upper bound before the tree
//! search starts. Each `DispatchRule` fixes an order; the order is then
//! timetabled non-preemptively with `start = max(current_time, release)`.
//!
//! | Rule                    | Order                                                         |
//! |-------------------------|---------------------------------------------------------------|
//! | `InstanceOrder`         | job index                                                     |
//! | `ReleaseTime`           | non-decreasing release time                                   |
//! | `ProcessingTime`        | non-decreasing processing time                                |
//! | `ReleaseThenProcessing` | non-delay: shortest released job whenever the machine is free |
//!
//! All sorts are stable with the job index as final tie-break, so the seed
//! is deterministic.

use crate::error::InconsistencyError;
use capstan_core::num::SolverNumeric;
use capstan_model::{index::JobIndex, instance::Instance, solution::Solution};
use std::{cmp::Reverse, collections::BinaryHeap};

/// A static dispatch order used to build a seed schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DispatchRule {
    InstanceOrder,
    ReleaseTime,
    ProcessingTime,
    ReleaseThenProcessing,
}

impl DispatchRule {
    /// Every rule, in the order the seeder tries them.
    pub const ALL: [DispatchRule; 4] = [
        DispatchRule::InstanceOrder,
        DispatchRule::ReleaseTime,
        DispatchRule::ProcessingTime,
        DispatchRule::ReleaseThenProcessing,
    ];

    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::InstanceOrder => "InstanceOrder",
            Self::ReleaseTime => "ReleaseTime",
            Self::ProcessingTime => "ProcessingTime",
            Self::ReleaseThenProcessing => "ReleaseThenProcessing",
        }
    }

    /// Returns the processing order this rule produces for `instance`.
    pub fn sequence<T>(&self, instance: &Instance<T>) -> Vec<JobIndex>
    where
        T: SolverNumeric,
    {
        let mut order: Vec<JobIndex> = instance.job_indices().collect();
        match self {
            Self::InstanceOrder => {}
            Self::ReleaseTime => order.sort_by_key(|&j| (instance.release_time(j), j)),
            Self::ProcessingTime => order.sort_by_key(|&j| (instance.processing_time(j), j)),
            Self::ReleaseThenProcessing => order = non_delay_shortest_first(instance),
        }
        order
    }
}

impl std::fmt::Display for DispatchRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Non-delay shortest processing time: whenever the machine becomes free,
/// the shortest job released by then runs next. An idle machine waits for the
/// next release.
fn non_delay_shortest_first<T>(instance: &Instance<T>) -> Vec<JobIndex>
where
    T: SolverNumeric,
{
    let mut pending: BinaryHeap<Reverse<(T, JobIndex)>> = instance
        .job_indices()
        .map(|j| Reverse((instance.release_time(j), j)))
        .collect();
    let mut ready: BinaryHeap<Reverse<(T, JobIndex)>> = BinaryHeap::new();
    let mut order = Vec::with_capacity(instance.num_jobs());
    let mut current_time = T::ZERO;

    loop {
        while let Some(&Reverse((release, job))) = pending.peek() {
            if release > current_time {
                break;
            }
            pending.pop();
            ready.push(Reverse((instance.processing_time(job), job)));
        }

        match ready.pop() {
            Some(Reverse((processing_time, job))) => {
                order.push(job);
                current_time = current_time.saturating_add_val(processing_time);
            }
            None => match pending.peek() {
                Some(&Reverse((release, _))) => current_time = release,
                None => break,
            },
        }
    }

    order
}

/// Builds the dispatch schedules and picks the best one.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicSeeder;

impl HeuristicSeeder {
    /// Timetables `sequence` non-preemptively. Jobs not in `sequence` are not
    /// scheduled, so callers pass a permutation of all jobs.
    pub fn schedule_sequence<T>(
        instance: &Instance<T>,
        sequence: &[JobIndex],
    ) -> Result<Solution<T>, InconsistencyError>
    where
        T: SolverNumeric,
    {
        let mut start_times = vec![T::ZERO; instance.num_jobs()];
        let mut current_time = T::ZERO;
        for &job in sequence {
            let start = current_time.max(instance.release_time(job));
            start_times[job.get()] = start;
            current_time = start
                .checked_add_val(instance.processing_time(job))
                .ok_or_else(InconsistencyError::overflow)?;
        }
        Solution::from_start_times(instance, start_times).ok_or_else(InconsistencyError::overflow)
    }

    /// Builds the schedule of a single rule.
    #[inline]
    pub fn schedule<T>(
        instance: &Instance<T>,
        rule: DispatchRule,
    ) -> Result<Solution<T>, InconsistencyError>
    where
        T: SolverNumeric,
    {
        Self::schedule_sequence(instance, &rule.sequence(instance))
    }

    /// Returns the rule with the smallest sum of completion times and its
    /// schedule. Ties keep the earlier rule of `DispatchRule::ALL`. An empty
    /// instance yields the zero-cost empty schedule.
    pub fn best<T>(
        instance: &Instance<T>,
    ) -> Result<(DispatchRule, Solution<T>), InconsistencyError>
    where
        T: SolverNumeric,
    {
        let mut best: Option<(DispatchRule, Solution<T>)> = None;
        for rule in DispatchRule::ALL {
            let candidate = Self::schedule(instance, rule)?;
            tracing::trace!(
                rule = rule.name(),
                objective = candidate.objective_value(),
                "dispatch schedule built"
            );
            let improves = match &best {
                Some((_, incumbent)) => candidate.objective_value() < incumbent.objective_value(),
                None => true,
            };
            if improves {
                best = Some((rule, candidate));
            }
        }

        Ok(best.unwrap_or_else(|| {
            (
                DispatchRule::InstanceOrder,
                Solution::new(0, Vec::new(), Vec::new()),
            )
        }))
    }
}
