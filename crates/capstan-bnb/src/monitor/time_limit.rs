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
    monitor::search_monitor::{PruneReason, SearchCommand, SearchMonitor},
    node::TreeNode,
    result::TerminationReason,
    stats::BnbSolverStatistics,
};
use capstan_core::num::{SolverNumeric, ops::SaturatingAddVal};
use capstan_model::{instance::Instance, solution::Solution};
use std::marker::PhantomData;
use std::time::{Duration, Instant};

/// A monitor that terminates the search once a deadline has passed.
///
/// Workers of one solve share the same deadline so they agree on when the
/// budget is spent. The clock is read only every `clock_check_mask + 1`
/// polls.
#[derive(Debug, Clone)]
pub struct TimeLimitMonitor<T> {
    time_limit: Duration,
    deadline: Option<Instant>,
    clock_check_mask: u64,
    polls: u64,
    _marker: PhantomData<T>,
}

impl<T> TimeLimitMonitor<T> {
    /// Creates a monitor whose budget starts at `on_enter_search`.
    pub fn new(time_limit: Duration, clock_check_mask: u64) -> Self {
        Self {
            time_limit,
            deadline: None,
            clock_check_mask,
            polls: 0,
            _marker: PhantomData,
        }
    }

    /// Creates a monitor with a fixed deadline.
    pub fn with_deadline(deadline: Instant, clock_check_mask: u64) -> Self {
        Self {
            time_limit: deadline.saturating_duration_since(Instant::now()),
            deadline: Some(deadline),
            clock_check_mask,
            polls: 0,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

impl<T> SearchMonitor<T> for TimeLimitMonitor<T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn on_enter_search(&mut self, _instance: &Instance<T>, _statistics: &BnbSolverStatistics) {
        if self.deadline.is_none() {
            self.deadline = Instant::now().checked_add(self.time_limit);
        }
        self.polls = 0;
    }

    fn on_node_expanded(&mut self, _node: &TreeNode<T>, _statistics: &BnbSolverStatistics) {}
    fn on_prune(&mut self, _depth: usize, _reason: PruneReason, _statistics: &BnbSolverStatistics) {
    }
    fn on_solution_found(&mut self, _solution: &Solution<T>, _statistics: &BnbSolverStatistics) {}
    fn on_exit_search(&mut self, _statistics: &BnbSolverStatistics) {}

    fn search_command(&mut self, _statistics: &BnbSolverStatistics) -> SearchCommand {
        let polls = self.polls;
        self.polls = self.polls.saturating_add_val(1);

        if polls & self.clock_check_mask == 0
            && let Some(deadline) = self.deadline
            && Instant::now() >= deadline
        {
            return SearchCommand::Terminate(TerminationReason::TimeLimitReached);
        }

        SearchCommand::Continue
    }
}
