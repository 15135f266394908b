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

//! Fan-out monitor
//!
//! `CompositeMonitor` forwards every event to its children in insertion
//! order. `search_command` short-circuits on the first non-`Continue`
//! response, so put stricter stop conditions first.

use crate::{
    monitor::search_monitor::{PruneReason, SearchCommand, SearchMonitor},
    node::TreeNode,
    stats::BnbSolverStatistics,
};
use capstan_core::num::SolverNumeric;
use capstan_model::{instance::Instance, solution::Solution};

pub struct CompositeMonitor<'a, T>
where
    T: SolverNumeric,
{
    monitors: Vec<Box<dyn SearchMonitor<T> + 'a>>,
}

impl<'a, T> Default for CompositeMonitor<'a, T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> std::fmt::Debug for CompositeMonitor<'a, T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.monitors.iter()).finish()
    }
}

impl<'a, T> CompositeMonitor<'a, T>
where
    T: SolverNumeric,
{
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    #[inline(always)]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            monitors: Vec::with_capacity(capacity),
        }
    }

    #[inline(always)]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: SearchMonitor<T> + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    #[inline(always)]
    pub fn add_monitor_boxed(&mut self, monitor: Box<dyn SearchMonitor<T> + 'a>) {
        self.monitors.push(monitor);
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl<'a, T> FromIterator<Box<dyn SearchMonitor<T> + 'a>> for CompositeMonitor<'a, T>
where
    T: SolverNumeric,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn SearchMonitor<T> + 'a>>,
    {
        Self {
            monitors: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> SearchMonitor<T> for CompositeMonitor<'a, T>
where
    T: SolverNumeric,
{
    #[inline(always)]
    fn name(&self) -> &str {
        "CompositeMonitor"
    }

    fn on_enter_search(&mut self, instance: &Instance<T>, statistics: &BnbSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_enter_search(instance, statistics);
        }
    }

    fn on_node_expanded(&mut self, node: &TreeNode<T>, statistics: &BnbSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_node_expanded(node, statistics);
        }
    }

    fn on_prune(&mut self, depth: usize, reason: PruneReason, statistics: &BnbSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_prune(depth, reason, statistics);
        }
    }

    fn on_solution_found(&mut self, solution: &Solution<T>, statistics: &BnbSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_solution_found(solution, statistics);
        }
    }

    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_exit_search(statistics);
        }
    }

    fn search_command(&mut self, statistics: &BnbSolverStatistics) -> SearchCommand {
        for monitor in &mut self.monitors {
            let command = monitor.search_command(statistics);
            if !matches!(command, SearchCommand::Continue) {
                return command;
            }
        }
        SearchCommand::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::TerminationReason;
    use std::{cell::Cell, rc::Rc};

    type IntegerType = i64;

    struct Recording {
        name: &'static str,
        prunes: Rc<Cell<usize>>,
        polls: Rc<Cell<usize>>,
        command: SearchCommand,
    }

    impl SearchMonitor<IntegerType> for Recording {
        fn name(&self) -> &str {
            self.name
        }
        fn on_enter_search(&mut self, _: &Instance<IntegerType>, _: &BnbSolverStatistics) {}
        fn on_node_expanded(&mut self, _: &TreeNode<IntegerType>, _: &BnbSolverStatistics) {}
        fn on_prune(&mut self, _: usize, _: PruneReason, _: &BnbSolverStatistics) {
            self.prunes.set(self.prunes.get() + 1);
        }
        fn on_solution_found(&mut self, _: &Solution<IntegerType>, _: &BnbSolverStatistics) {}
        fn on_exit_search(&mut self, _: &BnbSolverStatistics) {}
        fn search_command(&mut self, _: &BnbSolverStatistics) -> SearchCommand {
            self.polls.set(self.polls.get() + 1);
            self.command.clone()
        }
    }

    fn recording(
        name: &'static str,
        command: SearchCommand,
    ) -> (Recording, Rc<Cell<usize>>, Rc<Cell<usize>>) {
        let prunes = Rc::new(Cell::new(0));
        let polls = Rc::new(Cell::new(0));
        let monitor = Recording {
            name,
            prunes: Rc::clone(&prunes),
            polls: Rc::clone(&polls),
            command,
        };
        (monitor, prunes, polls)
    }

    #[test]
    fn test_events_fan_out_to_every_child() {
        let (a, a_prunes, _) = recording("a", SearchCommand::Continue);
        let (b, b_prunes, _) = recording("b", SearchCommand::Continue);
        let mut composite = CompositeMonitor::new();
        composite.add_monitor(a);
        composite.add_monitor(b);
        assert_eq!(composite.len(), 2);

        let stats = BnbSolverStatistics::default();
        composite.on_prune(2, PruneReason::Dominance, &stats);
        composite.on_prune(3, PruneReason::Bound, &stats);

        assert_eq!(a_prunes.get(), 2);
        assert_eq!(b_prunes.get(), 2);
        assert_eq!(composite.search_command(&stats), SearchCommand::Continue);
    }

    #[test]
    fn test_search_command_short_circuits() {
        let stop = SearchCommand::Terminate(TerminationReason::TimeLimitReached);
        let (a, _, a_polls) = recording("a", stop.clone());
        let (b, _, b_polls) = recording("b", SearchCommand::Continue);
        let mut composite: CompositeMonitor<'_, IntegerType> =
            vec![Box::new(a) as Box<dyn SearchMonitor<IntegerType>>, Box::new(b)]
                .into_iter()
                .collect();

        let stats = BnbSolverStatistics::default();
        assert_eq!(composite.search_command(&stats), stop);
        assert_eq!(a_polls.get(), 1);
        assert_eq!(b_polls.get(), 0);
    }

    #[test]
    fn test_empty_composite_continues() {
        let mut composite = CompositeMonitor::<IntegerType>::default();
        assert!(composite.is_empty());
        assert_eq!(
            composite.search_command(&BnbSolverStatistics::default()),
            SearchCommand::Continue
        );
    }
}
