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

//! # Shared Best-First Frontier
//!
//! The set of active nodes, shared by all workers. A `BinaryHeap` ordered by
//! `TreeNode`'s priority sits behind one `Mutex` together with the number of
//! nodes currently being expanded; a `Condvar` parks workers that find the
//! heap empty while other workers may still produce children.
//!
//! ## Protocol
//!
//! - `pop` hands out the best node and counts it as in flight.
//! - `complete` pushes the children of an in-flight node and releases it in
//!   one critical section, so the frontier can never look exhausted while
//!   children are on their way.
//! - An empty heap with no node in flight means the tree is exhausted; every
//!   parked worker is woken and receives `FrontierPop::Exhausted`.
//! - `stop` records the first termination reason and wakes everyone. Nodes
//!   still in flight are completed normally, so after all workers return the
//!   heap holds every unexplored node.

use crate::{node::TreeNode, result::TerminationReason};
use capstan_core::num::SolverNumeric;
use std::{
    collections::BinaryHeap,
    sync::{Condvar, Mutex, MutexGuard, PoisonError},
};

/// The answer to a `pop` request.
#[derive(Debug)]
pub enum FrontierPop<T> {
    /// A node to expand. The caller must hand it back with `complete`.
    Node(TreeNode<T>),
    /// No active node is left and none is in flight.
    Exhausted,
    /// The search was stopped.
    Stopped,
}

#[derive(Debug)]
struct FrontierState<T> {
    heap: BinaryHeap<TreeNode<T>>,
    in_flight: usize,
    stop_reason: Option<TerminationReason>,
}

#[derive(Debug)]
pub struct SharedFrontier<T> {
    state: Mutex<FrontierState<T>>,
    available: Condvar,
}

impl<T> SharedFrontier<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn new() -> Self {
        Self::from_nodes(std::iter::empty())
    }

    pub fn from_nodes<I>(nodes: I) -> Self
    where
        I: IntoIterator<Item = TreeNode<T>>,
    {
        Self {
            state: Mutex::new(FrontierState {
                heap: nodes.into_iter().collect(),
                in_flight: 0,
                stop_reason: None,
            }),
            available: Condvar::new(),
        }
    }

    #[inline]
    fn lock(&self) -> MutexGuard<'_, FrontierState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Blocks until a node is available, the tree is exhausted, or the
    /// search is stopped.
    pub fn pop(&self) -> FrontierPop<T> {
        let mut state = self.lock();
        loop {
            if state.stop_reason.is_some() {
                return FrontierPop::Stopped;
            }
            if let Some(node) = state.heap.pop() {
                state.in_flight += 1;
                return FrontierPop::Node(node);
            }
            if state.in_flight == 0 {
                self.available.notify_all();
                return FrontierPop::Exhausted;
            }
            state = self
                .available
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Pushes the children of a node obtained from `pop` and releases it.
    pub fn complete(&self, children: Vec<TreeNode<T>>) {
        let mut state = self.lock();
        let pushed = children.len();
        state.heap.extend(children);
        state.in_flight = state.in_flight.saturating_sub(1);

        if state.in_flight == 0 && state.heap.is_empty() {
            self.available.notify_all();
        } else if pushed == 1 {
            self.available.notify_one();
        } else if pushed > 1 {
            self.available.notify_all();
        }
    }

    /// Pushes nodes that were never popped.
    pub fn push_all(&self, nodes: Vec<TreeNode<T>>) {
        if nodes.is_empty() {
            return;
        }
        self.lock().heap.extend(nodes);
        self.available.notify_all();
    }

    /// Stops the search. The first reason wins; later calls only wake workers.
    pub fn stop(&self, reason: TerminationReason) {
        let mut state = self.lock();
        if state.stop_reason.is_none() {
            state.stop_reason = Some(reason);
        }
        drop(state);
        self.available.notify_all();
    }

    #[inline]
    pub fn stop_reason(&self) -> Option<TerminationReason> {
        self.lock().stop_reason.clone()
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.lock().stop_reason.is_some()
    }

    /// Number of active nodes waiting in the heap.
    #[inline]
    pub fn len(&self) -> usize {
        self.lock().heap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lock().heap.is_empty()
    }

    #[inline]
    pub fn in_flight(&self) -> usize {
        self.lock().in_flight
    }

    /// Smallest lower bound among waiting nodes that could still improve on
    /// `upper_bound`, or `None` if no such node is left.
    pub fn min_lower_bound_below(&self, upper_bound: i64) -> Option<i64> {
        self.lock()
            .heap
            .iter()
            .filter_map(TreeNode::lower_bound)
            .filter(|&lower_bound| lower_bound < upper_bound)
            .min()
    }
}

impl<T> Default for SharedFrontier<T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}
