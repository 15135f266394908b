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

//! Search tree nodes and their best-first priority.
//!
//! A `TreeNode` owns its `PartialSchedule` outright; children are built by
//! copy-extension, so a node can move to any worker without aliasing.
//! The lower bound starts at the `-1` sentinel and is filled in by
//! `TreeNode::evaluate`.
//!
//! `Ord` encodes the frontier priority for a max-heap: the node with the
//! smallest lower bound is the greatest; ties prefer the deeper node, then the
//! node created first.

use crate::{
    error::InconsistencyError,
    partial::PartialSchedule,
    relaxation::{PreemptiveBoundEngine, Relaxation},
};
use capstan_core::num::{SolverNumeric, constants::MinusOne};
use capstan_model::instance::Instance;
use std::cmp::Ordering;

const UNEVALUATED: i64 = i64::MINUS_ONE;

#[derive(Clone, Debug)]
pub struct TreeNode<T> {
    partial: PartialSchedule<T>,
    lower_bound: i64,
    preemptive: bool,
    sequence_number: u64,
}

impl<T> TreeNode<T>
where
    T: SolverNumeric,
{
    /// Creates the root node (empty sequence, depth 0).
    #[inline]
    pub fn root(num_jobs: usize) -> Self {
        Self::new(PartialSchedule::empty(num_jobs), 0)
    }

    /// Creates an unevaluated node. `sequence_number` breaks priority ties
    /// and should be unique per search.
    #[inline]
    pub fn new(partial: PartialSchedule<T>, sequence_number: u64) -> Self {
        Self {
            partial,
            lower_bound: UNEVALUATED,
            preemptive: true,
            sequence_number,
        }
    }

    /// Runs the relaxation, stores its bound and returns it.
    pub fn evaluate(
        &mut self,
        engine: &mut PreemptiveBoundEngine,
        instance: &Instance<T>,
    ) -> Result<Relaxation<T>, InconsistencyError> {
        let relaxation = engine.evaluate(instance, &self.partial)?;
        self.lower_bound = relaxation.lower_bound();
        self.preemptive = relaxation.is_preemptive();
        Ok(relaxation)
    }

    #[inline]
    pub fn partial(&self) -> &PartialSchedule<T> {
        &self.partial
    }

    /// Returns the lower bound, or `None` before `evaluate` ran.
    #[inline]
    pub fn lower_bound(&self) -> Option<i64> {
        (self.lower_bound != UNEVALUATED).then_some(self.lower_bound)
    }

    #[inline]
    pub fn is_evaluated(&self) -> bool {
        self.lower_bound != UNEVALUATED
    }

    /// Returns `false` if the last evaluation found a non-preemptive relaxation.
    #[inline]
    pub fn is_relaxation_preemptive(&self) -> bool {
        self.preemptive
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.partial.depth()
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.partial.is_complete()
    }

    #[inline]
    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }
}

impl<T> PartialEq for TreeNode<T>
where
    T: SolverNumeric,
{
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for TreeNode<T> where T: SolverNumeric {}

impl<T> PartialOrd for TreeNode<T>
where
    T: SolverNumeric,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for TreeNode<T>
where
    T: SolverNumeric,
{
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .lower_bound
            .cmp(&self.lower_bound)
            .then_with(|| self.depth().cmp(&other.depth()))
            .then_with(|| other.sequence_number.cmp(&self.sequence_number))
    }
}

impl<T> std::fmt::Display for TreeNode<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TreeNode(depth: {}, lower_bound: {}, preemptive: {}, seq: {})",
            self.depth(),
            self.lower_bound,
            self.preemptive,
            self.sequence_number
        )
    }
}
