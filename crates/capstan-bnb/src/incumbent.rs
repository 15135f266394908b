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

//! # Shared Incumbent
//!
//! The best complete schedule found so far, shared by every search worker.
//!
//! ## Motivation
//!
//! The upper bound and the schedule achieving it must never disagree. The
//! schedule carries its own objective and sits in a single
//! `Mutex<Option<Solution<T>>>`; an install replaces it with one assignment,
//! so a reader never sees a new bound paired with an old schedule.
//!
//! ## Highlights
//!
//! - `try_install` is the only way to change the incumbent. It compares
//!   against the value inside the lock and installs strictly better
//!   candidates only, so the upper bound is monotonically non-increasing.
//! - `upper_bound()` is a lock-free read of an `AtomicI64` mirror that is
//!   written while the lock is held (`Release`) and read with `Acquire`. The
//!   mirror can only lag towards larger values, so pruning against it is
//!   always safe.
//! - A poisoned lock is recovered: the stored pair is never half-written.

use capstan_core::num::SolverNumeric;
use capstan_model::solution::Solution;
use std::sync::{
    Mutex, PoisonError,
    atomic::{AtomicI64, Ordering},
};

#[derive(Debug)]
pub struct SharedIncumbent<T> {
    upper_bound: AtomicI64,
    best: Mutex<Option<Solution<T>>>,
}

impl<T> Default for SharedIncumbent<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Display for SharedIncumbent<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Incumbent(upper_bound: {})", self.upper_bound())
    }
}

impl<T> SharedIncumbent<T> {
    /// Creates an empty incumbent with upper bound `i64::MAX`.
    #[inline]
    pub fn new() -> Self {
        Self {
            upper_bound: AtomicI64::new(i64::MAX),
            best: Mutex::new(None),
        }
    }

    /// Returns the objective of the incumbent, `i64::MAX` if there is none.
    #[inline]
    pub fn upper_bound(&self) -> i64 {
        self.upper_bound.load(Ordering::Acquire)
    }

    /// Returns `true` if a schedule with `objective` would be installed.
    #[inline]
    pub fn improves(&self, objective: i64) -> bool {
        objective < self.upper_bound()
    }

    /// Returns a copy of the incumbent schedule, if any.
    #[inline]
    pub fn snapshot(&self) -> Option<Solution<T>>
    where
        T: Clone,
    {
        self.best
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl<T> SharedIncumbent<T>
where
    T: SolverNumeric,
{
    /// Creates an incumbent holding `solution`.
    #[inline]
    pub fn with_solution(solution: Solution<T>) -> Self {
        Self {
            upper_bound: AtomicI64::new(solution.objective_value()),
            best: Mutex::new(Some(solution)),
        }
    }

    /// Installs `candidate` if its objective is strictly below the current
    /// upper bound. Returns `true` if it was installed.
    pub fn try_install(&self, candidate: Solution<T>) -> bool {
        let objective = candidate.objective_value();
        if !self.improves(objective) {
            return false;
        }

        let mut guard = self.best.lock().unwrap_or_else(PoisonError::into_inner);
        // The mirror may be stale; decide against the locked value.
        if let Some(current) = guard.as_ref()
            && objective >= current.objective_value()
        {
            return false;
        }

        *guard = Some(candidate);
        self.upper_bound.store(objective, Ordering::Release);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    type IntegerType = i64;

    fn make_solution(objective: i64) -> Solution<IntegerType> {
        Solution::new(objective, vec![0, 1], vec![1, 2])
    }

    #[test]
    fn test_initial_state() {
        let inc = SharedIncumbent::<IntegerType>::new();
        assert_eq!(inc.upper_bound(), i64::MAX);
        assert!(inc.snapshot().is_none());
        assert!(inc.improves(i64::MAX - 1));
    }

    #[test]
    fn test_with_solution_sets_bound() {
        let inc = SharedIncumbent::with_solution(make_solution(42));
        assert_eq!(inc.upper_bound(), 42);
        assert_eq!(inc.snapshot().unwrap().objective_value(), 42);
        assert_eq!(format!("{}", inc), "Incumbent(upper_bound: 42)");
    }

    #[test]
    fn test_only_strict_improvements_are_installed() {
        let inc = SharedIncumbent::with_solution(make_solution(100));

        assert!(!inc.try_install(make_solution(150)));
        assert!(!inc.try_install(make_solution(100)));
        assert_eq!(inc.upper_bound(), 100);

        assert!(inc.try_install(make_solution(80)));
        assert_eq!(inc.upper_bound(), 80);
        assert_eq!(inc.snapshot().unwrap().objective_value(), 80);
    }

    #[test]
    fn test_concurrent_installs_minimum_wins() {
        let inc = Arc::new(SharedIncumbent::<IntegerType>::new());
        let objectives = vec![300, 200, 400, 50, 120, 75, 500, 60, 90];

        let handles: Vec<_> = objectives
            .iter()
            .map(|&obj| {
                let inc = Arc::clone(&inc);
                thread::spawn(move || inc.try_install(make_solution(obj)))
            })
            .collect();
        let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert!(results.iter().any(|&r| r));
        let min = *objectives.iter().min().unwrap();
        assert_eq!(inc.upper_bound(), min);
        assert_eq!(inc.snapshot().unwrap().objective_value(), min);
    }

    #[test]
    fn test_bound_and_snapshot_agree_under_contention() {
        let inc = Arc::new(SharedIncumbent::<IntegerType>::new());
        thread::scope(|scope| {
            for t in 0..4i64 {
                let inc = &inc;
                scope.spawn(move || {
                    for k in (0..200i64).rev() {
                        inc.try_install(make_solution(k * 4 + t));
                    }
                });
            }
        });
        let snapshot = inc.snapshot().unwrap();
        assert_eq!(snapshot.objective_value(), 0);
        assert_eq!(inc.upper_bound(), snapshot.objective_value());
    }
}
