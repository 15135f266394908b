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

//! Outcomes of a branch-and-bound run.
//!
//! A successful run always carries a schedule: the dispatch heuristics seed
//! the incumbent before the search starts. What differs is the proof.
//! `SolverResult::Optimal` comes with `TerminationReason::OptimalityProven`;
//! a run stopped by a time limit or an interrupt returns
//! `SolverResult::Feasible` together with the smallest lower bound still
//! open in the frontier, from which `gap` is derived.

use crate::stats::BnbSolverStatistics;
use capstan_core::num::SolverNumeric;
use capstan_model::solution::Solution;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverResult<T> {
    /// The search space was exhausted; the schedule is optimal.
    Optimal(Solution<T>),
    /// The search stopped early; the schedule is the best one found.
    Feasible(Solution<T>),
}

impl<T> SolverResult<T> {
    #[inline]
    pub fn solution(&self) -> &Solution<T> {
        match self {
            Self::Optimal(solution) | Self::Feasible(solution) => solution,
        }
    }

    #[inline]
    pub fn into_solution(self) -> Solution<T> {
        match self {
            Self::Optimal(solution) | Self::Feasible(solution) => solution,
        }
    }
}

impl<T> std::fmt::Display for SolverResult<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Optimal(solution) => {
                write!(f, "Optimal(objective={})", solution.objective_value())
            }
            Self::Feasible(solution) => {
                write!(f, "Feasible(objective={})", solution.objective_value())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// Every node was expanded or pruned.
    OptimalityProven,
    /// The configured wall-clock budget ran out.
    TimeLimitReached,
    /// The search was cancelled; the string names the cause.
    Aborted(String),
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OptimalityProven => write!(f, "Optimality Proven"),
            Self::TimeLimitReached => write!(f, "Time Limit Reached"),
            Self::Aborted(reason) => write!(f, "Aborted: {}", reason),
        }
    }
}

/// Result of the solver after termination.
#[derive(Debug, Clone)]
pub struct BnbSolverOutcome<T> {
    result: SolverResult<T>,
    termination_reason: TerminationReason,
    statistics: BnbSolverStatistics,
    remaining_lower_bound: Option<i64>,
}

impl<T> BnbSolverOutcome<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn optimal(solution: Solution<T>, statistics: BnbSolverStatistics) -> Self {
        Self {
            result: SolverResult::Optimal(solution),
            termination_reason: TerminationReason::OptimalityProven,
            statistics,
            remaining_lower_bound: None,
        }
    }

    /// An outcome for a search stopped before the frontier was exhausted.
    ///
    /// # Panics
    ///
    /// Panics if `reason` is `OptimalityProven`.
    #[inline]
    pub fn stopped(
        solution: Solution<T>,
        reason: TerminationReason,
        remaining_lower_bound: i64,
        statistics: BnbSolverStatistics,
    ) -> Self {
        assert!(
            reason != TerminationReason::OptimalityProven,
            "called `BnbSolverOutcome::stopped` with termination reason OptimalityProven"
        );
        Self {
            result: SolverResult::Feasible(solution),
            termination_reason: reason,
            statistics,
            remaining_lower_bound: Some(remaining_lower_bound),
        }
    }

    #[inline]
    pub fn result(&self) -> &SolverResult<T> {
        &self.result
    }

    #[inline]
    pub fn solution(&self) -> &Solution<T> {
        self.result.solution()
    }

    #[inline]
    pub fn into_solution(self) -> Solution<T> {
        self.result.into_solution()
    }

    #[inline]
    pub fn objective_value(&self) -> i64 {
        self.result.solution().objective_value()
    }

    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    #[inline]
    pub fn statistics(&self) -> &BnbSolverStatistics {
        &self.statistics
    }

    #[inline]
    pub fn is_optimal(&self) -> bool {
        matches!(self.result, SolverResult::Optimal(_))
    }

    /// The smallest lower bound among nodes left unexplored, if the search
    /// stopped early.
    #[inline]
    pub fn remaining_lower_bound(&self) -> Option<i64> {
        self.remaining_lower_bound
    }

    /// The absolute optimality gap `upper_bound - remaining_lower_bound`;
    /// zero for a proven optimum.
    #[inline]
    pub fn gap(&self) -> i64 {
        match self.remaining_lower_bound {
            Some(lower_bound) => self.objective_value().saturating_sub(lower_bound),
            None => 0,
        }
    }
}

impl<T> std::fmt::Display for BnbSolverOutcome<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Result:             {}", self.result)?;
        writeln!(f, "Termination:        {}", self.termination_reason)?;
        match self.remaining_lower_bound {
            Some(lower_bound) => writeln!(
                f,
                "Open lower bound:   {} (gap {})",
                lower_bound,
                self.gap()
            )?,
            None => writeln!(f, "Open lower bound:   -")?,
        }
        write!(f, "{}", self.statistics)
    }
}
