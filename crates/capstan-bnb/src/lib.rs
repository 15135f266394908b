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

//! Capstan-BnB: parallel branch-and-bound for `1 | r_j | Σ C_j`
//!
//! Computes a non-preemptive single-machine schedule with release dates that
//! minimizes the sum of completion times, exactly, or with a proven gap when
//! stopped early.
//!
//! Core flow
//! - Build a `capstan_model::instance::Instance<T>`.
//! - Configure a `bnb::BnbSolver` with `config::BnbSolverConfigBuilder`.
//! - Call `solve`, `solve_with_interrupt` or `solve_with_monitor`.
//!
//! Design highlights
//! - Nodes sequence jobs left to right; the bound is the preemptive SRPT
//!   schedule of the remaining jobs, which is exact when nothing is preempted.
//! - The incumbent is seeded with the best of four dispatch rules.
//! - Best-first search over a shared frontier with a fixed worker pool; the
//!   incumbent is the only other shared state.
//!
//! Module map
//! - `bnb`: the solver driver and worker pool.
//! - `branching`: child generation with dominance and bound pruning.
//! - `relaxation`: the SRPT bound engine.
//! - `heuristics`: dispatch rules for the initial upper bound.
//! - `partial`, `node`: partial schedules and search tree nodes.
//! - `frontier`, `incumbent`: state shared between workers.
//! - `monitor`: search monitors (time limit, interrupt, log, composite).
//! - `config`, `result`, `stats`, `error`: configuration and reporting.

pub mod bnb;
pub mod branching;
pub mod config;
pub mod error;
pub mod frontier;
pub mod heuristics;
pub mod incumbent;
pub mod monitor;
pub mod node;
pub mod partial;
pub mod relaxation;
pub mod result;
pub mod stats;
