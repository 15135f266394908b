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

//! # Solver Configuration
//!
//! `BnbSolverConfig` collects the knobs of a branch-and-bound run and is built
//! with the fluent `BnbSolverConfigBuilder`:
//!
//! ```rust
//! use capstan_bnb::config::BnbSolverConfigBuilder;
//! use std::time::Duration;
//!
//! let config = BnbSolverConfigBuilder::new()
//!     .with_num_workers(4)
//!     .with_time_limit(Duration::from_secs(10))
//!     .build();
//! assert_eq!(config.resolved_num_workers(), 4);
//! assert_eq!(config.resolved_ramp_up_nodes(), 16);
//! ```
//!
//! Zero is the "auto" value for both `num_workers` (available hardware
//! parallelism) and `ramp_up_nodes` (four nodes per worker).

use std::time::Duration;

/// Configuration of a `BnbSolver` run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BnbSolverConfig {
    /// Size of the worker pool; `0` selects the available parallelism.
    pub num_workers: usize,
    /// Wall-clock budget for the whole solve, seeding included.
    pub time_limit: Option<Duration>,
    /// Discard children that another unscheduled job provably dominates.
    pub dominance_pruning: bool,
    /// Frontier size the calling thread grows the tree to before the pool
    /// takes over; `0` selects four nodes per worker.
    pub ramp_up_nodes: usize,
    /// When set, every worker logs a progress line at this interval.
    pub log_interval: Option<Duration>,
    /// Clocks are read every `clock_check_mask + 1` expansions; use `2^k - 1`.
    pub clock_check_mask: u64,
}

impl Default for BnbSolverConfig {
    fn default() -> Self {
        Self {
            num_workers: 0,
            time_limit: None,
            dominance_pruning: true,
            ramp_up_nodes: 0,
            log_interval: None,
            clock_check_mask: 0,
        }
    }
}

impl BnbSolverConfig {
    /// Returns the worker count with the auto value resolved (at least 1).
    pub fn resolved_num_workers(&self) -> usize {
        if self.num_workers > 0 {
            return self.num_workers;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }

    /// Returns the ramp-up target with the auto value resolved.
    pub fn resolved_ramp_up_nodes(&self) -> usize {
        if self.ramp_up_nodes > 0 {
            return self.ramp_up_nodes;
        }
        self.resolved_num_workers().saturating_mul(4)
    }
}

impl std::fmt::Display for BnbSolverConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let time_limit = match self.time_limit {
            Some(limit) => format!("{:.2?}", limit),
            None => "none".to_string(),
        };
        write!(
            f,
            "BnbSolverConfig(num_workers: {}, time_limit: {}, dominance_pruning: {}, ramp_up_nodes: {})",
            self.resolved_num_workers(),
            time_limit,
            self.dominance_pruning,
            self.resolved_ramp_up_nodes()
        )
    }
}

/// A builder for `BnbSolverConfig`.
#[derive(Clone, Debug, Default)]
pub struct BnbSolverConfigBuilder {
    config: BnbSolverConfig,
}

impl BnbSolverConfigBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_num_workers(mut self, num_workers: usize) -> Self {
        self.config.num_workers = num_workers;
        self
    }

    #[inline]
    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.config.time_limit = Some(time_limit);
        self
    }

    #[inline]
    pub fn with_dominance_pruning(mut self, enabled: bool) -> Self {
        self.config.dominance_pruning = enabled;
        self
    }

    #[inline]
    pub fn with_ramp_up_nodes(mut self, nodes: usize) -> Self {
        self.config.ramp_up_nodes = nodes;
        self
    }

    #[inline]
    pub fn with_log_interval(mut self, interval: Duration) -> Self {
        self.config.log_interval = Some(interval);
        self
    }

    #[inline]
    pub fn with_clock_check_mask(mut self, mask: u64) -> Self {
        self.config.clock_check_mask = mask;
        self
    }

    #[inline]
    pub fn build(self) -> BnbSolverConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BnbSolverConfig::default();
        assert_eq!(config.num_workers, 0);
        assert!(config.time_limit.is_none());
        assert!(config.dominance_pruning);
        assert_eq!(config.clock_check_mask, 0);
        assert!(config.resolved_num_workers() >= 1);
        assert_eq!(
            config.resolved_ramp_up_nodes(),
            config.resolved_num_workers() * 4
        );
    }

    #[test]
    fn test_builder_sets_every_field() {
        let config = BnbSolverConfigBuilder::new()
            .with_num_workers(3)
            .with_time_limit(Duration::from_millis(250))
            .with_dominance_pruning(false)
            .with_ramp_up_nodes(7)
            .with_log_interval(Duration::from_secs(2))
            .with_clock_check_mask(1023)
            .build();

        assert_eq!(config.resolved_num_workers(), 3);
        assert_eq!(config.time_limit, Some(Duration::from_millis(250)));
        assert!(!config.dominance_pruning);
        assert_eq!(config.resolved_ramp_up_nodes(), 7);
        assert_eq!(config.log_interval, Some(Duration::from_secs(2)));
        assert_eq!(config.clock_check_mask, 1023);
    }

    #[test]
    fn test_display() {
        let config = BnbSolverConfigBuilder::new().with_num_workers(2).build();
        assert_eq!(
            format!("{}", config),
            "BnbSolverConfig(num_workers: 2, time_limit: none, dominance_pruning: true, ramp_up_nodes: 8)"
        );
    }
}
