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

//! Error types of the branch-and-bound engine.
//!
//! Two failure classes exist. `InvalidInstance` is reported synchronously
//! before any node is created. `InternalInconsistency` signals a broken
//! invariant inside the search (a job simulated into negative remaining time,
//! a job scheduled twice, an arithmetic overflow); it stops the whole search,
//! since continuing could return a wrong optimum.
//!
//! Hitting a time limit or an interrupt is not an error and is reported
//! through `TerminationReason` on a successful outcome instead.

use capstan_model::{index::JobIndex, instance::InstanceError};

/// The invariant that was found violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InconsistencyKind {
    /// The relaxation drove a job's remaining processing time below zero.
    NegativeRemainingTime,
    /// A job was appended to a partial schedule that already contains it.
    JobScheduledTwice,
    /// A time or objective computation left the representable range.
    ArithmeticOverflow,
    /// A job was placed before its release time.
    StartBeforeRelease,
    /// The relaxation ended with a job it never started or finished.
    UnfinishedJob,
}

impl std::fmt::Display for InconsistencyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativeRemainingTime => write!(f, "NegativeRemainingTime"),
            Self::JobScheduledTwice => write!(f, "JobScheduledTwice"),
            Self::ArithmeticOverflow => write!(f, "ArithmeticOverflow"),
            Self::StartBeforeRelease => write!(f, "StartBeforeRelease"),
            Self::UnfinishedJob => write!(f, "UnfinishedJob"),
        }
    }
}

/// A violated search invariant, optionally tied to the job that triggered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InconsistencyError {
    kind: InconsistencyKind,
    job: Option<JobIndex>,
}

impl InconsistencyError {
    #[inline]
    pub fn new(kind: InconsistencyKind, job: Option<JobIndex>) -> Self {
        Self { kind, job }
    }

    #[inline]
    pub fn for_job(kind: InconsistencyKind, job: JobIndex) -> Self {
        Self::new(kind, Some(job))
    }

    #[inline]
    pub fn overflow() -> Self {
        Self::new(InconsistencyKind::ArithmeticOverflow, None)
    }

    #[inline]
    pub fn kind(&self) -> InconsistencyKind {
        self.kind
    }

    #[inline]
    pub fn job(&self) -> Option<JobIndex> {
        self.job
    }
}

impl std::fmt::Display for InconsistencyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.job {
            Some(job) => write!(f, "{} (job {})", self.kind, job.get() + 1),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for InconsistencyError {}

/// Errors returned by `BnbSolver::solve`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BnbError {
    /// The instance failed validation; no search was started.
    InvalidInstance(InstanceError),
    /// A search invariant was violated; the search was stopped.
    InternalInconsistency(InconsistencyError),
}

impl std::fmt::Display for BnbError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInstance(e) => write!(f, "Invalid instance: {}", e),
            Self::InternalInconsistency(e) => write!(f, "Internal inconsistency: {}", e),
        }
    }
}

impl std::error::Error for BnbError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidInstance(e) => Some(e),
            Self::InternalInconsistency(e) => Some(e),
        }
    }
}

impl From<InstanceError> for BnbError {
    fn from(e: InstanceError) -> Self {
        Self::InvalidInstance(e)
    }
}

impl From<InconsistencyError> for BnbError {
    fn from(e: InconsistencyError) -> Self {
        Self::InternalInconsistency(e)
    }
}
