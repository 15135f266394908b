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

//! # Scheduling Instances
//!
//! An `Instance<T>` is the ordered, index-addressable collection of jobs handed
//! to a solver. Instances are immutable once built and are shared read-only by
//! every search worker.
//!
//! Construction never fails; `Instance::validate` checks the structural
//! invariants solvers rely on and reports the first violation as an
//! `InstanceError`:
//!
//! * the job set is non-empty,
//! * identifiers are unique and form the contiguous range `1..=n` in order,
//! * processing times are strictly positive,
//! * release times are non-negative.

use crate::{index::JobIndex, job::Job};
use num_traits::{PrimInt, Signed};

/// The reason an instance was rejected by `Instance::validate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceError {
    /// The instance contains no jobs.
    Empty,
    /// Two jobs share the identifier `id`.
    DuplicateId { id: usize },
    /// The job at `position` carries `id` instead of `position + 1`.
    NonContiguousId { position: usize, id: usize },
    /// The job `id` has a processing time of zero or less.
    NonPositiveProcessingTime { id: usize },
    /// The job `id` is released before time zero.
    NegativeReleaseTime { id: usize },
}

impl std::fmt::Display for InstanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "Instance contains no jobs"),
            Self::DuplicateId { id } => write!(f, "Job identifier {} occurs more than once", id),
            Self::NonContiguousId { position, id } => write!(
                f,
                "Job at position {} has identifier {}, expected {}",
                position,
                id,
                position + 1
            ),
            Self::NonPositiveProcessingTime { id } => {
                write!(f, "Job {} has a non-positive processing time", id)
            }
            Self::NegativeReleaseTime { id } => {
                write!(f, "Job {} has a negative release time", id)
            }
        }
    }
}

impl std::error::Error for InstanceError {}

/// An ordered collection of jobs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instance<T> {
    jobs: Vec<Job<T>>,
}

impl<T> Instance<T>
where
    T: PrimInt + Signed,
{
    /// Creates an instance from the given jobs without validating them.
    #[inline]
    pub fn new(jobs: Vec<Job<T>>) -> Self {
        Self { jobs }
    }

    /// Creates an instance and validates it.
    #[inline]
    pub fn try_new(jobs: Vec<Job<T>>) -> Result<Self, InstanceError> {
        let instance = Self::new(jobs);
        instance.validate()?;
        Ok(instance)
    }

    /// Checks the structural invariants of the instance.
    pub fn validate(&self) -> Result<(), InstanceError> {
        let n = self.jobs.len();
        if n == 0 {
            return Err(InstanceError::Empty);
        }

        let mut seen = vec![false; n];
        for (position, job) in self.jobs.iter().enumerate() {
            let id = job.id();
            if (1..=n).contains(&id) {
                if seen[id - 1] {
                    return Err(InstanceError::DuplicateId { id });
                }
                seen[id - 1] = true;
            }
            if id != position + 1 {
                return Err(InstanceError::NonContiguousId { position, id });
            }
            if job.processing_time() <= T::zero() {
                return Err(InstanceError::NonPositiveProcessingTime { id });
            }
            if job.release_time() < T::zero() {
                return Err(InstanceError::NegativeReleaseTime { id });
            }
        }

        Ok(())
    }

    /// Returns the number of jobs.
    #[inline]
    pub fn num_jobs(&self) -> usize {
        self.jobs.len()
    }

    /// Returns `true` if the instance has no jobs.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Returns all jobs in instance order.
    #[inline]
    pub fn jobs(&self) -> &[Job<T>] {
        &self.jobs
    }

    /// Returns the job at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn job(&self, index: JobIndex) -> &Job<T> {
        &self.jobs[index.get()]
    }

    /// Returns the processing time of the job at `index`.
    #[inline]
    pub fn processing_time(&self, index: JobIndex) -> T {
        self.job(index).processing_time()
    }

    /// Returns the release time of the job at `index`.
    #[inline]
    pub fn release_time(&self, index: JobIndex) -> T {
        self.job(index).release_time()
    }

    /// Returns an iterator over all job indices.
    #[inline]
    pub fn job_indices(&self) -> impl Iterator<Item = JobIndex> + '_ {
        (0..self.jobs.len()).map(JobIndex::new)
    }

    /// Returns the sum of all processing times widened to `i64`,
    /// or `None` on overflow.
    pub fn total_processing_time(&self) -> Option<i64>
    where
        T: Into<i64>,
    {
        self.jobs
            .iter()
            .try_fold(0i64, |acc, job| {
                acc.checked_add(job.processing_time().into())
            })
    }

    /// Returns the latest release time, or `None` for an empty instance.
    #[inline]
    pub fn max_release_time(&self) -> Option<T> {
        self.jobs.iter().map(|job| job.release_time()).max()
    }
}

impl<T> std::fmt::Display for Instance<T>
where
    T: PrimInt + Signed + Into<i64> + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Instance Summary")?;
        writeln!(f, "   Number of Jobs: {}", self.num_jobs())?;

        let Some(latest_release) = self.max_release_time() else {
            writeln!(f)?;
            writeln!(f, "   (No jobs)")?;
            return Ok(());
        };
        match self.total_processing_time() {
            Some(total) => writeln!(f, "   Total Processing Time: {}", total)?,
            None => writeln!(f, "   Total Processing Time: overflow")?,
        }
        writeln!(f, "   Latest Release Time: {}", latest_release)?;
        writeln!(f)?;

        writeln!(
            f,
            "   {:<10} | {:<16} | {:<12}",
            "Job", "Processing Time", "Release Time"
        )?;
        writeln!(f, "   {:-<10}-+-{:-<16}-+-{:-<12}", "", "", "")?;
        for job in &self.jobs {
            writeln!(
                f,
                "   {:<10} | {:<16} | {:<12}",
                job.id(),
                job.processing_time(),
                job.release_time()
            )?;
        }

        Ok(())
    }
}

/// Incrementally builds an `Instance`, assigning identifiers `1..=n` in the
/// order jobs are added.
#[derive(Clone, Debug, Default)]
pub struct InstanceBuilder<T> {
    jobs: Vec<Job<T>>,
}

impl<T> InstanceBuilder<T>
where
    T: PrimInt + Signed,
{
    /// Creates an empty builder.
    #[inline]
    pub fn new() -> Self {
        Self { jobs: Vec::new() }
    }

    /// Creates an empty builder with room for `capacity` jobs.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            jobs: Vec::with_capacity(capacity),
        }
    }

    /// Appends a job and returns its index.
    #[inline]
    pub fn add_job(&mut self, processing_time: T, release_time: T) -> JobIndex {
        let index = JobIndex::new(self.jobs.len());
        self.jobs
            .push(Job::new(index.get() + 1, processing_time, release_time));
        index
    }

    /// Appends a job, consuming and returning the builder.
    #[inline]
    pub fn with_job(mut self, processing_time: T, release_time: T) -> Self {
        self.add_job(processing_time, release_time);
        self
    }

    /// Finishes the instance without validating it.
    #[inline]
    pub fn build(self) -> Instance<T> {
        Instance::new(self.jobs)
    }

    /// Finishes and validates the instance.
    #[inline]
    pub fn try_build(self) -> Result<Instance<T>, InstanceError> {
        Instance::try_new(self.jobs)
    }
}

impl<T> From<Vec<(T, T)>> for Instance<T>
where
    T: PrimInt + Signed,
{
    /// Builds an instance from `(processing_time, release_time)` pairs.
    fn from(pairs: Vec<(T, T)>) -> Self {
        pairs
            .into_iter()
            .fold(
                InstanceBuilder::new(),
                |builder, (processing_time, release_time)| {
                    builder.with_job(processing_time, release_time)
                },
            )
            .build()
    }
}
