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

use crate::index::JobIndex;
use num_traits::{PrimInt, Signed};

/// A single job of a scheduling instance.
///
/// Jobs are immutable once created. The identifier is 1-based and must match
/// the job's position inside its `Instance` (`id == index + 1`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Job<T> {
    id: usize,
    processing_time: T,
    release_time: T,
}

impl<T> Job<T>
where
    T: PrimInt + Signed,
{
    /// Creates a new job. No validation happens here; instances validate
    /// their jobs as a whole with `Instance::validate`.
    #[inline]
    pub fn new(id: usize, processing_time: T, release_time: T) -> Self {
        Self {
            id,
            processing_time,
            release_time,
        }
    }

    /// Returns the 1-based identifier of the job.
    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Returns the zero-based index of the job.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the identifier is zero.
    #[inline]
    pub fn index(&self) -> JobIndex {
        debug_assert!(
            self.id >= 1,
            "called `Job::index` on a job with identifier 0"
        );
        JobIndex::new(self.id - 1)
    }

    /// Returns the processing time of the job.
    #[inline]
    pub fn processing_time(&self) -> T {
        self.processing_time
    }

    /// Returns the release time of the job.
    #[inline]
    pub fn release_time(&self) -> T {
        self.release_time
    }
}

impl<T> std::fmt::Display for Job<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Job(id: {}, processing_time: {}, release_time: {})",
            self.id, self.processing_time, self.release_time
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let job = Job::new(3, 5i64, 2i64);
        assert_eq!(job.id(), 3);
        assert_eq!(job.index(), JobIndex::new(2));
        assert_eq!(job.processing_time(), 5);
        assert_eq!(job.release_time(), 2);
    }

    #[test]
    fn test_display() {
        let job = Job::new(1, 4i32, 0i32);
        assert_eq!(
            format!("{}", job),
            "Job(id: 1, processing_time: 4, release_time: 0)"
        );
    }
}
