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

//! # Capstan Model
//!
//! The domain model of single-machine scheduling with release dates and the
//! sum of completion times objective (`1 | r_j | Σ C_j`).
//!
//! * **`index`**: `JobIndex`, the zero-based position of a job in its instance.
//! * **`job`**: `Job<T>`, an immutable job with identifier, processing time and release time.
//! * **`instance`**: `Instance<T>` and `InstanceBuilder<T>` plus eager validation
//!   (`InstanceError`).
//! * **`solution`**: `Solution<T>`, a complete non-preemptive schedule, and
//!   `ScheduleViolation` for feasibility checks.
//!
//! Job identifiers are the contiguous range `1..=n` and double as array
//! positions (`id - 1`), so every lookup by `JobIndex` is a plain slice access.

pub mod index;
pub mod instance;
pub mod job;
pub mod solution;
