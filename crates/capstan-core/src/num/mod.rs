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

//! # Numeric Foundations
//!
//! Integer-centric traits for the scheduling engine. Job times are generic
//! over a signed primitive integer, while objective values and bounds are
//! always accumulated in `i64`.
//!
//! ## Submodules
//!
//! - `constants`: associated constants (`Zero`, `PlusOne`, `MinusOne`) for
//!   sentinels that read better than literals in generic code.
//! - `ops`: by-value checked (`Option<T>`) and saturating arithmetic.
//!
//! The `SolverNumeric` bundle collects every bound the model and the search
//! engine need, so generic signatures stay short.

pub mod constants;
pub mod ops;

use num_traits::{FromPrimitive, PrimInt, Signed};
use std::hash::Hash;

/// A trait alias for the integer types that can represent job times.
///
/// Implemented automatically for `i8`, `i16`, `i32` and `i64`.
/// The `Into<i64>` bound is what lets the search engine accumulate sums of
/// completion times in 64 bits regardless of the per-job width.
pub trait SolverNumeric:
    PrimInt
    + Signed
    + FromPrimitive
    + Into<i64>
    + std::fmt::Debug
    + std::fmt::Display
    + constants::Zero
    + constants::PlusOne
    + constants::MinusOne
    + ops::CheckedAddVal
    + ops::CheckedSubVal
    + ops::SaturatingAddVal
    + ops::SaturatingSubVal
    + Send
    + Sync
    + Hash
    + 'static
{
}

impl<T> SolverNumeric for T where
    T: PrimInt
        + Signed
        + FromPrimitive
        + Into<i64>
        + std::fmt::Debug
        + std::fmt::Display
        + constants::Zero
        + constants::PlusOne
        + constants::MinusOne
        + ops::CheckedAddVal
        + ops::CheckedSubVal
        + ops::SaturatingAddVal
        + ops::SaturatingSubVal
        + Send
        + Sync
        + Hash
        + 'static
{
}

#[cfg(test)]
mod tests {
    use super::SolverNumeric;

    fn widen<T: SolverNumeric>(value: T) -> i64 {
        value.into()
    }

    #[test]
    fn test_solver_numeric_is_implemented_for_signed_widths() {
        assert_eq!(widen(7i8), 7);
        assert_eq!(widen(-3i16), -3);
        assert_eq!(widen(i32::MAX), i32::MAX as i64);
        assert_eq!(widen(i64::MIN), i64::MIN);
    }
}
