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

//! By-value arithmetic traits.
//!
//! `num_traits` exposes checked and saturating operations through
//! reference-taking methods, which is awkward inside tight generic loops.
//! These traits forward to the inherent primitive methods by value.
//!
//! ```rust
//! use capstan_core::num::ops::{CheckedAddVal, SaturatingSubVal};
//!
//! assert_eq!(i32::MAX.checked_add_val(1), None);
//! assert_eq!(5i64.checked_add_val(7), Some(12));
//! assert_eq!(i8::MIN.saturating_sub_val(1), i8::MIN);
//! ```

use core::ops::{Add, Sub};

/// Checked addition by value, `None` on overflow.
pub trait CheckedAddVal: Sized + Add<Self, Output = Self> {
    fn checked_add_val(self, v: Self) -> Option<Self>;
}

/// Checked subtraction by value, `None` on overflow.
pub trait CheckedSubVal: Sized + Sub<Self, Output = Self> {
    fn checked_sub_val(self, v: Self) -> Option<Self>;
}

/// Saturating addition by value, clamping at the numeric bounds.
pub trait SaturatingAddVal: Sized + Add<Self, Output = Self> {
    fn saturating_add_val(self, v: Self) -> Self;
}

/// Saturating subtraction by value, clamping at the numeric bounds.
pub trait SaturatingSubVal: Sized + Sub<Self, Output = Self> {
    fn saturating_sub_val(self, v: Self) -> Self;
}

macro_rules! impl_val_ops_for {
    ($($t:ty),*) => {
        $(
            impl CheckedAddVal for $t {
                #[inline(always)]
                fn checked_add_val(self, v: Self) -> Option<Self> {
                    <$t>::checked_add(self, v)
                }
            }

            impl CheckedSubVal for $t {
                #[inline(always)]
                fn checked_sub_val(self, v: Self) -> Option<Self> {
                    <$t>::checked_sub(self, v)
                }
            }

            impl SaturatingAddVal for $t {
                #[inline(always)]
                fn saturating_add_val(self, v: Self) -> Self {
                    <$t>::saturating_add(self, v)
                }
            }

            impl SaturatingSubVal for $t {
                #[inline(always)]
                fn saturating_sub_val(self, v: Self) -> Self {
                    <$t>::saturating_sub(self, v)
                }
            }
        )*
    };
}

impl_val_ops_for!(
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize
);
