// SPDX-License-Identifier: Apache-2.0
//! Deterministic fixed-point arithmetic: Q16.16 (`i32`) and Q48.16 (`i64`).
//!
//! Both formats share 16 fractional bits so conversion between them is a
//! sign-preserving widen/narrow with no rescale. Division by zero returns
//! `0` and never panics or sets a flag; callers that need to distinguish a
//! genuine zero result from a division-by-zero refusal must pre-check the
//! divisor themselves, matching the source contract this kernel ports.

/// Number of fractional bits shared by [`Q16`] and [`Q48`].
pub const FRAC_BITS: u32 = 16;

/// `1.0` represented in Q16.16.
pub const Q16_ONE: Q16 = Q16(1 << FRAC_BITS);

/// `1.0` represented in Q48.16.
pub const Q48_ONE: Q48 = Q48(1 << FRAC_BITS);

/// Signed Q16.16 fixed-point scalar, backed by `i32`.
#[repr(transparent)]
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Q16(i32);

/// Wide Q48.16 fixed-point accumulator, backed by `i64`.
#[repr(transparent)]
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Q48(i64);

impl Q16 {
    /// Constructs a `Q16` from an integer (`n << 16`).
    #[must_use]
    pub const fn from_int(n: i32) -> Self {
        Self(n << FRAC_BITS)
    }

    /// Constructs a `Q16` directly from its raw Q16.16 bit pattern.
    #[must_use]
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// Returns the raw Q16.16 bit pattern.
    #[must_use]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Zero in Q16.16.
    #[must_use]
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Returns `true` if this value is exactly zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Saturating-free wrapping add.
    #[must_use]
    pub fn add(self, other: Self) -> Self {
        Self(self.0.wrapping_add(other.0))
    }

    /// Saturating-free wrapping sub.
    #[must_use]
    pub fn sub(self, other: Self) -> Self {
        Self(self.0.wrapping_sub(other.0))
    }

    /// Fixed-point multiply via a 64-bit intermediate, truncating toward zero.
    #[must_use]
    pub fn mul(self, other: Self) -> Self {
        let wide = i64::from(self.0) * i64::from(other.0);
        Self((wide >> FRAC_BITS) as i32)
    }

    /// Fixed-point divide. Returns `0` when `other` is zero (no panic, no flag).
    #[must_use]
    pub fn div(self, other: Self) -> Self {
        if other.0 == 0 {
            return Self(0);
        }
        let wide = (i64::from(self.0)) << FRAC_BITS;
        Self((wide / i64::from(other.0)) as i32)
    }

    /// Clamps this ratio to `[0, 1.0]` in Q16.16.
    #[must_use]
    pub fn clamp_ratio(self) -> Self {
        if self.0 < 0 {
            Self(0)
        } else if self.0 > Q16_ONE.0 {
            Q16_ONE
        } else {
            self
        }
    }

    /// Widen to Q48.16, preserving sign and scale.
    #[must_use]
    pub fn to_q48(self) -> Q48 {
        Q48(i64::from(self.0))
    }

    /// Deterministic square root via fixed-iteration Newton's method.
    ///
    /// Negative inputs return `0`. The iteration count is fixed (not
    /// data-dependent) so the result is bit-identical across platforms.
    #[must_use]
    pub fn sqrt(self) -> Self {
        if self.0 <= 0 {
            return Self(0);
        }
        // Operate on the Q32.32-equivalent widened value so intermediate
        // precision does not depend on host float behavior.
        let value = i64::from(self.0) << FRAC_BITS;
        let mut x = newton_sqrt_seed(value);
        for _ in 0..NEWTON_ITERATIONS {
            if x == 0 {
                break;
            }
            x = (x + value / x) / 2;
        }
        Self(x as i32)
    }
}

impl Q48 {
    /// Constructs a `Q48` from an integer (`n << 16`).
    #[must_use]
    pub const fn from_int(n: i64) -> Self {
        Self(n << FRAC_BITS)
    }

    /// Constructs a `Q48` directly from its raw Q48.16 bit pattern.
    #[must_use]
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw Q48.16 bit pattern.
    #[must_use]
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Zero in Q48.16.
    #[must_use]
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Wrapping add.
    #[must_use]
    pub fn add(self, other: Self) -> Self {
        Self(self.0.wrapping_add(other.0))
    }

    /// Wrapping sub.
    #[must_use]
    pub fn sub(self, other: Self) -> Self {
        Self(self.0.wrapping_sub(other.0))
    }

    /// Fixed-point multiply via a 128-bit intermediate, truncating toward zero.
    #[must_use]
    pub fn mul(self, other: Self) -> Self {
        let wide = i128::from(self.0) * i128::from(other.0);
        Self((wide >> FRAC_BITS) as i64)
    }

    /// Fixed-point divide. Returns `0` when `other` is zero (no panic, no flag).
    #[must_use]
    pub fn div(self, other: Self) -> Self {
        if other.0 == 0 {
            return Self(0);
        }
        let wide = i128::from(self.0) << FRAC_BITS;
        Self((wide / i128::from(other.0)) as i64)
    }

    /// Narrow to Q16.16, truncating any bits that do not fit in 32 bits.
    #[must_use]
    pub fn to_q16(self) -> Q16 {
        Q16(self.0 as i32)
    }

    /// Applies a Q16.16 ratio (clamped to `[0, 1.0]`) to this Q48.16 value.
    ///
    /// Mirrors the source's `apply_ratio`: a zero value or non-positive ratio
    /// short-circuits to zero, and a ratio at or above `1.0` returns the
    /// value unchanged rather than rounding through a multiply.
    #[must_use]
    pub fn apply_ratio(self, ratio: Q16) -> Self {
        let clamped = ratio.clamp_ratio();
        if self.0 == 0 || clamped.0 <= 0 {
            return Self(0);
        }
        if clamped.0 >= Q16_ONE.0 {
            return self;
        }
        self.mul(clamped.to_q48())
    }
}

/// Fixed iteration count for [`Q16::sqrt`]'s Newton refinement.
const NEWTON_ITERATIONS: u32 = 12;

/// Deterministic initial seed for Newton's method: successive bit-halving
/// rather than a platform `f32`/`f64` sqrt, so the seed itself never depends
/// on host floating-point behavior.
fn newton_sqrt_seed(value: i64) -> i64 {
    if value <= 0 {
        return 0;
    }
    let bits = 64 - value.leading_zeros();
    1i64 << (bits / 2 + 1)
}
