//! Finite field GF(2) arithmetic.
//!
//! This module contains the struct [`GF2`], which represents an element of
//! the finite field GF(2) and implements its arithmetic. The encoder works
//! with [`ndarray`] arrays of GF(2) elements, while the file formats and the
//! decoders handle bits stored as `u8`. The conversions from `bool` and into
//! `u8` bridge the two representations.

use core::iter::Sum;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub, SubAssign};
use ndarray::ScalarOperand;
use num_traits::{One, Zero};
use std::fmt;

/// Finite field GF(2) element.
///
/// # Examples
///
/// ```
/// use ldpc_codes::gf2::GF2;
///
/// let sum = GF2::ONE + GF2::ONE;
/// assert_eq!(sum, GF2::ZERO);
/// assert_eq!(u8::from(GF2::ONE), 1);
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct GF2(u8);

impl GF2 {
    /// The additive identity of GF(2).
    pub const ZERO: GF2 = GF2(0);
    /// The multiplicative identity of GF(2).
    pub const ONE: GF2 = GF2(1);
}

impl Add for GF2 {
    type Output = GF2;

    #[allow(clippy::suspicious_arithmetic_impl)]
    fn add(self, rhs: GF2) -> GF2 {
        GF2(self.0 ^ rhs.0)
    }
}

impl Sub for GF2 {
    type Output = GF2;

    #[allow(clippy::suspicious_arithmetic_impl)]
    fn sub(self, rhs: GF2) -> GF2 {
        self + rhs
    }
}

impl Mul for GF2 {
    type Output = GF2;

    #[allow(clippy::suspicious_arithmetic_impl)]
    fn mul(self, rhs: GF2) -> GF2 {
        GF2(self.0 & rhs.0)
    }
}

impl Div for GF2 {
    type Output = GF2;

    fn div(self, rhs: GF2) -> GF2 {
        if rhs.is_zero() {
            panic!("division by zero");
        }
        self
    }
}

impl AddAssign for GF2 {
    fn add_assign(&mut self, rhs: GF2) {
        *self = *self + rhs;
    }
}

impl SubAssign for GF2 {
    fn sub_assign(&mut self, rhs: GF2) {
        *self = *self - rhs;
    }
}

impl MulAssign for GF2 {
    fn mul_assign(&mut self, rhs: GF2) {
        *self = *self * rhs;
    }
}

impl DivAssign for GF2 {
    fn div_assign(&mut self, rhs: GF2) {
        *self = *self / rhs;
    }
}

impl Zero for GF2 {
    fn zero() -> GF2 {
        GF2::ZERO
    }

    fn is_zero(&self) -> bool {
        *self == GF2::ZERO
    }
}

impl One for GF2 {
    fn one() -> GF2 {
        GF2::ONE
    }

    fn is_one(&self) -> bool {
        *self == GF2::ONE
    }
}

impl Sum for GF2 {
    fn sum<I: Iterator<Item = GF2>>(iter: I) -> GF2 {
        iter.fold(GF2::ZERO, |a, b| a + b)
    }
}

impl<'a> Sum<&'a GF2> for GF2 {
    fn sum<I: Iterator<Item = &'a GF2>>(iter: I) -> GF2 {
        iter.fold(GF2::ZERO, |a, &b| a + b)
    }
}

impl From<bool> for GF2 {
    fn from(value: bool) -> GF2 {
        GF2(u8::from(value))
    }
}

impl From<GF2> for u8 {
    fn from(value: GF2) -> u8 {
        value.0
    }
}

impl fmt::Display for GF2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ScalarOperand for GF2 {}
