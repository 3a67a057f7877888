//! Signed working precision for the transcendental library.
//!
//! Series are evaluated on `BigInt`s scaled by 10^36, i.e. 18 guard digits on
//! top of the public 18-digit scale, and truncated back once at the end.

use std::sync::OnceLock;

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::fixed_point::{FixedPointError, SCALE};

pub(crate) const WORK_DIGITS: u32 = 36;

// Enough for atan(1/5) and atanh(1/3) to fall below 10^-36.
const CONSTANT_TERMS: u32 = 48;

/// Constants at working precision, derived with integer series only.
pub(crate) struct WideConsts {
    pub one: BigInt,
    pub guard: BigInt,
    pub pi: BigInt,
    pub two_pi: BigInt,
    pub ln2: BigInt,
    pub sqrt_pi: BigInt,
}

impl WideConsts {
    fn compute() -> Self {
        let one = BigInt::from(10u32).pow(WORK_DIGITS);
        let guard = BigInt::from(SCALE);

        // Machin: pi = 16 atan(1/5) - 4 atan(1/239)
        let pi = BigInt::from(16) * arctan_inv(5, CONSTANT_TERMS, &one)
            - BigInt::from(4) * arctan_inv(239, CONSTANT_TERMS, &one);
        let two_pi = &pi * BigInt::from(2);
        // ln 2 = 2 atanh(1/3)
        let ln2 = BigInt::from(2) * arctanh_inv(3, CONSTANT_TERMS, &one);
        let sqrt_pi = (&pi * &one).sqrt();

        Self {
            one,
            guard,
            pi,
            two_pi,
            ln2,
            sqrt_pi,
        }
    }
}

static CONSTS: OnceLock<WideConsts> = OnceLock::new();

pub(crate) fn consts() -> &'static WideConsts {
    CONSTS.get_or_init(WideConsts::compute)
}

/// atan(1/n) = sum (-1)^k / ((2k+1) n^(2k+1))
fn arctan_inv(n: u32, terms: u32, one: &BigInt) -> BigInt {
    let n = BigInt::from(n);
    let n2 = &n * &n;
    let mut power = one / &n;
    let mut sum = BigInt::zero();
    for k in 0..terms {
        let term = &power / BigInt::from(2 * k + 1);
        if k % 2 == 0 {
            sum += term;
        } else {
            sum -= term;
        }
        power = power / &n2;
    }
    sum
}

/// atanh(1/n) = sum 1 / ((2k+1) n^(2k+1))
fn arctanh_inv(n: u32, terms: u32, one: &BigInt) -> BigInt {
    let n = BigInt::from(n);
    let n2 = &n * &n;
    let mut power = one / &n;
    let mut sum = BigInt::zero();
    for k in 0..terms {
        sum += &power / BigInt::from(2 * k + 1);
        power = power / &n2;
    }
    sum
}

/// Lift a raw 18-digit value into working precision.
pub(crate) fn lift(raw: u128) -> BigInt {
    BigInt::from(raw) * &consts().guard
}

/// Working-precision product, truncating toward zero.
pub(crate) fn mul(a: &BigInt, b: &BigInt) -> BigInt {
    (a * b) / &consts().one
}

/// Working-precision quotient, truncating toward zero. `b` must be non-zero.
pub(crate) fn div(a: &BigInt, b: &BigInt) -> BigInt {
    (a * &consts().one) / b
}

/// Truncate back to a raw 18-digit value.
///
/// Values that truncate to zero from below are zero; anything still negative
/// is an underflow, anything past u128 an overflow.
pub(crate) fn lower(w: &BigInt, op: &'static str) -> Result<u128, FixedPointError> {
    let truncated = w / &consts().guard;
    if truncated.is_negative() {
        return Err(FixedPointError::Underflow { op });
    }
    truncated.to_u128().ok_or(FixedPointError::Overflow { op })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_leading_digits() {
        let c = consts();
        // 18 leading fractional digits of each constant
        assert_eq!(lower(&c.pi, "pi").unwrap(), 3_141_592_653_589_793_238);
        assert_eq!(lower(&c.ln2, "ln2").unwrap(), 693_147_180_559_945_309);
        assert_eq!(lower(&c.sqrt_pi, "sqrt_pi").unwrap(), 1_772_453_850_905_516_027);
    }

    #[test]
    fn test_lower_truncates_toward_zero() {
        let c = consts();
        let tiny_negative = -BigInt::from(1);
        assert_eq!(lower(&tiny_negative, "t").unwrap(), 0);

        let minus_one = -c.one.clone();
        assert_eq!(
            lower(&minus_one, "t").unwrap_err(),
            FixedPointError::Underflow { op: "t" }
        );
        assert_eq!(lower(&lift(42), "t").unwrap(), 42);
    }

    #[test]
    fn test_mul_div() {
        let c = consts();
        let two = &c.one * BigInt::from(2);
        let three = &c.one * BigInt::from(3);
        assert_eq!(mul(&two, &three), &c.one * BigInt::from(6));
        assert_eq!(div(&three, &two), &c.one * BigInt::from(3) / BigInt::from(2));
    }
}
