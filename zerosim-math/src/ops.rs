use num_bigint::BigUint;
use num_traits::ToPrimitive;

use crate::fixed_point::{FixedPointError, FixedPointValue, MAX_VALUE, SCALE};

/// Golden ratio at 18 fractional digits.
pub const PHI: FixedPointValue = FixedPointValue::from_raw(1_618_033_988_749_894_848);

/// Multiply two scaled integers, `(a * b) / SCALE` truncating.
///
/// Pre-check: `a > (MAX_VALUE * SCALE) / b` is an overflow, so the truncated
/// product can never leave the u128 range.
pub(crate) fn mul_raw(a: u128, b: u128, op: &'static str) -> Result<u128, FixedPointError> {
    if b == 0 {
        return Ok(0);
    }
    if let Some(product) = a.checked_mul(b) {
        return Ok(product / SCALE);
    }
    let limit = (BigUint::from(MAX_VALUE) * SCALE) / b;
    let wide_a = BigUint::from(a);
    if wide_a > limit {
        return Err(FixedPointError::Overflow { op });
    }
    ((wide_a * b) / SCALE)
        .to_u128()
        .ok_or(FixedPointError::Overflow { op })
}

/// Reciprocal-scaled division, `(a * SCALE) / b` truncating.
pub(crate) fn div_raw(a: u128, b: u128, op: &'static str) -> Result<u128, FixedPointError> {
    if b == 0 {
        return Err(FixedPointError::DivisionByZero { op });
    }
    if let Some(scaled) = a.checked_mul(SCALE) {
        return Ok(scaled / b);
    }
    ((BigUint::from(a) * SCALE) / b)
        .to_u128()
        .ok_or(FixedPointError::Overflow { op })
}

impl FixedPointValue {
    /// Checked addition; fails when `a + b > MAX_VALUE`.
    pub fn checked_add(self, other: Self) -> Result<Self, FixedPointError> {
        if self.raw() > MAX_VALUE - other.raw() {
            return Err(FixedPointError::Overflow { op: "add" });
        }
        Ok(Self::from_raw(self.raw() + other.raw()))
    }

    /// Checked subtraction; fails when `a - b < MIN_VALUE`.
    pub fn checked_sub(self, other: Self) -> Result<Self, FixedPointError> {
        if self.raw() < other.raw() {
            return Err(FixedPointError::Underflow { op: "sub" });
        }
        Ok(Self::from_raw(self.raw() - other.raw()))
    }

    /// Checked fixed-point multiplication, truncating toward zero.
    pub fn checked_mul(self, other: Self) -> Result<Self, FixedPointError> {
        mul_raw(self.raw(), other.raw(), "mul").map(Self::from_raw)
    }

    /// Checked fixed-point division, truncating toward zero.
    pub fn checked_div(self, other: Self) -> Result<Self, FixedPointError> {
        div_raw(self.raw(), other.raw(), "div").map(Self::from_raw)
    }
}

/// Binary comparisons the public layer logs as `1`/`0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Gt,
    Lt,
    Gte,
    Lte,
    Eq,
    Neq,
}

impl Comparison {
    pub fn op_name(self) -> &'static str {
        match self {
            Comparison::Gt => "gt",
            Comparison::Lt => "lt",
            Comparison::Gte => "gte",
            Comparison::Lte => "lte",
            Comparison::Eq => "eq",
            Comparison::Neq => "neq",
        }
    }

    pub fn evaluate(self, a: FixedPointValue, b: FixedPointValue) -> bool {
        match self {
            Comparison::Gt => a > b,
            Comparison::Lt => a < b,
            Comparison::Gte => a >= b,
            Comparison::Lte => a <= b,
            Comparison::Eq => a == b,
            Comparison::Neq => a != b,
        }
    }
}
