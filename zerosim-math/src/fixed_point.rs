use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Unsigned fixed-point with 18 fractional decimal digits (UQ128.18)
/// Range: [0, (2^128 - 1) / 10^18] ≈ [0, 3.4e20]
/// Precision: 10^-18
/// Storage: the exact integer `value * 10^18` in a u128
/// Overflow behavior: checked, never wrapping and never saturating
pub const FRACTIONAL_DIGITS: usize = 18;
pub const SCALE: u128 = 1_000_000_000_000_000_000;
pub const MIN_VALUE: u128 = 0;
pub const MAX_VALUE: u128 = u128::MAX;

/// Taxonomy the callers of this kernel sort failures into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Result would leave `[MIN_VALUE, MAX_VALUE]`.
    Overflow,
    /// Division or reciprocal by zero.
    ZeroDivision,
    /// Malformed input or an argument outside its accepted domain.
    Value,
    /// Input that cannot be represented as an integral scaled value.
    Type,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FixedPointError {
    #[error("Overflow in {op}: result exceeds MAX_VALUE")]
    Overflow { op: &'static str },
    #[error("Underflow in {op}: result below MIN_VALUE")]
    Underflow { op: &'static str },
    #[error("Division by zero in {op}")]
    DivisionByZero { op: &'static str },
    #[error("Malformed numeric string: {0:?}")]
    Malformed(String),
    #[error("Value is not integral at 18 fractional digits: {0:?}")]
    NonIntegral(String),
    #[error("Domain error in {op}: {reason}")]
    Domain {
        op: &'static str,
        reason: &'static str,
    },
    #[error("Invalid clamp bounds: low exceeds high")]
    InvalidBounds,
}

impl FixedPointError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FixedPointError::Overflow { .. } | FixedPointError::Underflow { .. } => {
                ErrorKind::Overflow
            }
            FixedPointError::DivisionByZero { .. } => ErrorKind::ZeroDivision,
            FixedPointError::Malformed(_)
            | FixedPointError::Domain { .. }
            | FixedPointError::InvalidBounds => ErrorKind::Value,
            FixedPointError::NonIntegral(_) => ErrorKind::Type,
        }
    }
}

/// A non-negative real number held as an integer scaled by [`SCALE`].
///
/// Values are immutable; every arithmetic or transcendental operation returns
/// a new value. Equality and ordering compare the raw scaled integers exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FixedPointValue {
    raw: u128,
}

impl FixedPointValue {
    pub const ZERO: Self = Self { raw: 0 };
    pub const ONE: Self = Self { raw: SCALE };
    pub const MAX: Self = Self { raw: MAX_VALUE };

    /// Wrap an already-scaled integer. Every u128 is inside the value domain.
    pub const fn from_raw(raw: u128) -> Self {
        Self { raw }
    }

    /// The scaled integer, i.e. `value * 10^18`.
    pub const fn raw(&self) -> u128 {
        self.raw
    }

    /// Scale an integer literal by [`SCALE`].
    pub fn from_integer(n: u128) -> Result<Self, FixedPointError> {
        n.checked_mul(SCALE)
            .map(Self::from_raw)
            .ok_or(FixedPointError::Overflow { op: "from_integer" })
    }

    /// Parse a non-negative integer or decimal string.
    ///
    /// Accepts `123`, `123.`, `.5`, `+1.25` and up to 18 fractional digits;
    /// extra fractional digits are allowed only when they are all zeros. No
    /// whitespace, exponents or separators. A leading `-` is accepted only for
    /// zero.
    pub fn from_decimal_string(s: &str) -> Result<Self, FixedPointError> {
        let malformed = || FixedPointError::Malformed(s.to_string());

        let (negative, body) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };

        let (int_part, frac_part) = match body.split_once('.') {
            Some((i, f)) => (i, f),
            None => (body, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(malformed());
        }
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_part) || !all_digits(frac_part) {
            return Err(malformed());
        }

        let (kept, excess) = if frac_part.len() > FRACTIONAL_DIGITS {
            frac_part.split_at(FRACTIONAL_DIGITS)
        } else {
            (frac_part, "")
        };
        if excess.bytes().any(|b| b != b'0') {
            return Err(FixedPointError::NonIntegral(s.to_string()));
        }

        let overflow = FixedPointError::Overflow {
            op: "from_decimal_string",
        };
        let mut integer: u128 = 0;
        for b in int_part.bytes() {
            integer = integer
                .checked_mul(10)
                .and_then(|v| v.checked_add(u128::from(b - b'0')))
                .ok_or(overflow.clone())?;
        }
        let mut fraction: u128 = 0;
        for b in kept.bytes() {
            fraction = fraction * 10 + u128::from(b - b'0');
        }
        fraction *= 10u128.pow((FRACTIONAL_DIGITS - kept.len()) as u32);

        let raw = integer
            .checked_mul(SCALE)
            .and_then(|v| v.checked_add(fraction))
            .ok_or(overflow)?;

        if negative && raw != 0 {
            return Err(FixedPointError::Underflow {
                op: "from_decimal_string",
            });
        }
        Ok(Self::from_raw(raw))
    }

    /// Exact decimal rendering with all 18 fractional digits, no rounding.
    pub fn to_decimal_string(&self) -> String {
        format!(
            "{}.{:0width$}",
            self.raw / SCALE,
            self.raw % SCALE,
            width = FRACTIONAL_DIGITS
        )
    }

    pub fn is_zero(&self) -> bool {
        self.raw == 0
    }

    /// Absolute value. The domain is non-negative, so this is the identity.
    pub fn abs(self) -> Self {
        self
    }

    /// Restrict `self` to `[low, high]`.
    pub fn clamp(self, low: Self, high: Self) -> Result<Self, FixedPointError> {
        if low > high {
            return Err(FixedPointError::InvalidBounds);
        }
        Ok(self.max(low).min(high))
    }
}

impl fmt::Display for FixedPointValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal_string())
    }
}

impl FromStr for FixedPointValue {
    type Err = FixedPointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_decimal_string(s)
    }
}

// Wire format is the exact decimal string.
impl Serialize for FixedPointValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_decimal_string())
    }
}

impl<'de> Deserialize<'de> for FixedPointValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_decimal_string(&s).map_err(serde::de::Error::custom)
    }
}
