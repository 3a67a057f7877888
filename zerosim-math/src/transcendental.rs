//! Fixed-iteration transcendental functions.
//!
//! Every function runs exactly the number of iterations or series terms it is
//! given. Nothing stops early on convergence and nothing touches native
//! floating point, so results are bit-identical on every platform.
//!
//! Series terms are evaluated at 36 fractional digits (see [`crate::wide`])
//! and truncated toward zero to the public 18-digit scale. A result that is
//! still negative after truncation is an [`FixedPointError::Underflow`].

use num_bigint::{BigInt, BigUint};
use num_traits::{ToPrimitive, Zero};

use crate::fixed_point::{FixedPointError, FixedPointValue, SCALE};
use crate::ops::{mul_raw, PHI};
use crate::wide::{self, consts};

pub const DEFAULT_SQRT_ITERATIONS: u32 = 20;
pub const DEFAULT_PHI_SERIES_TERMS: u32 = 50;
pub const DEFAULT_EXP_TERMS: u32 = 30;
pub const DEFAULT_LN_TERMS: u32 = 40;
pub const DEFAULT_TRIG_TERMS: u32 = 30;
pub const DEFAULT_ERF_TERMS: u32 = 128;
pub const DEFAULT_POW_TERMS: u32 = 40;

pub const MAX_SQRT_ITERATIONS: u32 = 100;
pub const MAX_PHI_SERIES_TERMS: u32 = 1000;
pub const MAX_SERIES_TERMS: u32 = 256;

/// Largest exponent accepted by `exp`; e^48 already exceeds `MAX_VALUE`.
pub const EXP_MAX_ARG: u128 = 48;
// e^-42 < 10^-18, so anything below truncates to zero.
const EXP_UNDERFLOW_ARG: u32 = 42;
// Squarings after dividing the argument by 2^EXP_HALVINGS.
const EXP_HALVINGS: u32 = 8;
/// `erf(x)` is returned as exactly 1 from here on.
pub const ERF_SATURATION: u128 = 6;

/// Numeric functions with a fixed term count, as the audit log names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transcendental {
    Sqrt,
    PhiSeries,
    Exp,
    Ln,
    Sin,
    Cos,
    Tanh,
    Sigmoid,
    Erf,
    Pow,
}

impl Transcendental {
    pub fn op_name(self) -> &'static str {
        match self {
            Transcendental::Sqrt => "sqrt",
            Transcendental::PhiSeries => "phi_series",
            Transcendental::Exp => "exp",
            Transcendental::Ln => "ln",
            Transcendental::Sin => "sin",
            Transcendental::Cos => "cos",
            Transcendental::Tanh => "tanh",
            Transcendental::Sigmoid => "sigmoid",
            Transcendental::Erf => "erf",
            Transcendental::Pow => "pow",
        }
    }

    /// Term count used when the caller does not supply one.
    pub fn default_terms(self) -> u32 {
        match self {
            Transcendental::Sqrt => DEFAULT_SQRT_ITERATIONS,
            Transcendental::PhiSeries => DEFAULT_PHI_SERIES_TERMS,
            Transcendental::Exp | Transcendental::Tanh | Transcendental::Sigmoid => {
                DEFAULT_EXP_TERMS
            }
            Transcendental::Ln => DEFAULT_LN_TERMS,
            Transcendental::Sin | Transcendental::Cos => DEFAULT_TRIG_TERMS,
            Transcendental::Erf => DEFAULT_ERF_TERMS,
            Transcendental::Pow => DEFAULT_POW_TERMS,
        }
    }

    /// Hard upper bound on the term count.
    pub fn max_terms(self) -> u32 {
        match self {
            Transcendental::Sqrt => MAX_SQRT_ITERATIONS,
            Transcendental::PhiSeries => MAX_PHI_SERIES_TERMS,
            _ => MAX_SERIES_TERMS,
        }
    }

    /// Whether a term count of zero is meaningful (identity on the input).
    pub fn accepts_zero_terms(self) -> bool {
        matches!(self, Transcendental::Sqrt | Transcendental::PhiSeries)
    }
}

fn require_terms(op: &'static str, terms: u32) -> Result<(), FixedPointError> {
    if terms == 0 {
        return Err(FixedPointError::Domain {
            op,
            reason: "term count must be at least 1",
        });
    }
    Ok(())
}

/// Newton/Babylonian square root on the scaled integer.
///
/// `z0 = x`, then `z = max(1, (z + x*SCALE/z) / 2)` exactly `iterations`
/// times. Starting from `x` means large inputs need more iterations to
/// settle; the count is never adjusted to compensate.
pub fn sqrt(x: FixedPointValue, iterations: u32) -> Result<FixedPointValue, FixedPointError> {
    if x.is_zero() {
        return Ok(FixedPointValue::ZERO);
    }
    let one = BigUint::from(1u32);
    let scaled = BigUint::from(x.raw()) * SCALE;
    let mut z = BigUint::from(x.raw());
    for _ in 0..iterations {
        let term = &scaled / &z;
        z = ((&z + term) >> 1usize).max(one.clone());
    }
    z.to_u128()
        .map(FixedPointValue::from_raw)
        .ok_or(FixedPointError::Overflow { op: "sqrt" })
}

/// Multiply `x` by φ exactly `n` times, each step checked like `mul`.
pub fn phi_series(x: FixedPointValue, n: u32) -> Result<FixedPointValue, FixedPointError> {
    let mut acc = x.raw();
    for _ in 0..n {
        acc = mul_raw(acc, PHI.raw(), "phi_series")?;
    }
    Ok(FixedPointValue::from_raw(acc))
}

/// e^x by argument halving, a Taylor series of `terms` terms, then squaring.
pub(crate) fn exp_wide(x: &BigInt, terms: u32) -> BigInt {
    let c = consts();
    let floor = -(BigInt::from(EXP_UNDERFLOW_ARG) * &c.one);
    if x < &floor {
        return BigInt::zero();
    }
    let r = x / BigInt::from(1u32 << EXP_HALVINGS);
    let mut term = c.one.clone();
    let mut sum = c.one.clone();
    for i in 1..terms {
        term = wide::mul(&term, &r) / BigInt::from(i);
        sum += &term;
    }
    for _ in 0..EXP_HALVINGS {
        sum = wide::mul(&sum, &sum);
    }
    sum
}

/// ln x for positive `x`: scale into [1, 2) by powers of two, then
/// ln m = 2 atanh((m - 1) / (m + 1)) with `terms` odd-power terms.
pub(crate) fn ln_wide(x: &BigInt, terms: u32) -> BigInt {
    let c = consts();
    let two = &c.one << 1usize;
    let mut m = x.clone();
    let mut k: i64 = 0;
    while m >= two {
        m >>= 1usize;
        k += 1;
    }
    while m < c.one {
        m <<= 1usize;
        k -= 1;
    }
    let z = wide::div(&(&m - &c.one), &(&m + &c.one));
    let z2 = wide::mul(&z, &z);
    let mut power = z;
    let mut sum = BigInt::zero();
    for n in 0..terms {
        sum += &power / BigInt::from(2 * n + 1);
        power = wide::mul(&power, &z2);
    }
    sum * BigInt::from(2) + BigInt::from(k) * &c.ln2
}

/// Reduce a non-negative angle into (-π, π].
fn reduce_angle(x: &BigInt) -> BigInt {
    let c = consts();
    let mut r = x % &c.two_pi;
    if r > c.pi {
        r -= &c.two_pi;
    }
    r
}

fn sin_wide(x: &BigInt, terms: u32) -> BigInt {
    let r = reduce_angle(x);
    let r2 = wide::mul(&r, &r);
    let mut term = r.clone();
    let mut sum = r;
    for n in 1..terms {
        let n = u64::from(n);
        term = -wide::mul(&term, &r2) / BigInt::from((2 * n) * (2 * n + 1));
        sum += &term;
    }
    sum
}

fn cos_wide(x: &BigInt, terms: u32) -> BigInt {
    let c = consts();
    let r = reduce_angle(x);
    let r2 = wide::mul(&r, &r);
    let mut term = c.one.clone();
    let mut sum = c.one.clone();
    for n in 1..terms {
        let n = u64::from(n);
        term = -wide::mul(&term, &r2) / BigInt::from((2 * n - 1) * (2 * n));
        sum += &term;
    }
    sum
}

/// erf x = 2/√π · e^(-x²) · Σ 2^n x^(2n+1) / (1·3·…·(2n+1))
///
/// Every term is positive, so there is no cancellation for larger `x`.
fn erf_wide(x: &BigInt, terms: u32) -> BigInt {
    let c = consts();
    if x >= &(BigInt::from(ERF_SATURATION) * &c.one) {
        return c.one.clone();
    }
    let x2 = wide::mul(x, x);
    let two_x2 = &x2 * BigInt::from(2);
    let mut term = x.clone();
    let mut sum = x.clone();
    for n in 1..terms {
        term = wide::mul(&term, &two_x2) / BigInt::from(2 * n + 1);
        sum += &term;
    }
    let damped = wide::mul(&exp_wide(&-x2, terms), &sum);
    wide::div(&(damped * BigInt::from(2)), &c.sqrt_pi)
}

/// e^x, failing before any work when `x > EXP_MAX_ARG`.
pub fn exp(x: FixedPointValue, terms: u32) -> Result<FixedPointValue, FixedPointError> {
    require_terms("exp", terms)?;
    if x.raw() > EXP_MAX_ARG * SCALE {
        return Err(FixedPointError::Overflow { op: "exp" });
    }
    let result = exp_wide(&wide::lift(x.raw()), terms);
    wide::lower(&result, "exp").map(FixedPointValue::from_raw)
}

/// Natural logarithm. `ln(0)` is a domain error; `x < 1` underflows.
pub fn ln(x: FixedPointValue, terms: u32) -> Result<FixedPointValue, FixedPointError> {
    require_terms("ln", terms)?;
    if x.is_zero() {
        return Err(FixedPointError::Domain {
            op: "ln",
            reason: "logarithm of zero",
        });
    }
    let result = ln_wide(&wide::lift(x.raw()), terms);
    wide::lower(&result, "ln").map(FixedPointValue::from_raw)
}

/// Sine of `x` radians. Negative results underflow.
pub fn sin(x: FixedPointValue, terms: u32) -> Result<FixedPointValue, FixedPointError> {
    require_terms("sin", terms)?;
    let result = sin_wide(&wide::lift(x.raw()), terms);
    wide::lower(&result, "sin").map(FixedPointValue::from_raw)
}

/// Cosine of `x` radians. Negative results underflow.
pub fn cos(x: FixedPointValue, terms: u32) -> Result<FixedPointValue, FixedPointError> {
    require_terms("cos", terms)?;
    let result = cos_wide(&wide::lift(x.raw()), terms);
    wide::lower(&result, "cos").map(FixedPointValue::from_raw)
}

/// tanh x = (1 - e^(-2x)) / (1 + e^(-2x))
pub fn tanh(x: FixedPointValue, terms: u32) -> Result<FixedPointValue, FixedPointError> {
    require_terms("tanh", terms)?;
    let c = consts();
    let decay = exp_wide(&-(wide::lift(x.raw()) * BigInt::from(2)), terms);
    let result = wide::div(&(&c.one - &decay), &(&c.one + &decay));
    wide::lower(&result, "tanh").map(FixedPointValue::from_raw)
}

/// sigmoid x = 1 / (1 + e^(-x))
pub fn sigmoid(x: FixedPointValue, terms: u32) -> Result<FixedPointValue, FixedPointError> {
    require_terms("sigmoid", terms)?;
    let c = consts();
    let decay = exp_wide(&-wide::lift(x.raw()), terms);
    let result = wide::div(&c.one, &(&c.one + &decay));
    wide::lower(&result, "sigmoid").map(FixedPointValue::from_raw)
}

/// Error function; exactly 1 for `x >= ERF_SATURATION`.
pub fn erf(x: FixedPointValue, terms: u32) -> Result<FixedPointValue, FixedPointError> {
    require_terms("erf", terms)?;
    let result = erf_wide(&wide::lift(x.raw()), terms);
    wide::lower(&result, "erf").map(FixedPointValue::from_raw)
}

/// x^y = e^(y ln x), with `0^0 = 1` and `0^y = 0` for `y > 0`.
///
/// `terms` drives both the logarithm and the exponential. The exponent is
/// checked against `EXP_MAX_ARG` before the exponential is evaluated.
pub fn pow(
    x: FixedPointValue,
    y: FixedPointValue,
    terms: u32,
) -> Result<FixedPointValue, FixedPointError> {
    require_terms("pow", terms)?;
    if x.is_zero() {
        return Ok(if y.is_zero() {
            FixedPointValue::ONE
        } else {
            FixedPointValue::ZERO
        });
    }
    let c = consts();
    let exponent = wide::mul(&ln_wide(&wide::lift(x.raw()), terms), &wide::lift(y.raw()));
    if exponent > BigInt::from(EXP_MAX_ARG) * &c.one {
        return Err(FixedPointError::Overflow { op: "pow" });
    }
    let result = exp_wide(&exponent, terms);
    wide::lower(&result, "pow").map(FixedPointValue::from_raw)
}

/// Dispatch a single-argument function by name.
pub fn evaluate(
    function: Transcendental,
    x: FixedPointValue,
    terms: u32,
) -> Result<FixedPointValue, FixedPointError> {
    match function {
        Transcendental::Sqrt => sqrt(x, terms),
        Transcendental::PhiSeries => phi_series(x, terms),
        Transcendental::Exp => exp(x, terms),
        Transcendental::Ln => ln(x, terms),
        Transcendental::Sin => sin(x, terms),
        Transcendental::Cos => cos(x, terms),
        Transcendental::Tanh => tanh(x, terms),
        Transcendental::Sigmoid => sigmoid(x, terms),
        Transcendental::Erf => erf(x, terms),
        Transcendental::Pow => Err(FixedPointError::Domain {
            op: "pow",
            reason: "pow takes two operands",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1e-9 at the 18-digit scale
    const TOL: u128 = 1_000_000_000;

    fn fp(s: &str) -> FixedPointValue {
        FixedPointValue::from_decimal_string(s).unwrap()
    }

    fn assert_close(actual: FixedPointValue, expected: u128, tol: u128) {
        let diff = actual.raw().abs_diff(expected);
        assert!(
            diff <= tol,
            "{} differs from {} by {} raw units",
            actual,
            FixedPointValue::from_raw(expected),
            diff
        );
    }

    #[test]
    fn test_sqrt_exact_squares() {
        assert_eq!(sqrt(FixedPointValue::ZERO, 20).unwrap(), FixedPointValue::ZERO);
        assert_close(sqrt(fp("4"), 20).unwrap(), 2 * SCALE, 100_000);
        assert_eq!(sqrt(fp("9"), 20).unwrap(), fp("3"));
        assert_eq!(sqrt(fp("0.25"), 20).unwrap(), fp("0.5"));
    }

    #[test]
    fn test_sqrt_iteration_count_is_honored() {
        // One Newton step from z0 = 4: (4 + 1) / 2
        assert_eq!(sqrt(fp("4"), 1).unwrap(), fp("2.5"));
        assert_eq!(sqrt(fp("4"), 0).unwrap(), fp("4"));
    }

    #[test]
    fn test_phi_series() {
        assert_eq!(phi_series(fp("1"), 1).unwrap(), PHI);
        assert_eq!(phi_series(fp("7"), 0).unwrap(), fp("7"));
        // φ² = φ + 1, up to truncation
        assert_close(phi_series(fp("1"), 2).unwrap(), PHI.raw() + SCALE, 10);
        let err = phi_series(FixedPointValue::MAX, 1).unwrap_err();
        assert_eq!(err, FixedPointError::Overflow { op: "phi_series" });
    }

    #[test]
    fn test_exp_reference() {
        assert_eq!(exp(FixedPointValue::ZERO, 30).unwrap(), FixedPointValue::ONE);
        assert_close(exp(fp("1"), 30).unwrap(), 2_718_281_828_459_045_235, TOL);
        assert_close(exp(fp("0.5"), 30).unwrap(), 1_648_721_270_700_128_146, TOL);
        assert_eq!(
            exp(fp("48.000000000000000001"), 30).unwrap_err(),
            FixedPointError::Overflow { op: "exp" }
        );
        assert_eq!(
            exp(fp("48"), 30).unwrap_err(),
            FixedPointError::Overflow { op: "exp" }
        );
        assert!(exp(fp("47"), 30).is_ok());
    }

    #[test]
    fn test_ln_reference() {
        assert_eq!(ln(FixedPointValue::ONE, 40).unwrap(), FixedPointValue::ZERO);
        assert_close(ln(fp("2.718281828"), 40).unwrap(), SCALE, TOL);
        assert_close(ln(fp("2"), 40).unwrap(), 693_147_180_559_945_309, TOL);
        assert_close(ln(fp("10"), 40).unwrap(), 2_302_585_092_994_045_684, TOL);
        assert_eq!(ln(fp("0.5"), 40).unwrap_err(), FixedPointError::Underflow { op: "ln" });
        assert_eq!(ln(FixedPointValue::ZERO, 40).unwrap_err().kind(), crate::ErrorKind::Value);
    }

    #[test]
    fn test_trig_reference() {
        assert_eq!(sin(FixedPointValue::ZERO, 30).unwrap(), FixedPointValue::ZERO);
        assert_eq!(cos(FixedPointValue::ZERO, 30).unwrap(), FixedPointValue::ONE);
        assert_close(sin(fp("1"), 30).unwrap(), 841_470_984_807_896_506, TOL);
        assert_close(cos(fp("1"), 30).unwrap(), 540_302_305_868_139_717, TOL);
        // sin(2π + 1) == sin(1) after reduction
        assert_close(sin(fp("7.283185307179586476"), 30).unwrap(), 841_470_984_807_896_506, TOL);
        assert_eq!(sin(fp("4"), 30).unwrap_err(), FixedPointError::Underflow { op: "sin" });
        assert_eq!(cos(fp("2"), 30).unwrap_err(), FixedPointError::Underflow { op: "cos" });
    }

    #[test]
    fn test_tanh_sigmoid_reference() {
        assert_eq!(tanh(FixedPointValue::ZERO, 30).unwrap(), FixedPointValue::ZERO);
        assert_eq!(sigmoid(FixedPointValue::ZERO, 30).unwrap(), fp("0.5"));
        assert_close(tanh(fp("1"), 30).unwrap(), 761_594_155_955_764_888, TOL);
        assert_close(sigmoid(fp("1"), 30).unwrap(), 731_058_578_630_004_879, TOL);
        // Saturates without error for large inputs
        assert_eq!(tanh(fp("1000"), 30).unwrap(), FixedPointValue::ONE);
    }

    #[test]
    fn test_erf_reference() {
        assert_eq!(erf(FixedPointValue::ZERO, 128).unwrap(), FixedPointValue::ZERO);
        assert_close(erf(fp("1"), 128).unwrap(), 842_700_792_949_714_869, 1_000_000_000_000);
        assert_close(erf(fp("2"), 128).unwrap(), 995_322_265_018_952_734, 1_000_000_000_000);
        assert_eq!(erf(fp("6"), 128).unwrap(), FixedPointValue::ONE);
    }

    #[test]
    fn test_pow() {
        assert_eq!(pow(FixedPointValue::ZERO, FixedPointValue::ZERO, 40).unwrap(), FixedPointValue::ONE);
        assert_eq!(pow(FixedPointValue::ZERO, fp("2"), 40).unwrap(), FixedPointValue::ZERO);
        assert_close(pow(fp("2"), fp("10"), 40).unwrap(), 1024 * SCALE, TOL);
        assert_close(pow(fp("0.5"), fp("2"), 40).unwrap(), SCALE / 4, TOL);
        assert_eq!(
            pow(fp("10"), fp("100"), 40).unwrap_err(),
            FixedPointError::Overflow { op: "pow" }
        );
    }

    #[test]
    fn test_zero_terms_rejected() {
        assert_eq!(exp(fp("1"), 0).unwrap_err().kind(), crate::ErrorKind::Value);
        assert_eq!(erf(fp("1"), 0).unwrap_err().kind(), crate::ErrorKind::Value);
    }

    #[test]
    fn test_transcendental_metadata() {
        assert_eq!(Transcendental::PhiSeries.op_name(), "phi_series");
        assert_eq!(Transcendental::Sqrt.default_terms(), DEFAULT_SQRT_ITERATIONS);
        assert_eq!(Transcendental::Erf.max_terms(), MAX_SERIES_TERMS);
        assert!(Transcendental::Sqrt.accepts_zero_terms());
        assert!(!Transcendental::Exp.accepts_zero_terms());
        assert!(evaluate(Transcendental::Pow, fp("1"), 10).is_err());
        assert_eq!(evaluate(Transcendental::Exp, fp("0"), 10).unwrap(), FixedPointValue::ONE);
    }
}
