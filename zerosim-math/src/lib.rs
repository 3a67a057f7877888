//! # zerosim-math
//!
//! Deterministic unsigned fixed-point arithmetic for the Zero-Simulation kernel.
//!
//! This crate provides [`FixedPointValue`], a u128 scaled by 10^18 (18 exact
//! fractional decimal digits, range `[0, 2^128 - 1]` raw), together with:
//! - checked `add`/`sub`/`mul`/`div` that pre-check bounds and never wrap
//! - exact comparisons ([`Comparison`]) and `abs`/`clamp` helpers
//! - fixed-iteration `sqrt`, `phi_series`, `exp`, `ln`, `sin`, `cos`, `tanh`,
//!   `sigmoid`, `erf` and `pow` in [`transcendental`]
//!
//! Everything here is pure: no logging, no I/O, no native floating point.
//! Audit logging and input validation live in `zerosim-kernel`.

pub mod fixed_point;
pub mod ops;
pub mod transcendental;
mod wide;

pub use fixed_point::{
    ErrorKind, FixedPointError, FixedPointValue, FRACTIONAL_DIGITS, MAX_VALUE, MIN_VALUE, SCALE,
};
pub use ops::{Comparison, PHI};
pub use transcendental::Transcendental;
