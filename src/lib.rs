//! # zerosim
//!
//! Zero-Simulation kernel: deterministic UQ128.18 fixed-point arithmetic and
//! transcendental functions whose every successful call is recorded in a
//! caller-owned, hash-chained audit session.
//!
//! - [`math`]: values, checked arithmetic, fixed-iteration functions
//! - [`audit`]: sessions, entries, canonical hashing
//! - [`kernel`]: the audited API layer, configuration and proof vectors

pub use zerosim_audit as audit;
pub use zerosim_kernel as kernel;
pub use zerosim_math as math;

pub use zerosim_audit::{AuditError, AuditSession, OperationLogEntry, RestrictedMetadata};
pub use zerosim_kernel::{api, Kernel, KernelConfig, KernelError, ProofVector};
pub use zerosim_math::{ErrorKind, FixedPointError, FixedPointValue, SCALE};
