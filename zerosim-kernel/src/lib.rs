//! # zerosim-kernel
//!
//! Audited public API of the Zero-Simulation kernel.
//!
//! Key types:
//! - [`Kernel`]: validates, computes and logs every operation into a
//!   caller-owned [`AuditSession`]
//! - [`KernelConfig`]: default term counts and caps, loadable from JSON
//! - [`ProofVector`]: fixed reference values for the transcendental library
//!
//! The free functions in [`api`] use the default configuration.

pub mod api;
pub mod config;
pub mod error;
pub mod proof;

pub use api::Kernel;
pub use config::KernelConfig;
pub use error::KernelError;
pub use proof::{ProofOutcome, ProofReport, ProofVector};
pub use zerosim_audit::AuditSession;
pub use zerosim_math::FixedPointValue;
