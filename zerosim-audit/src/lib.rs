//! # zerosim-audit
//!
//! Tamper-evident operation log for the Zero-Simulation kernel.
//!
//! Key types:
//! - [`AuditSession`]: caller-owned, append-only sequence of entries with an
//!   `Open -> Finalized` lifecycle
//! - [`OperationLogEntry`]: one successful operation, sealed with a SHA-256
//!   `entry_hash` and linked to its predecessor through `prev_hash`
//! - [`RestrictedMetadata`]: provenance metadata filtered to a fixed allow-list
//!
//! All hashes are computed over the canonical JSON form in [`canonical`], so
//! identical operation sequences yield byte-identical session hashes.

pub mod canonical;
pub mod entry;
pub mod metadata;
pub mod session;

pub use canonical::{canonical_hash, sha256_hex, to_canonical_json};
pub use entry::{OperationLogEntry, ZERO_HASH};
pub use metadata::{RestrictedMetadata, QUANTUM_METADATA_ALLOWED_KEYS};
pub use session::{AuditError, AuditSession, SessionState};
