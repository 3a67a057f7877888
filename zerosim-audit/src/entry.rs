use serde::{Deserialize, Serialize};

use crate::canonical::canonical_hash;
use crate::metadata::RestrictedMetadata;

/// Genesis marker: the first entry's `prev_hash` is 64 zeros.
pub const ZERO_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// One successfully completed operation.
///
/// Inputs and result are raw scaled integers (comparisons record `1`/`0`).
/// Entries are sealed at construction and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OperationLogEntry {
    // Declaration order is the canonical key order.
    entry_hash: String,
    inputs: Vec<u128>,
    log_index: u64,
    op_name: String,
    pqc_cid: Option<String>,
    prev_hash: String,
    quantum_metadata: Option<RestrictedMetadata>,
    result: u128,
}

/// The hashed portion of an entry: everything except the two chain hashes.
#[derive(Serialize)]
struct EntryBody<'a> {
    inputs: &'a [u128],
    log_index: u64,
    op_name: &'a str,
    pqc_cid: Option<&'a str>,
    quantum_metadata: Option<&'a RestrictedMetadata>,
    result: u128,
}

impl OperationLogEntry {
    pub(crate) fn seal(
        op_name: &str,
        inputs: &[u128],
        result: u128,
        pqc_cid: Option<String>,
        quantum_metadata: Option<RestrictedMetadata>,
        log_index: u64,
        prev_hash: &str,
    ) -> Result<Self, serde_json::Error> {
        let mut entry = Self {
            entry_hash: String::new(),
            inputs: inputs.to_vec(),
            log_index,
            op_name: op_name.to_string(),
            pqc_cid,
            prev_hash: prev_hash.to_string(),
            quantum_metadata,
            result,
        };
        entry.entry_hash = entry.compute_hash()?;
        Ok(entry)
    }

    /// SHA-256 over the canonical JSON of every field except the chain hashes.
    pub fn compute_hash(&self) -> Result<String, serde_json::Error> {
        canonical_hash(&EntryBody {
            inputs: &self.inputs,
            log_index: self.log_index,
            op_name: &self.op_name,
            pqc_cid: self.pqc_cid.as_deref(),
            quantum_metadata: self.quantum_metadata.as_ref(),
            result: self.result,
        })
    }

    pub fn op_name(&self) -> &str {
        &self.op_name
    }

    pub fn inputs(&self) -> &[u128] {
        &self.inputs
    }

    pub fn result(&self) -> u128 {
        self.result
    }

    pub fn pqc_cid(&self) -> Option<&str> {
        self.pqc_cid.as_deref()
    }

    pub fn quantum_metadata(&self) -> Option<&RestrictedMetadata> {
        self.quantum_metadata.as_ref()
    }

    pub fn log_index(&self) -> u64 {
        self.log_index
    }

    pub fn prev_hash(&self) -> &str {
        &self.prev_hash
    }

    pub fn entry_hash(&self) -> &str {
        &self.entry_hash
    }
}
