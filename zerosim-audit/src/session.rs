use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;
use tracing::debug;
use zerosim_math::ErrorKind;

use crate::canonical::{sha256_hex, to_canonical_json};
use crate::entry::{OperationLogEntry, ZERO_HASH};
use crate::metadata::RestrictedMetadata;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Audit session is finalized; no further entries may be appended")]
    SessionFinalized,
    #[error("Hash chain broken at entry {index}: {reason}")]
    ChainBroken { index: usize, reason: &'static str },
    #[error("Entry {index} hash does not match its contents")]
    HashMismatch { index: usize },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AuditError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Value
    }
}

/// Lifecycle of a session: appends are accepted only while `Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Open,
    Finalized,
}

/// Caller-owned, append-only, hash-chained log for one unit of work.
///
/// A session starts `Open`. Asking for its hash, its canonical text or an
/// export finalizes it; after that every append fails with
/// [`AuditError::SessionFinalized`]. Sessions are never shared: each unit of
/// work builds its own.
#[derive(Debug, Clone)]
pub struct AuditSession {
    entries: Vec<OperationLogEntry>,
    state: SessionState,
    pqc_cid: Option<String>,
    quantum_metadata: Option<RestrictedMetadata>,
}

impl Default for AuditSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditSession {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            state: SessionState::Open,
            pqc_cid: None,
            quantum_metadata: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == SessionState::Open
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[OperationLogEntry] {
        &self.entries
    }

    /// `entry_hash` of the newest entry, or [`ZERO_HASH`] when empty.
    pub fn head_hash(&self) -> &str {
        self.entries
            .last()
            .map(OperationLogEntry::entry_hash)
            .unwrap_or(ZERO_HASH)
    }

    pub fn ensure_open(&self) -> Result<(), AuditError> {
        match self.state {
            SessionState::Open => Ok(()),
            SessionState::Finalized => Err(AuditError::SessionFinalized),
        }
    }

    /// Correlation id attached to every subsequent entry.
    pub fn set_pqc_cid(&mut self, pqc_cid: Option<String>) -> Result<(), AuditError> {
        self.ensure_open()?;
        self.pqc_cid = pqc_cid;
        Ok(())
    }

    /// Provenance metadata attached to every subsequent entry.
    pub fn set_quantum_metadata(
        &mut self,
        metadata: Option<RestrictedMetadata>,
    ) -> Result<(), AuditError> {
        self.ensure_open()?;
        self.quantum_metadata = metadata;
        Ok(())
    }

    /// Append one entry, linking it to the current head.
    ///
    /// `pqc_cid` and `metadata` override the session-level attribution for
    /// this entry only. Nothing is appended if sealing the entry fails.
    pub fn log_operation(
        &mut self,
        op_name: &str,
        inputs: &[u128],
        result: u128,
        pqc_cid: Option<&str>,
        metadata: Option<&RestrictedMetadata>,
    ) -> Result<&OperationLogEntry, AuditError> {
        self.ensure_open()?;

        let pqc_cid = pqc_cid.map(str::to_string).or_else(|| self.pqc_cid.clone());
        let metadata = metadata
            .cloned()
            .or_else(|| self.quantum_metadata.clone())
            .filter(|m| !m.is_empty());
        let log_index = self.entries.len() as u64;

        let entry = OperationLogEntry::seal(
            op_name,
            inputs,
            result,
            pqc_cid,
            metadata,
            log_index,
            self.head_hash(),
        )?;
        debug!(op = op_name, index = log_index, "appended audit entry");

        let index = self.entries.len();
        self.entries.push(entry);
        Ok(&self.entries[index])
    }

    /// Append with the session-level attribution.
    pub fn record(
        &mut self,
        op_name: &str,
        inputs: &[u128],
        result: u128,
    ) -> Result<&OperationLogEntry, AuditError> {
        self.log_operation(op_name, inputs, result, None, None)
    }

    /// Check indices, genesis, linkage and every `entry_hash`.
    pub fn verify_chain(&self) -> Result<(), AuditError> {
        let mut expected_prev = ZERO_HASH;
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.log_index() != index as u64 {
                return Err(AuditError::ChainBroken {
                    index,
                    reason: "log index out of sequence",
                });
            }
            if entry.prev_hash() != expected_prev {
                return Err(AuditError::ChainBroken {
                    index,
                    reason: "prev_hash does not match previous entry_hash",
                });
            }
            if entry.compute_hash()? != entry.entry_hash() {
                return Err(AuditError::HashMismatch { index });
            }
            expected_prev = entry.entry_hash();
        }
        Ok(())
    }

    /// Verify the chain and close the session to further appends.
    ///
    /// Finalizing twice is a no-op.
    pub fn finalize(&mut self) -> Result<(), AuditError> {
        if self.state == SessionState::Finalized {
            return Ok(());
        }
        self.verify_chain()?;
        self.state = SessionState::Finalized;
        debug!(entries = self.entries.len(), "finalized audit session");
        Ok(())
    }

    /// Canonical JSON of the full ordered entry sequence. Finalizes.
    pub fn canonical_json(&mut self) -> Result<String, AuditError> {
        self.finalize()?;
        Ok(to_canonical_json(&self.entries)?)
    }

    /// SHA-256 over [`Self::canonical_json`]. Finalizes.
    pub fn session_hash(&mut self) -> Result<String, AuditError> {
        let text = self.canonical_json()?;
        Ok(sha256_hex(text.as_bytes()))
    }

    /// Write the canonical JSON as UTF-8 to `writer`. Finalizes.
    pub fn export<W: Write>(&mut self, mut writer: W) -> Result<(), AuditError> {
        let text = self.canonical_json()?;
        writer.write_all(text.as_bytes())?;
        writer.flush()?;
        debug!(entries = self.entries.len(), bytes = text.len(), "exported audit session");
        Ok(())
    }

    /// Export to a file, creating or truncating it. Finalizes.
    pub fn export_to_path(&mut self, path: impl AsRef<Path>) -> Result<(), AuditError> {
        let file = File::create(path.as_ref())?;
        self.export(BufWriter::new(file))
    }

    /// Rebuild a finalized session from exported canonical JSON.
    ///
    /// The chain is verified before the session is returned, so its
    /// `session_hash` equals the one computed before export.
    pub fn from_canonical_json(text: &str) -> Result<Self, AuditError> {
        let entries: Vec<OperationLogEntry> = serde_json::from_str(text)?;
        let session = Self {
            entries,
            state: SessionState::Finalized,
            pqc_cid: None,
            quantum_metadata: None,
        };
        session.verify_chain()?;
        Ok(session)
    }
}
