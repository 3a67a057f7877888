//! Canonical text form used for every hash in the audit log.
//!
//! Canonical JSON here means: object keys in ascending byte order, compact
//! separators (`,` and `:` with no whitespace), integers written in full and
//! `null` for absent optional fields. Structs that are hashed declare their
//! fields in sorted order; free-form JSON is re-sorted by [`canonicalize`]
//! so the result does not depend on map insertion order or on which
//! `serde_json` features are enabled elsewhere in the build.

use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Length of a lowercase hex SHA-256 digest.
pub const HASH_HEX_LEN: usize = 64;

/// Serialize to canonical JSON text.
pub fn to_canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}

/// Lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// SHA-256 over the canonical JSON of `value`.
pub fn canonical_hash<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    to_canonical_json(value).map(|text| sha256_hex(text.as_bytes()))
}

/// Rebuild a JSON value with every object's keys in sorted order.
pub fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut pairs: Vec<(String, Value)> = map.into_iter().collect();
            pairs.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = Map::new();
            for (k, v) in pairs {
                sorted.insert(k, canonicalize(v));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

/// True for a 64-character lowercase hex string.
pub fn is_hash_hex(s: &str) -> bool {
    s.len() == HASH_HEX_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
