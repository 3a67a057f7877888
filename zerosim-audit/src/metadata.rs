use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::canonical::canonicalize;

/// Keys permitted in quantum-hardware provenance metadata.
pub const QUANTUM_METADATA_ALLOWED_KEYS: &[&str] = &[
    "device_id",
    "entropy_id",
    "entropy_source",
    "seed",
    "seed_id",
    "source_id",
];

/// Provenance metadata restricted to [`QUANTUM_METADATA_ALLOWED_KEYS`].
///
/// Filtering happens here, at the log boundary, whatever the caller claims
/// to have validated upstream. Values are stored canonicalized so nested
/// objects hash the same regardless of insertion order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, Value>", into = "BTreeMap<String, Value>")]
pub struct RestrictedMetadata {
    fields: BTreeMap<String, Value>,
}

impl RestrictedMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_allowed_key(key: &str) -> bool {
        QUANTUM_METADATA_ALLOWED_KEYS.contains(&key)
    }

    /// Build from arbitrary pairs, dropping every key outside the allow-list.
    pub fn filtered<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut metadata = Self::new();
        for (key, value) in pairs {
            metadata.insert(key, value);
        }
        metadata
    }

    /// Insert an allowed key. Returns `false` (and stores nothing) otherwise.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> bool {
        let key = key.into();
        if !Self::is_allowed_key(&key) {
            warn!(key = %key, "dropping metadata key outside allow-list");
            return false;
        }
        self.fields.insert(key, canonicalize(value));
        true
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }
}

// Deserialization is strict: an export carrying a disallowed key was not
// written by this crate and is rejected rather than silently rewritten.
impl TryFrom<BTreeMap<String, Value>> for RestrictedMetadata {
    type Error = String;

    fn try_from(fields: BTreeMap<String, Value>) -> Result<Self, Self::Error> {
        if let Some(bad) = fields.keys().find(|k| !Self::is_allowed_key(k)) {
            return Err(format!("metadata key {:?} is not allowed", bad));
        }
        Ok(Self {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k, canonicalize(v)))
                .collect(),
        })
    }
}

impl From<RestrictedMetadata> for BTreeMap<String, Value> {
    fn from(metadata: RestrictedMetadata) -> Self {
        metadata.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filtered_drops_unknown_keys() {
        let metadata = RestrictedMetadata::filtered(vec![
            ("entropy_source", json!("qrng-7")),
            ("seed", json!(42)),
            ("operator_password", json!("hunter2")),
            ("timestamp", json!(1_700_000_000)),
        ]);
        assert_eq!(metadata.len(), 2);
        assert_eq!(metadata.get("seed"), Some(&json!(42)));
        assert!(metadata.get("operator_password").is_none());
        assert!(metadata.get("timestamp").is_none());
    }

    #[test]
    fn test_insert_reports_rejection() {
        let mut metadata = RestrictedMetadata::new();
        assert!(metadata.insert("device_id", json!("ibm-q-1")));
        assert!(!metadata.insert("raw_samples", json!([1, 2, 3])));
        assert_eq!(metadata.len(), 1);
    }

    #[test]
    fn test_serializes_as_sorted_map() {
        let metadata = RestrictedMetadata::filtered(vec![
            ("source_id", json!({"b": 2, "a": 1})),
            ("device_id", json!("dev")),
        ]);
        let text = serde_json::to_string(&metadata).unwrap();
        assert_eq!(text, r#"{"device_id":"dev","source_id":{"a":1,"b":2}}"#);
    }

    #[test]
    fn test_deserialize_rejects_disallowed_key() {
        let ok: RestrictedMetadata = serde_json::from_str(r#"{"seed_id":"s1"}"#).unwrap();
        assert_eq!(ok.get("seed_id"), Some(&json!("s1")));
        assert!(serde_json::from_str::<RestrictedMetadata>(r#"{"user":"x"}"#).is_err());
    }
}
