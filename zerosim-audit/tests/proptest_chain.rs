use proptest::prelude::*;
use std::fs;
use zerosim_audit::canonical::is_hash_hex;
use zerosim_audit::{AuditError, AuditSession, ZERO_HASH};

const OPS: &[&str] = &["add", "sub", "mul", "div", "gt", "sqrt", "exp"];

fn build(ops: &[(usize, u128, u128, u128)]) -> AuditSession {
    let mut session = AuditSession::new();
    for &(op, a, b, r) in ops {
        session.record(OPS[op], &[a, b], r).unwrap();
    }
    session
}

fn op_strategy() -> impl Strategy<Value = Vec<(usize, u128, u128, u128)>> {
    prop::collection::vec(
        (0..OPS.len(), any::<u128>(), any::<u128>(), any::<u128>()),
        0..20,
    )
}

// Property 1: every chain built through the session verifies and links
proptest! {
    #[test]
    fn prop_chain_links(ops in op_strategy()) {
        let session = build(&ops);
        prop_assert!(session.verify_chain().is_ok());
        let mut prev = ZERO_HASH.to_string();
        for (i, entry) in session.entries().iter().enumerate() {
            prop_assert_eq!(entry.log_index(), i as u64);
            prop_assert_eq!(entry.prev_hash(), prev.as_str());
            prop_assert!(is_hash_hex(entry.entry_hash()));
            prev = entry.entry_hash().to_string();
        }
    }
}

// Property 2: identical sequences give identical session hashes
proptest! {
    #[test]
    fn prop_session_hash_deterministic(ops in op_strategy()) {
        let h1 = build(&ops).session_hash().unwrap();
        let h2 = build(&ops).session_hash().unwrap();
        prop_assert_eq!(h1, h2);
    }
}

// Property 3: changing any single recorded result changes the session hash
proptest! {
    #[test]
    fn prop_result_change_changes_hash(
        ops in prop::collection::vec(
            (0..OPS.len(), any::<u128>(), any::<u128>(), 0u128..u128::MAX),
            1..10,
        ),
        pick in any::<prop::sample::Index>(),
    ) {
        let original = build(&ops).session_hash().unwrap();
        let mut altered = ops.clone();
        let i = pick.index(altered.len());
        altered[i].3 += 1;
        prop_assert_ne!(original, build(&altered).session_hash().unwrap());
    }
}

// Property 4: export -> import preserves entries and hash
proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]
    #[test]
    fn prop_export_import_roundtrip(ops in op_strategy()) {
        let mut session = build(&ops);
        let hash = session.session_hash().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        session.export_to_path(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let mut imported = AuditSession::from_canonical_json(&text).unwrap();
        prop_assert_eq!(imported.entries(), session.entries());
        prop_assert_eq!(imported.session_hash().unwrap(), hash);
    }
}

// Property 5: finalized sessions never grow
proptest! {
    #[test]
    fn prop_finalized_rejects_appends(ops in op_strategy(), r in any::<u128>()) {
        let mut session = build(&ops);
        session.finalize().unwrap();
        let before = session.len();
        let err = session.record("add", &[0, 0], r).unwrap_err();
        prop_assert!(matches!(err, AuditError::SessionFinalized));
        prop_assert_eq!(session.len(), before);
    }
}
