//! Tagging pipeline integration tests
//!
//! Runs the full engine: build records, scan signatures, merge and persist.

use crate::common::{
    signature_row, signature_table, write_address_document, write_signature_table,
    HistoryBuilder, GOMEZ_1, KJ_1,
};
use address_tagger::config::{SignatureTableLayout, TaggingPolicy};
use address_tagger::errors::AppError;
use address_tagger::input::discover_address_files;
use address_tagger::processor::TaggingEngine;
use address_tagger::registry::KnownAddressRegistry;
use address_tagger::types::{AddressHistory, TagEntry};
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;

const T1: i64 = 1_387_929_600;

fn engine() -> TaggingEngine {
    TaggingEngine::new(
        KnownAddressRegistry::default(),
        TaggingPolicy::default(),
        SignatureTableLayout::default(),
    )
}

fn sample_histories() -> Vec<AddressHistory> {
    vec![
        HistoryBuilder::new("1VictimA")
            .balance(0)
            .spend(T1, &[KJ_1, "1X"])
            .receive(T1 - 100, "1Funder")
            .build(),
        HistoryBuilder::new("1VictimB")
            .balance(2500)
            .spend(T1 + 50, &["1Y"])
            .build(),
    ]
}

#[test]
fn test_attacker_scenario() {
    let outcome = engine()
        .run(sample_histories(), None::<&[u8]>)
        .expect("run should succeed");

    let record = outcome.store.address("1VictimA").unwrap();
    assert_eq!(record.attacker_name.as_deref(), Some("KJ"));
    assert_eq!(record.attacker_times, vec![T1]);
    assert_eq!(record.last_out_time, Some(T1));
    assert!(record.out_addresses.contains(&KJ_1.to_string()));
    assert!(record.out_addresses.contains(&"1X".to_string()));

    let other = outcome.store.address("1VictimB").unwrap();
    assert_eq!(other.balance, 2500);
    assert!(other.attacker_name.is_none());
}

#[test]
fn test_repeated_nonce_scenario() {
    let table = signature_table(&[
        signature_row("abc", "r1", "s1"),
        signature_row("abc", "r1", "s1"),
    ]);
    let outcome = engine()
        .run(Vec::new(), Some(table.as_bytes()))
        .unwrap();

    let merged = outcome.store.merged();
    let value = serde_json::to_value(&merged["abc"]).unwrap();
    assert_eq!(value, json!({ "repeated-r": true }));
    assert_eq!(outcome.stats.nonce_scan.transactions_flagged, 1);
}

#[test]
fn test_runs_are_idempotent() {
    let table = signature_table(&[
        signature_row("abc", "r1", "s1"),
        signature_row("abc", "r1", "s1"),
        signature_row("def", "r2", "s2"),
    ]);

    let first = engine()
        .run(sample_histories(), Some(table.as_bytes()))
        .unwrap();
    let second = engine()
        .run(sample_histories(), Some(table.as_bytes()))
        .unwrap();

    assert_eq!(first.store, second.store);
    assert_eq!(first.store.to_json().unwrap(), second.store.to_json().unwrap());
    assert_eq!(first.aggregator, second.aggregator);
}

#[test]
fn test_run_files_writes_store() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    for history in sample_histories() {
        write_address_document(dir.path(), &history);
    }
    let table = write_signature_table(
        dir.path(),
        &[
            signature_row("abc", "r1", "s1"),
            signature_row("abc", "r1", "s1"),
            "too\tshort".to_string(),
        ],
    );
    let output = dir.path().join("tags.json");

    let files = discover_address_files(&format!("{}/1*.json", dir.path().display()))?;
    assert_eq!(files.len(), 2);

    let outcome = engine().run_files(&files, Some(table.as_path()))?;
    outcome.store.write_json(&output)?;

    assert_eq!(outcome.stats.addresses_processed, 2);
    assert_eq!(outcome.stats.nonce_scan.rows_skipped, 1);

    let written: Value = serde_json::from_str(&fs::read_to_string(&output)?)?;
    assert_eq!(written["1VictimA"]["attacker-name"], json!("KJ"));
    assert_eq!(written["1VictimA"]["last-out-time"], json!(T1));
    assert_eq!(written["1VictimB"]["attacker-name"], Value::Null);
    assert_eq!(written["abc"]["repeated-r"], json!(true));
    Ok(())
}

#[test]
fn test_conflict_aborts_before_output() {
    let dir = TempDir::new().unwrap();
    write_address_document(
        dir.path(),
        &HistoryBuilder::new("1Confused")
            .spend(T1, &[KJ_1, GOMEZ_1])
            .build(),
    );
    let output = dir.path().join("tags.json");

    let files = discover_address_files(&format!("{}/1*.json", dir.path().display())).unwrap();
    let result = engine()
        .run_files(&files, None)
        .and_then(|outcome| outcome.store.write_json(&output));

    assert!(matches!(result, Err(AppError::AttributionConflict { .. })));
    assert!(!output.exists());
}

#[test]
fn test_idle_address_policy() {
    let histories = vec![HistoryBuilder::new("1Idle").receive(T1, "1Funder").build()];

    let err = engine().run(histories.clone(), None::<&[u8]>).unwrap_err();
    assert!(matches!(err, AppError::NoOutgoingTransactions { .. }));

    let lenient = TaggingEngine::new(
        KnownAddressRegistry::default(),
        TaggingPolicy {
            require_outgoing: false,
            ..Default::default()
        },
        SignatureTableLayout::default(),
    );
    let outcome = lenient.run(histories, None::<&[u8]>).unwrap();
    let record = outcome.store.address("1Idle").unwrap();
    assert!(record.last_out_time.is_none());
    assert!(record.out_addresses.is_empty());
    assert_eq!(outcome.stats.addresses_without_outgoing, 1);
}

#[test]
fn test_hash_colliding_with_address_is_overwritten_in_output() {
    let histories = vec![HistoryBuilder::new("1Shared").spend(T1, &["1X"]).build()];
    let table = signature_table(&[
        signature_row("1Shared", "r1", "s1"),
        signature_row("1Shared", "r1", "s1"),
    ]);
    let outcome = engine().run(histories, Some(table.as_bytes())).unwrap();

    assert_eq!(outcome.stats.key_collisions, 1);
    assert!(outcome.store.address("1Shared").is_some());
    assert!(matches!(
        outcome.store.merged()["1Shared"],
        TagEntry::NonceReuse(_)
    ));
}
