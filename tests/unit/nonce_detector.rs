//! Unit tests for NonceReuseDetector over generated signature tables

use crate::common::{signature_row, signature_table};
use address_tagger::nonce::NonceReuseDetector;

#[test]
fn test_all_distinct_no_flags() {
    let rows: Vec<String> = (0..10)
        .map(|i| signature_row("abc", &format!("r{}", i), &format!("s{}", i)))
        .collect();
    let scan = NonceReuseDetector::default()
        .scan_reader(signature_table(&rows).as_bytes())
        .unwrap();
    assert!(scan.flagged.is_empty());
    assert_eq!(scan.stats.rows_read, 10);
}

#[test]
fn test_same_r_different_s_not_flagged() {
    let rows = vec![signature_row("abc", "r1", "s1"), signature_row("abc", "r1", "s2")];
    let scan = NonceReuseDetector::default()
        .scan_reader(signature_table(&rows).as_bytes())
        .unwrap();
    assert!(scan.flagged.is_empty());
}

#[test]
fn test_many_duplicates_one_flag() {
    let mut rows = Vec::new();
    for _ in 0..3 {
        rows.push(signature_row("abc", "r1", "s1"));
        rows.push(signature_row("abc", "r2", "s2"));
    }
    rows.push(signature_row("other", "r3", "s3"));
    let scan = NonceReuseDetector::default()
        .scan_reader(signature_table(&rows).as_bytes())
        .unwrap();

    assert_eq!(scan.flagged.len(), 1);
    assert!(scan.flagged.contains("abc"));
    assert_eq!(scan.stats.transactions_seen, 2);
}

#[test]
fn test_header_only_table() {
    let scan = NonceReuseDetector::default()
        .scan_reader(signature_table(&[]).as_bytes())
        .unwrap();
    assert!(scan.flagged.is_empty());
    assert_eq!(scan.stats.rows_read, 0);
}
