//! Repeated signature nonce detection
//!
//! The signature table has one row per signed input. Two inputs of the same
//! transaction carrying the same `(r, s)` pair share an ephemeral nonce, which
//! is enough to recover the signing key. Only repeats inside one transaction
//! are detected here.

use crate::config::SignatureTableLayout;
use crate::errors::AppResult;
use crate::types::NonceScanStats;
use csv::{ReaderBuilder, StringRecord};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};

/// The columns of one signature row the detector cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureRow {
    pub tx_hash: String,
    pub r: String,
    pub s: String,
}

impl SignatureRow {
    /// `r` then `s`; order matters
    pub fn nonce_key(&self) -> String {
        format!("{}{}", self.r, self.s)
    }
}

/// Outcome of a scan: flagged hashes in sorted order plus counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NonceScan {
    pub flagged: BTreeSet<String>,
    pub stats: NonceScanStats,
}

pub struct NonceReuseDetector {
    layout: SignatureTableLayout,
}

impl Default for NonceReuseDetector {
    fn default() -> Self {
        Self::new(SignatureTableLayout::default())
    }
}

impl NonceReuseDetector {
    pub fn new(layout: SignatureTableLayout) -> Self {
        Self { layout }
    }

    /// Pick the interesting columns out of a raw row; `None` for short rows
    pub fn parse_row(&self, record: &StringRecord) -> Option<SignatureRow> {
        if record.len() < self.layout.min_fields {
            return None;
        }
        Some(SignatureRow {
            tx_hash: record.get(self.layout.hash_index)?.to_string(),
            r: record.get(self.layout.r_index)?.to_string(),
            s: record.get(self.layout.s_index)?.to_string(),
        })
    }

    pub fn scan_path(&self, path: &Path) -> AppResult<NonceScan> {
        let file = File::open(path)?;
        info!("Scanning signature table {}", path.display());
        self.scan_reader(BufReader::new(file))
    }

    /// Scan a delimited table with a header row
    pub fn scan_reader<R: Read>(&self, reader: R) -> AppResult<NonceScan> {
        let mut csv_reader = ReaderBuilder::new()
            .delimiter(self.layout.delimiter_byte())
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let mut rows = Vec::new();
        let mut skipped = 0;
        for (line_num, result) in csv_reader.records().enumerate() {
            let record = result?;
            match self.parse_row(&record) {
                Some(row) => rows.push(row),
                None => {
                    debug!(
                        "Skipping short signature row {} ({} fields)",
                        line_num + 2,
                        record.len()
                    );
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            warn!("Skipped {} malformed signature rows", skipped);
        }

        let mut scan = self.detect(rows);
        scan.stats.rows_skipped = skipped;
        scan.stats.rows_read += skipped;
        Ok(scan)
    }

    /// Group rows by transaction and flag those with a repeated nonce key
    pub fn detect(&self, rows: impl IntoIterator<Item = SignatureRow>) -> NonceScan {
        let mut by_tx: HashMap<String, Vec<String>> = HashMap::new();
        let mut rows_read = 0;
        for row in rows {
            rows_read += 1;
            let key = row.nonce_key();
            by_tx.entry(row.tx_hash).or_default().push(key);
        }

        let flagged: BTreeSet<String> = by_tx
            .iter()
            .filter(|(_, keys)| has_repeat(keys))
            .map(|(tx_hash, _)| tx_hash.clone())
            .collect();

        for tx_hash in &flagged {
            info!("Repeated nonce in transaction {}", tx_hash);
        }

        NonceScan {
            stats: NonceScanStats {
                rows_read,
                rows_skipped: 0,
                transactions_seen: by_tx.len(),
                transactions_flagged: flagged.len(),
            },
            flagged,
        }
    }
}

fn has_repeat(keys: &[String]) -> bool {
    let mut seen = HashSet::with_capacity(keys.len());
    keys.iter().any(|key| !seen.insert(key.as_str()))
}
