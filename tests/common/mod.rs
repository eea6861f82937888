//! Common Test Utilities
//!
//! Fixture builders for address documents and signature tables, written into
//! temporary directories so each test works on its own files.

#![allow(dead_code)]

use address_tagger::types::{AddressHistory, PrevOut, RawInput, RawOutput, RawTransaction};
use std::fs;
use std::path::{Path, PathBuf};

pub const KJ_1: &str = "1KtjBE8yDxoqNTSyLG2re4qtKK19KpvVLT";
pub const KJ_2: &str = "1BkE8ttBRUKVNTj3Lx1EPsw7vVbhuLZhBt";
pub const GOMEZ_1: &str = "1GozmcsMBC7bnMVUQLTKEw5vBxbSeG4erW";
pub const GOMEZ_2: &str = "1HKywxiL4JziqXrzLKhmB6a74ma6kxbSDj";
pub const DICE: &str = "1dice8EMZmqKvrGE4Qc9bUFf9PX3xaYDp";

/// Fluent builder for one address history
pub struct HistoryBuilder {
    history: AddressHistory,
}

impl HistoryBuilder {
    pub fn new(address: &str) -> Self {
        Self {
            history: AddressHistory {
                address: address.to_string(),
                final_balance: 0,
                txs: Vec::new(),
            },
        }
    }

    pub fn balance(mut self, balance: i64) -> Self {
        self.history.final_balance = balance;
        self
    }

    /// Transaction spending from the subject address to `destinations`
    pub fn spend(self, time: i64, destinations: &[&str]) -> Self {
        let address = self.history.address.clone();
        self.tx(time, &[(address.as_str(), 0)], destinations, 0)
    }

    /// Transaction paying the subject address from `funder`
    pub fn receive(self, time: i64, funder: &str) -> Self {
        let address = self.history.address.clone();
        self.tx(time, &[(funder, 0)], &[address.as_str()], 0)
    }

    /// Arbitrary transaction; inputs are (previous address, type code)
    pub fn tx(
        mut self,
        time: i64,
        inputs: &[(&str, u32)],
        destinations: &[&str],
        out_type: u32,
    ) -> Self {
        let hash = format!("{:064x}", self.history.txs.len() as u64 + time as u64);
        self.history.txs.push(RawTransaction {
            hash: Some(hash),
            time,
            inputs: inputs
                .iter()
                .map(|(addr, kind)| RawInput {
                    prev_out: Some(PrevOut {
                        kind: *kind,
                        addr: Some(addr.to_string()),
                        value: Some(50_000),
                    }),
                })
                .collect(),
            out: destinations
                .iter()
                .map(|addr| RawOutput {
                    kind: out_type,
                    addr: Some(addr.to_string()),
                    value: Some(10_000),
                })
                .collect(),
        });
        self
    }

    pub fn build(self) -> AddressHistory {
        self.history
    }
}

/// Write `history` as `<dir>/<address>.json`
pub fn write_address_document(dir: &Path, history: &AddressHistory) -> PathBuf {
    let path = dir.join(format!("{}.json", history.address));
    fs::write(&path, serde_json::to_string_pretty(history).unwrap()).unwrap();
    path
}

/// Signature table row with the hash at column 4 and (r, s) at columns 9 and 10
pub fn signature_row(tx_hash: &str, r: &str, s: &str) -> String {
    format!(
        "1Signer\t0\t300000\tpubkey\t{}\t0\tsig\tscript\t01\t{}\t{}",
        tx_hash, r, s
    )
}

pub fn signature_table(rows: &[String]) -> String {
    let mut table =
        String::from("address\tvout\theight\tpubkey\ttx\tin\tsig\tscript\thashtype\tr\ts\n");
    for row in rows {
        table.push_str(row);
        table.push('\n');
    }
    table
}

pub fn write_signature_table(dir: &Path, rows: &[String]) -> PathBuf {
    let path = dir.join("analyzr.tsv");
    fs::write(&path, signature_table(rows)).unwrap();
    path
}
