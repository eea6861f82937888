//! Tag store
//!
//! Address records and nonce flags live in separate maps so a transaction
//! hash can never silently replace an address record in memory. The persisted
//! format is a single flat object; it is produced by `merged`, where nonce
//! flags are written after address records and win on a key collision.

use crate::errors::{AppError, AppResult};
use crate::types::{AddressRecord, NonceReuseFlag, TagEntry};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagStore {
    addresses: BTreeMap<String, AddressRecord>,
    nonce_flags: BTreeMap<String, NonceReuseFlag>,
}

impl TagStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last write wins within the address key-space
    pub fn insert_address(&mut self, record: AddressRecord) {
        self.addresses.insert(record.address.clone(), record);
    }

    pub fn flag_nonce_reuse(&mut self, tx_hash: impl Into<String>) {
        self.nonce_flags
            .insert(tx_hash.into(), NonceReuseFlag::repeated());
    }

    pub fn address(&self, address: &str) -> Option<&AddressRecord> {
        self.addresses.get(address)
    }

    pub fn nonce_flag(&self, tx_hash: &str) -> Option<&NonceReuseFlag> {
        self.nonce_flags.get(tx_hash)
    }

    pub fn addresses(&self) -> impl Iterator<Item = &AddressRecord> {
        self.addresses.values()
    }

    pub fn address_count(&self) -> usize {
        self.addresses.len()
    }

    pub fn flag_count(&self) -> usize {
        self.nonce_flags.len()
    }

    /// Keys present in both key-spaces
    pub fn collisions(&self) -> Vec<String> {
        self.nonce_flags
            .keys()
            .filter(|key| self.addresses.contains_key(key.as_str()))
            .cloned()
            .collect()
    }

    /// Flat key to entry mapping in the persisted layout
    pub fn merged(&self) -> BTreeMap<String, TagEntry> {
        let mut merged: BTreeMap<String, TagEntry> = self
            .addresses
            .iter()
            .map(|(key, record)| (key.clone(), TagEntry::Address(record.clone())))
            .collect();
        for (key, flag) in &self.nonce_flags {
            merged.insert(key.clone(), TagEntry::NonceReuse(*flag));
        }
        merged
    }

    /// Pretty JSON with four-space indentation
    pub fn to_json(&self) -> AppResult<String> {
        let merged = self.merged();
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        merged.serialize(&mut serializer)?;
        String::from_utf8(buf)
            .map_err(|e| AppError::Config(format!("Tag store is not valid UTF-8: {}", e)))
    }

    /// Write the merged store, replacing `path` only once the new content is complete
    pub fn write_json(&self, path: &Path) -> AppResult<()> {
        for key in self.collisions() {
            warn!(
                "Key {} is both an address and a flagged transaction; the flag overwrites the record",
                key
            );
        }

        let json = self.to_json()?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.flush()?;
        tmp.persist(path).map_err(|e| AppError::Io(e.error))?;

        info!(
            "Wrote {} address records and {} nonce flags to {}",
            self.address_count(),
            self.flag_count(),
            path.display()
        );
        Ok(())
    }
}
