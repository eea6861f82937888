//! Tag store entries
//!
//! Serialised field names follow the established `tags.json` layout so that
//! downstream consumers of earlier tag files keep working.

use serde::{Deserialize, Serialize};

/// Attributes derived for one source address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRecord {
    #[serde(skip)]
    pub address: String,
    #[serde(rename = "in-multisig")]
    pub in_multisig: bool,
    #[serde(rename = "out-multisig")]
    pub out_multisig: bool,
    pub balance: i64,
    #[serde(rename = "out-addr")]
    pub out_addresses: Vec<String>,
    #[serde(rename = "attacker-name")]
    pub attacker_name: Option<String>,
    #[serde(rename = "last-out-time")]
    pub last_out_time: Option<i64>,
    #[serde(rename = "attacker-time")]
    pub attacker_times: Vec<i64>,
}

impl AddressRecord {
    /// Fresh record with every attribute at its default
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            in_multisig: false,
            out_multisig: false,
            balance: 0,
            out_addresses: Vec::new(),
            attacker_name: None,
            last_out_time: None,
            attacker_times: Vec::new(),
        }
    }

    pub fn is_attributed(&self) -> bool {
        self.attacker_name.is_some()
    }
}

/// Marker for a transaction whose inputs repeat a signature `(r, s)` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonceReuseFlag {
    #[serde(rename = "repeated-r")]
    pub repeated_nonce: bool,
}

impl NonceReuseFlag {
    pub fn repeated() -> Self {
        Self {
            repeated_nonce: true,
        }
    }
}

/// One value in the persisted tag store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagEntry {
    Address(AddressRecord),
    NonceReuse(NonceReuseFlag),
}
