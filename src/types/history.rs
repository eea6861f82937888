//! Raw per-address transaction history as delivered by the address export
//!
//! Mirrors the explorer JSON layout (`address`, `final_balance`, `txs[]` with
//! `inputs[].prev_out` and `out[]`). Fields the tagger never reads are ignored
//! during deserialisation.

use serde::{Deserialize, Serialize};

/// Output type code the explorer uses for bare multisig scripts
pub const MULTISIG_TYPE_CODE: u32 = 1;

/// One address document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressHistory {
    pub address: String,
    pub final_balance: i64,
    #[serde(default)]
    pub txs: Vec<RawTransaction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTransaction {
    #[serde(default)]
    pub hash: Option<String>,
    pub time: i64,
    #[serde(default)]
    pub inputs: Vec<RawInput>,
    #[serde(default)]
    pub out: Vec<RawOutput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInput {
    /// Absent for coinbase inputs
    #[serde(default)]
    pub prev_out: Option<PrevOut>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrevOut {
    #[serde(rename = "type")]
    pub kind: u32,
    #[serde(default)]
    pub addr: Option<String>,
    #[serde(default)]
    pub value: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawOutput {
    #[serde(rename = "type")]
    pub kind: u32,
    /// Absent for outputs without a standard address (e.g. OP_RETURN)
    #[serde(default)]
    pub addr: Option<String>,
    #[serde(default)]
    pub value: Option<u64>,
}

impl PrevOut {
    pub fn is_multisig(&self) -> bool {
        self.kind == MULTISIG_TYPE_CODE
    }
}

impl RawOutput {
    pub fn is_multisig(&self) -> bool {
        self.kind == MULTISIG_TYPE_CODE
    }
}

impl RawTransaction {
    /// Identifier used in error messages; the hash when present, the timestamp otherwise
    pub fn label(&self) -> String {
        self.hash
            .clone()
            .unwrap_or_else(|| format!("<tx at {}>", self.time))
    }

    /// True if any input spends a previous output locked to `address`
    pub fn is_spent_by(&self, address: &str) -> bool {
        self.inputs
            .iter()
            .filter_map(|input| input.prev_out.as_ref())
            .any(|prev| prev.addr.as_deref() == Some(address))
    }
}
