//! Forensic address tagger
//!
//! Derives per-address tags (multisig use, destinations, suspected attacker
//! attribution, timing) from explorer transaction histories and flags
//! transactions whose inputs repeat a signature nonce.

pub mod cli;
pub mod config;
pub mod errors;
pub mod input;
pub mod nonce;
pub mod processor;
pub mod registry;
pub mod report;
pub mod store;
pub mod tagger;
pub mod types;
pub mod utils;
