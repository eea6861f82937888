//! Outbound destination frequencies across all tagged addresses

use super::exclusion::ServiceExclusion;
use crate::registry::KnownAddressRegistry;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Occurrence counts keyed by address (or identity label once folded)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyCounter {
    counts: HashMap<String, u64>,
}

/// One line of a ranked view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    pub key: String,
    pub count: u64,
}

impl FrequencyCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: &str, count: u64) {
        *self.counts.entry(key.to_string()).or_insert(0) += count;
    }

    pub fn get(&self, key: &str) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Descending by count, ties broken by key
    pub fn ranked(&self) -> Vec<RankedEntry> {
        let mut entries: Vec<RankedEntry> = self
            .counts
            .iter()
            .map(|(key, count)| RankedEntry {
                key: key.clone(),
                count: *count,
            })
            .collect();
        entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
        entries
    }

    /// Drops excluded service addresses and merges known addresses under their identity
    pub fn folded(
        &self,
        registry: &KnownAddressRegistry,
        exclusion: &ServiceExclusion,
    ) -> FrequencyCounter {
        let mut folded = FrequencyCounter::new();
        for (address, count) in &self.counts {
            if exclusion.is_excluded(address) {
                continue;
            }
            match registry.identity_of(address) {
                Some(identity) => folded.add(identity, *count),
                None => folded.add(address, *count),
            }
        }
        folded
    }
}

/// Two views over outgoing destinations: the first destination of each
/// address, and every distinct destination it ever paid
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutboundAddressAggregator {
    primary: FrequencyCounter,
    any: FrequencyCounter,
}

impl OutboundAddressAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, out_addresses: &[String]) {
        if let Some(first) = out_addresses.first() {
            self.primary.add(first, 1);
        }
        let distinct: BTreeSet<&str> = out_addresses.iter().map(String::as_str).collect();
        for address in distinct {
            self.any.add(address, 1);
        }
    }

    pub fn primary(&self) -> &FrequencyCounter {
        &self.primary
    }

    pub fn any(&self) -> &FrequencyCounter {
        &self.any
    }
}
