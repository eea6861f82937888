//! Builds one tag record from one address history

use super::aggregator::OutboundAddressAggregator;
use crate::config::TaggingPolicy;
use crate::errors::{AppError, AppResult};
use crate::registry::KnownAddressRegistry;
use crate::types::{AddressHistory, AddressRecord, RawTransaction};
use std::collections::HashSet;
use tracing::debug;

/// Result of collecting the destinations an address paid
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutAddressExtraction {
    /// The address never appears as a spender
    NoOutgoing,
    Addresses {
        addresses: Vec<String>,
        addressless_skipped: usize,
    },
}

/// A finished record plus what happened while building it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    pub record: AddressRecord,
    pub had_outgoing: bool,
    pub addressless_outputs_skipped: usize,
}

pub struct AddressRecordBuilder<'a> {
    registry: &'a KnownAddressRegistry,
    policy: TaggingPolicy,
}

impl<'a> AddressRecordBuilder<'a> {
    pub fn new(registry: &'a KnownAddressRegistry, policy: TaggingPolicy) -> Self {
        Self { registry, policy }
    }

    /// Derive the record for `history`, feeding its destinations into `aggregator`.
    ///
    /// The aggregator is updated as soon as the destinations are known, before
    /// attribution, so counts include addresses whose attribution later fails.
    pub fn build(
        &self,
        history: &AddressHistory,
        aggregator: &mut OutboundAddressAggregator,
    ) -> AppResult<BuildOutcome> {
        let address = history.address.as_str();
        let mut record = AddressRecord::new(address);

        record.in_multisig = history
            .txs
            .iter()
            .flat_map(|tx| &tx.inputs)
            .filter_map(|input| input.prev_out.as_ref())
            .any(|prev| prev.is_multisig());
        record.out_multisig = history
            .txs
            .iter()
            .flat_map(|tx| &tx.out)
            .any(|out| out.is_multisig());
        record.balance = history.final_balance;

        let outgoing: Vec<&RawTransaction> = history
            .txs
            .iter()
            .filter(|tx| tx.is_spent_by(address))
            .collect();

        let mut addressless_outputs_skipped = 0;
        match self.extract_out_addresses(address, &outgoing)? {
            OutAddressExtraction::NoOutgoing => {
                debug!("{} has no outgoing transactions", address);
            }
            OutAddressExtraction::Addresses {
                addresses,
                addressless_skipped,
            } => {
                record.out_addresses = addresses;
                addressless_outputs_skipped = addressless_skipped;
            }
        }

        aggregator.record(&record.out_addresses);

        self.attribute(&mut record, &outgoing)?;

        record.last_out_time = match outgoing.first() {
            Some(tx) => Some(tx.time),
            None if self.policy.require_outgoing => {
                return Err(AppError::NoOutgoingTransactions {
                    address: address.to_string(),
                })
            }
            None => None,
        };

        debug!(
            "Built record for {}: {} destinations, attacker={:?}",
            address,
            record.out_addresses.len(),
            record.attacker_name
        );

        Ok(BuildOutcome {
            record,
            had_outgoing: !outgoing.is_empty(),
            addressless_outputs_skipped,
        })
    }

    /// Every output address of every outgoing transaction, self-payments excluded
    pub fn extract_out_addresses(
        &self,
        address: &str,
        outgoing: &[&RawTransaction],
    ) -> AppResult<OutAddressExtraction> {
        if outgoing.is_empty() {
            return Ok(OutAddressExtraction::NoOutgoing);
        }

        let mut addresses = Vec::new();
        let mut addressless_skipped = 0;
        for tx in outgoing {
            for (vout, out) in tx.out.iter().enumerate() {
                match out.addr.as_deref() {
                    Some(dest) if dest == address => {}
                    Some(dest) => addresses.push(dest.to_string()),
                    None if self.policy.skip_addressless_outputs => addressless_skipped += 1,
                    None => {
                        return Err(AppError::UnexpectedShape {
                            address: address.to_string(),
                            txid: tx.label(),
                            reason: format!("output {} has no address", vout),
                        })
                    }
                }
            }
        }

        Ok(OutAddressExtraction::Addresses {
            addresses,
            addressless_skipped,
        })
    }

    /// Attribution walks the registry in declaration order. Each matching
    /// known address replaces `attacker_times` with the times it was paid,
    /// unless the policy merges payments to every known address.
    fn attribute(&self, record: &mut AddressRecord, outgoing: &[&RawTransaction]) -> AppResult<()> {
        let paid: HashSet<&str> = record.out_addresses.iter().map(String::as_str).collect();

        for (known, identity) in self.registry.iter() {
            if !paid.contains(known) {
                continue;
            }
            if let Some(existing) = record.attacker_name.as_deref() {
                if existing != identity {
                    return Err(AppError::AttributionConflict {
                        address: record.address.clone(),
                        existing: existing.to_string(),
                        conflicting: identity.to_string(),
                    });
                }
            }
            record.attacker_name = Some(identity.to_string());
            if !self.policy.merge_attacker_times {
                record.attacker_times = payment_times(outgoing, |dest| dest == known);
            }
        }

        if self.policy.merge_attacker_times && record.attacker_name.is_some() {
            let address = record.address.as_str();
            record.attacker_times = payment_times(outgoing, |dest| {
                dest != address && self.registry.contains(dest)
            });
        }

        Ok(())
    }
}

/// Time of every outgoing output whose destination matches, in transaction order
fn payment_times(outgoing: &[&RawTransaction], matches: impl Fn(&str) -> bool) -> Vec<i64> {
    outgoing
        .iter()
        .flat_map(|tx| tx.out.iter().map(move |out| (tx.time, out)))
        .filter(|(_, out)| out.addr.as_deref().is_some_and(&matches))
        .map(|(time, _)| time)
        .collect()
}
