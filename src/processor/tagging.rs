//! Batch tagging run
//!
//! Builds every address record (feeding the destination aggregator), then
//! scans the signature table, then hands back the merged store. Nothing is
//! written here; the caller persists the store only after the whole run
//! succeeded.

use super::{ProgressReporter, StandardProgressTracker};
use crate::config::{AppConfig, SignatureTableLayout, TaggingPolicy};
use crate::errors::AppResult;
use crate::input::load_address_history;
use crate::nonce::{NonceReuseDetector, NonceScan};
use crate::registry::KnownAddressRegistry;
use crate::store::TagStore;
use crate::tagger::{AddressRecordBuilder, OutboundAddressAggregator};
use crate::types::{AddressHistory, StatisticsCollector, TaggingStats};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

/// Everything a run produces
#[derive(Debug, Clone)]
pub struct TaggingOutcome {
    pub store: TagStore,
    pub aggregator: OutboundAddressAggregator,
    pub stats: TaggingStats,
}

impl Default for TaggingOutcome {
    fn default() -> Self {
        Self {
            store: TagStore::new(),
            aggregator: OutboundAddressAggregator::new(),
            stats: TaggingStats::new(),
        }
    }
}

pub struct TaggingEngine {
    registry: KnownAddressRegistry,
    policy: TaggingPolicy,
    layout: SignatureTableLayout,
}

impl TaggingEngine {
    pub fn new(
        registry: KnownAddressRegistry,
        policy: TaggingPolicy,
        layout: SignatureTableLayout,
    ) -> Self {
        Self {
            registry,
            policy,
            layout,
        }
    }

    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self::new(
            config.known_addresses(),
            config.tagging,
            config.signature_table.clone(),
        ))
    }

    pub fn registry(&self) -> &KnownAddressRegistry {
        &self.registry
    }

    /// Build and store the record for one history
    pub fn tag_address(&self, history: &AddressHistory, outcome: &mut TaggingOutcome) -> AppResult<()> {
        let builder = AddressRecordBuilder::new(&self.registry, self.policy);
        let built = builder.build(history, &mut outcome.aggregator)?;

        let stats = &mut outcome.stats;
        stats.addresses_processed += 1;
        stats.addressless_outputs_skipped += built.addressless_outputs_skipped;
        if built.record.is_attributed() {
            stats.addresses_attributed += 1;
        }
        if !built.had_outgoing {
            stats.addresses_without_outgoing += 1;
        }
        if built.record.in_multisig || built.record.out_multisig {
            stats.multisig_addresses += 1;
        }

        outcome.store.insert_address(built.record);
        Ok(())
    }

    pub fn apply_nonce_scan(&self, scan: NonceScan, outcome: &mut TaggingOutcome) {
        for tx_hash in scan.flagged {
            outcome.store.flag_nonce_reuse(tx_hash);
        }
        outcome.stats.nonce_scan = scan.stats;
    }

    /// Run over in-memory histories and an optional signature table reader
    pub fn run<R: Read>(
        &self,
        histories: impl IntoIterator<Item = AddressHistory>,
        signature_table: Option<R>,
    ) -> AppResult<TaggingOutcome> {
        let mut outcome = TaggingOutcome::default();
        for history in histories {
            self.tag_address(&history, &mut outcome)?;
        }
        if let Some(reader) = signature_table {
            let scan = NonceReuseDetector::new(self.layout.clone()).scan_reader(reader)?;
            self.apply_nonce_scan(scan, &mut outcome);
        }
        self.finish(&mut outcome);
        Ok(outcome)
    }

    /// Run over address documents on disk, loading them one at a time
    pub fn run_files(
        &self,
        address_files: &[PathBuf],
        signature_table: Option<&Path>,
    ) -> AppResult<TaggingOutcome> {
        info!(
            "Tagging {} addresses against {} known addresses",
            address_files.len(),
            self.registry.len()
        );

        let mut outcome = TaggingOutcome::default();
        let mut progress = StandardProgressTracker::new();
        progress.start();

        for (index, path) in address_files.iter().enumerate() {
            let history = load_address_history(path)?;
            self.tag_address(&history, &mut outcome)?;

            if progress.should_report() {
                ProgressReporter::report_progress_with_metrics(
                    &outcome.stats,
                    index + 1,
                    Some(address_files.len()),
                    progress.elapsed_seconds(),
                )?;
            }
        }
        if !address_files.is_empty() {
            ProgressReporter::finish_progress_line();
        }

        if let Some(path) = signature_table {
            let scan = NonceReuseDetector::new(self.layout.clone()).scan_path(path)?;
            self.apply_nonce_scan(scan, &mut outcome);
        }

        self.finish(&mut outcome);
        Ok(outcome)
    }

    fn finish(&self, outcome: &mut TaggingOutcome) {
        outcome.stats.key_collisions = outcome.store.collisions().len();
        outcome.stats.finish();
        info!("Tagging complete: {}", outcome.stats.summary());
    }
}
