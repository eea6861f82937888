//! Destination frequency summary
//!
//! Four ranked lists (primary destination, any destination and the
//! identity-folded variant of each) plus an attribution overview.

pub mod utils;

use crate::errors::AppResult;
use crate::registry::KnownAddressRegistry;
use crate::store::TagStore;
use crate::tagger::{FrequencyCounter, OutboundAddressAggregator, RankedEntry, ServiceExclusion};
use crate::utils::time::timestamp_to_iso;
use serde::Serialize;
use utils::{export_json, format_number};

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Console,
    Json,
}

/// Parse output format string to OutputFormat enum
pub fn parse_format(format_str: &str) -> OutputFormat {
    match format_str.to_lowercase().as_str() {
        "json" => OutputFormat::Json,
        _ => OutputFormat::Console,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributionLine {
    pub address: String,
    pub identity: String,
    pub payments: usize,
    pub last_out_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencySummary {
    pub min_count: u64,
    pub primary: Vec<RankedEntry>,
    pub any: Vec<RankedEntry>,
    pub primary_folded: Vec<RankedEntry>,
    pub any_folded: Vec<RankedEntry>,
    pub attributions: Vec<AttributionLine>,
}

impl FrequencySummary {
    /// Keep entries whose count exceeds `min_count`
    pub fn build(
        aggregator: &OutboundAddressAggregator,
        registry: &KnownAddressRegistry,
        exclusion: &ServiceExclusion,
        store: &TagStore,
        min_count: u64,
    ) -> Self {
        let above = |counter: &FrequencyCounter| -> Vec<RankedEntry> {
            counter
                .ranked()
                .into_iter()
                .filter(|entry| entry.count > min_count)
                .collect()
        };

        let attributions = store
            .addresses()
            .filter_map(|record| {
                record.attacker_name.as_ref().map(|identity| AttributionLine {
                    address: record.address.clone(),
                    identity: identity.clone(),
                    payments: record.attacker_times.len(),
                    last_out_date: record.last_out_time.map(timestamp_to_iso),
                })
            })
            .collect();

        Self {
            min_count,
            primary: above(aggregator.primary()),
            any: above(aggregator.any()),
            primary_folded: above(&aggregator.primary().folded(registry, exclusion)),
            any_folded: above(&aggregator.any().folded(registry, exclusion)),
            attributions,
        }
    }
}

pub fn format_summary(summary: &FrequencySummary, format: &OutputFormat) -> AppResult<String> {
    match format {
        OutputFormat::Console => {
            let mut output = String::new();
            for (title, entries) in [
                ("PRIMARY DESTINATIONS", &summary.primary),
                ("ALL DESTINATIONS", &summary.any),
                ("PRIMARY DESTINATIONS (FOLDED)", &summary.primary_folded),
                ("ALL DESTINATIONS (FOLDED)", &summary.any_folded),
            ] {
                output.push_str(&format!("\n=== {} ===\n", title));
                for entry in entries {
                    output.push_str(&format!("{} {}\n", entry.key, format_number(entry.count as usize)));
                }
            }

            if !summary.attributions.is_empty() {
                output.push_str("\n=== ATTRIBUTED ADDRESSES ===\n");
                for line in &summary.attributions {
                    output.push_str(&format!(
                        "{}|{}|payments:{}|last out:{}\n",
                        line.address,
                        line.identity,
                        line.payments,
                        line.last_out_date.as_deref().unwrap_or("-")
                    ));
                }
            }
            Ok(output)
        }
        OutputFormat::Json => export_json(summary),
    }
}
