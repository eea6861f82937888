use super::load_config;
use crate::errors::AppResult;
use crate::input::discover_address_files;
use crate::processor::{TaggingEngine, TaggingOutcome};
use crate::report::{format_summary, parse_format, FrequencySummary};
use crate::tagger::ServiceExclusion;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

#[derive(Args)]
pub struct TagCommand {
    /// Configuration file (defaults to ./config.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Glob for address documents (overrides config.toml and env vars)
    #[arg(long)]
    address_glob: Option<String>,

    /// Signature table path (overrides config.toml)
    #[arg(long)]
    signature_table: Option<PathBuf>,

    /// Do not scan the signature table
    #[arg(long)]
    skip_nonce_scan: bool,

    /// Tag store output path (overrides config.toml and env vars)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Record addresses that never spend instead of failing the run
    #[arg(long)]
    allow_no_outgoing: bool,

    /// Skip outputs without an address instead of failing the run
    #[arg(long)]
    skip_addressless_outputs: bool,

    /// Keep payment times to every known address, not just the last matching one
    #[arg(long)]
    merge_attacker_times: bool,

    /// Only print ranked entries seen more than this many times
    #[arg(long)]
    min_count: Option<u64>,

    /// Summary format (console or json)
    #[arg(long)]
    format: Option<String>,
}

impl TagCommand {
    pub fn run(&self) -> AppResult<()> {
        info!("=== Address Tagger ===");

        let mut config = load_config(self.config.as_deref())?;

        // CLI arguments override config values
        if let Some(glob) = &self.address_glob {
            config.paths.address_glob = glob.clone();
        }
        if let Some(path) = &self.signature_table {
            config.paths.signature_table = path.clone();
        }
        if let Some(path) = &self.output {
            config.paths.output = path.clone();
        }
        if self.allow_no_outgoing {
            config.tagging.require_outgoing = false;
        }
        if self.skip_addressless_outputs {
            config.tagging.skip_addressless_outputs = true;
        }
        if self.merge_attacker_times {
            config.tagging.merge_attacker_times = true;
        }
        if let Some(min_count) = self.min_count {
            config.reporting.min_count = min_count;
        }
        if let Some(format) = &self.format {
            config.reporting.format = format.clone();
        }

        let engine = TaggingEngine::from_config(&config)?;
        let exclusion = ServiceExclusion::from_config(&config.reporting)?;

        info!("Configuration:");
        info!("  Address documents: {}", config.paths.address_glob);
        info!("  Signature table: {}", config.paths.signature_table.display());
        info!("  Output: {}", config.paths.output.display());
        info!("  Require outgoing: {}", config.tagging.require_outgoing);

        let address_files = discover_address_files(&config.paths.address_glob)?;
        let signature_table = if self.skip_nonce_scan {
            None
        } else {
            Some(config.paths.signature_table.as_path())
        };

        let TaggingOutcome {
            store,
            aggregator,
            stats,
        } = engine.run_files(&address_files, signature_table)?;

        store.write_json(&config.paths.output)?;

        let summary = FrequencySummary::build(
            &aggregator,
            engine.registry(),
            &exclusion,
            &store,
            config.reporting.min_count,
        );
        print!(
            "{}",
            format_summary(&summary, &parse_format(&config.reporting.format))?
        );

        println!("\n=== TAGGING COMPLETE ===");
        println!("Addresses tagged: {}", stats.addresses_processed);
        println!(
            "Attributed: {} ({:.1}%)",
            stats.addresses_attributed,
            stats.attribution_rate()
        );
        println!(
            "Signature rows: {} ({} skipped)",
            stats.nonce_scan.rows_read, stats.nonce_scan.rows_skipped
        );
        println!(
            "Transactions with repeated nonce: {}",
            stats.nonce_scan.transactions_flagged
        );
        if stats.key_collisions > 0 {
            println!("Key collisions (flag overwrote record): {}", stats.key_collisions);
        }
        println!("Tag store: {}", config.paths.output.display());

        Ok(())
    }
}
