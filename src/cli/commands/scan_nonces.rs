use super::load_config;
use crate::errors::AppResult;
use crate::nonce::NonceReuseDetector;
use crate::report::utils::export_json;
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct ScanNoncesCommand {
    /// Configuration file (defaults to ./config.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Signature table path (overrides config.toml)
    #[arg(long)]
    signature_table: Option<PathBuf>,

    /// Output format (console or json)
    #[arg(long, default_value = "console")]
    format: String,
}

impl ScanNoncesCommand {
    pub fn run(&self) -> AppResult<()> {
        let config = load_config(self.config.as_deref())?;
        config.signature_table.validate()?;

        let path = self
            .signature_table
            .clone()
            .unwrap_or(config.paths.signature_table);

        let scan = NonceReuseDetector::new(config.signature_table).scan_path(&path)?;

        if self.format.eq_ignore_ascii_case("json") {
            let flagged: Vec<&String> = scan.flagged.iter().collect();
            println!(
                "{}",
                export_json(&serde_json::json!({
                    "flagged": flagged,
                    "stats": scan.stats,
                }))?
            );
        } else {
            for tx_hash in &scan.flagged {
                println!("{}", tx_hash);
            }
            println!();
            println!("Rows read: {}", scan.stats.rows_read);
            println!("Rows skipped: {}", scan.stats.rows_skipped);
            println!("Transactions: {}", scan.stats.transactions_seen);
            println!("Repeated nonce: {}", scan.stats.transactions_flagged);
        }
        Ok(())
    }
}
