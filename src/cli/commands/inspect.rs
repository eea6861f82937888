use super::load_config;
use crate::errors::AppResult;
use crate::input::load_address_history;
use crate::report::utils::export_json;
use crate::tagger::{AddressRecordBuilder, OutboundAddressAggregator};
use crate::types::TagEntry;
use clap::Args;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Args)]
pub struct InspectCommand {
    /// Address document to inspect
    path: PathBuf,

    /// Configuration file (defaults to ./config.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Record the address even if it never spends
    #[arg(long)]
    allow_no_outgoing: bool,

    /// Skip outputs without an address
    #[arg(long)]
    skip_addressless_outputs: bool,

    /// Keep payment times to every known address, not just the last matching one
    #[arg(long)]
    merge_attacker_times: bool,
}

impl InspectCommand {
    pub fn run(&self) -> AppResult<()> {
        let mut config = load_config(self.config.as_deref())?;
        if self.allow_no_outgoing {
            config.tagging.require_outgoing = false;
        }
        if self.skip_addressless_outputs {
            config.tagging.skip_addressless_outputs = true;
        }
        if self.merge_attacker_times {
            config.tagging.merge_attacker_times = true;
        }
        config.validate()?;

        let registry = config.known_addresses();
        let history = load_address_history(&self.path)?;
        let builder = AddressRecordBuilder::new(&registry, config.tagging);
        let outcome = builder.build(&history, &mut OutboundAddressAggregator::new())?;

        let mut entry = BTreeMap::new();
        entry.insert(
            outcome.record.address.clone(),
            TagEntry::Address(outcome.record),
        );
        println!("{}", export_json(&entry)?);
        Ok(())
    }
}
