//! Service address exclusion for the folded frequency views
//!
//! Addresses of high-volume public services (gambling sites with vanity
//! prefixes, for instance) dominate destination counts without saying anything
//! about who controls the funds, so they are dropped before folding.

use crate::config::ReportingConfig;
use crate::errors::AppResult;
use regex::Regex;

#[derive(Debug, Clone, Default)]
pub struct ServiceExclusion {
    prefixes: Vec<String>,
    patterns: Vec<Regex>,
}

impl ServiceExclusion {
    pub fn new(prefixes: Vec<String>, patterns: Vec<Regex>) -> Self {
        Self { prefixes, patterns }
    }

    /// Excludes only the `1dice` vanity prefix
    pub fn dice_only() -> Self {
        Self::new(vec!["1dice".to_string()], Vec::new())
    }

    pub fn from_config(config: &ReportingConfig) -> AppResult<Self> {
        let patterns = config
            .excluded_patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(config.excluded_prefixes.clone(), patterns))
    }

    pub fn is_excluded(&self, address: &str) -> bool {
        self.prefixes.iter().any(|p| address.starts_with(p.as_str()))
            || self.patterns.iter().any(|re| re.is_match(address))
    }
}
