use crate::errors::{AppError, AppResult};
use crate::registry::KnownAddressRegistry;
use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Application configuration loaded from config.toml or environment variables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub tagging: TaggingPolicy,
    pub signature_table: SignatureTableLayout,
    pub reporting: ReportingConfig,
    /// Known addresses; the built-in registry is used when none are configured
    #[serde(default)]
    pub registry: Vec<KnownAddressEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    pub address_glob: String,
    pub signature_table: PathBuf,
    pub output: PathBuf,
}

/// How the record builder treats incomplete histories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggingPolicy {
    /// Fail the run when an address never spends (no last outgoing time)
    pub require_outgoing: bool,
    /// Skip outputs without an address instead of failing on them
    pub skip_addressless_outputs: bool,
    /// Keep payment times to every known address instead of only the last
    /// matching registry entry
    pub merge_attacker_times: bool,
}

impl Default for TaggingPolicy {
    fn default() -> Self {
        Self {
            require_outgoing: true,
            skip_addressless_outputs: false,
            merge_attacker_times: false,
        }
    }
}

/// Column layout of the signature table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureTableLayout {
    pub delimiter: String,
    pub min_fields: usize,
    pub hash_index: usize,
    pub r_index: usize,
    pub s_index: usize,
}

impl Default for SignatureTableLayout {
    fn default() -> Self {
        Self {
            delimiter: "\t".to_string(),
            min_fields: 11,
            hash_index: 4,
            r_index: 9,
            s_index: 10,
        }
    }
}

impl SignatureTableLayout {
    pub fn validate(&self) -> AppResult<()> {
        if self.delimiter.len() != 1 {
            return Err(AppError::Config(format!(
                "Signature table delimiter must be a single byte, got {:?}",
                self.delimiter
            )));
        }
        for (name, index) in [
            ("hash_index", self.hash_index),
            ("r_index", self.r_index),
            ("s_index", self.s_index),
        ] {
            if index >= self.min_fields {
                return Err(AppError::Config(format!(
                    "{} ({}) must be below min_fields ({})",
                    name, index, self.min_fields
                )));
            }
        }
        Ok(())
    }

    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter.as_bytes().first().copied().unwrap_or(b'\t')
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportingConfig {
    /// Ranked entries are printed only when their count exceeds this
    pub min_count: u64,
    pub excluded_prefixes: Vec<String>,
    pub excluded_patterns: Vec<String>,
    pub format: String,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            min_count: 1,
            excluded_prefixes: vec!["1dice".to_string()],
            excluded_patterns: Vec::new(),
            format: "console".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownAddressEntry {
    pub address: String,
    pub identity: String,
}

impl AppConfig {
    /// Load configuration from config.toml file and environment variables
    /// Environment variables take precedence over file configuration
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(File::with_name("config").required(false))
    }

    /// Load configuration from an explicit file (must exist)
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with(File::from(path).required(true))
    }

    fn load_with<S>(file: S) -> Result<Self, ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let layout = SignatureTableLayout::default();
        let reporting = ReportingConfig::default();
        let policy = TaggingPolicy::default();

        let config = Config::builder()
            .set_default("paths.address_glob", "data/1*.json")?
            .set_default("paths.signature_table", "data/analyzr.tsv")?
            .set_default("paths.output", "data/tags.json")?
            .set_default("tagging.require_outgoing", policy.require_outgoing)?
            .set_default(
                "tagging.skip_addressless_outputs",
                policy.skip_addressless_outputs,
            )?
            .set_default("tagging.merge_attacker_times", policy.merge_attacker_times)?
            .set_default("signature_table.delimiter", layout.delimiter)?
            .set_default("signature_table.min_fields", layout.min_fields as i64)?
            .set_default("signature_table.hash_index", layout.hash_index as i64)?
            .set_default("signature_table.r_index", layout.r_index as i64)?
            .set_default("signature_table.s_index", layout.s_index as i64)?
            .set_default("reporting.min_count", reporting.min_count)?
            .set_default("reporting.excluded_prefixes", reporting.excluded_prefixes)?
            .set_default("reporting.excluded_patterns", Vec::<String>::new())?
            .set_default("reporting.format", reporting.format)?
            .add_source(file)
            // TAGGER_TAGGING__REQUIRE_OUTGOING=false etc.
            .add_source(
                config::Environment::with_prefix("TAGGER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let mut app_config: AppConfig = config.try_deserialize()?;

        if let Ok(glob) = env::var("TAGGER_ADDRESS_GLOB") {
            app_config.paths.address_glob = glob;
        }

        if let Ok(output) = env::var("TAGGER_OUTPUT_PATH") {
            app_config.paths.output = PathBuf::from(output);
        }

        Ok(app_config)
    }

    /// Configuration used when no file is present and nothing can be loaded
    pub fn get_defaults() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(_) => Self {
                paths: PathsConfig {
                    address_glob: "data/1*.json".to_string(),
                    signature_table: PathBuf::from("data/analyzr.tsv"),
                    output: PathBuf::from("data/tags.json"),
                },
                tagging: TaggingPolicy::default(),
                signature_table: SignatureTableLayout::default(),
                reporting: ReportingConfig::default(),
                registry: Vec::new(),
            },
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        self.signature_table.validate()?;
        if self.paths.address_glob.trim().is_empty() {
            return Err(AppError::Config("Address glob must not be empty".to_string()));
        }
        for entry in &self.registry {
            if entry.address.is_empty() || entry.identity.is_empty() {
                return Err(AppError::Config(format!(
                    "Registry entry needs both address and identity: {:?}",
                    entry
                )));
            }
        }
        Ok(())
    }

    pub fn known_addresses(&self) -> KnownAddressRegistry {
        if self.registry.is_empty() {
            KnownAddressRegistry::default()
        } else {
            KnownAddressRegistry::new(
                self.registry
                    .iter()
                    .map(|entry| (entry.address.clone(), entry.identity.clone())),
            )
        }
    }
}
