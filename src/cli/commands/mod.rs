pub mod inspect;
pub mod scan_nonces;
pub mod tag;

use crate::config::AppConfig;
use crate::errors::{AppError, AppResult};
use std::path::Path;
use tracing::info;

/// Load configuration from an explicit file, or from config.toml/env when none is given
pub(crate) fn load_config(path: Option<&Path>) -> AppResult<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::load_from_file(path).map_err(|e| {
            AppError::Config(format!("Failed to load {}: {}", path.display(), e))
        })?,
        None => AppConfig::load()?,
    };
    info!("Configuration loaded successfully");
    Ok(config)
}
