//! Address document discovery and loading

use crate::errors::{AppError, AppResult};
use crate::types::AddressHistory;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Paths matching `pattern`, in the order glob yields them
pub fn discover_address_files(pattern: &str) -> AppResult<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in glob::glob(pattern)? {
        let path = entry?;
        if path.is_file() {
            paths.push(path);
        }
    }
    info!("Found {} address documents matching {}", paths.len(), pattern);
    Ok(paths)
}

pub fn load_address_history(path: &Path) -> AppResult<AddressHistory> {
    debug!("Loading {}", path.display());
    let file = File::open(path)?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| AppError::InvalidDocument {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
