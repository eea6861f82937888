use std::path::PathBuf;
use thiserror::Error;

/// Application-wide error type - single point of truth
#[derive(Error, Debug)]
pub enum AppError {
    /// File I/O operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Signature table reading
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON encoding/decoding of address documents and the tag store
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration issues
    #[error("Configuration error: {0}")]
    Config(String),

    /// Address document could not be loaded
    #[error("Invalid address document {path}: {reason}")]
    InvalidDocument { path: PathBuf, reason: String },

    /// Two known addresses with different identities were paid by the same address.
    /// Fatal: a silent misattribution is worse than aborting the run.
    #[error(
        "Attribution conflict for {address}: already attributed to {existing}, also pays {conflicting}"
    )]
    AttributionConflict {
        address: String,
        existing: String,
        conflicting: String,
    },

    /// The address never spends, so there is no last outgoing time
    #[error("No outgoing transactions for {address}")]
    NoOutgoingTransactions { address: String },

    /// Transaction data did not have the shape the tagger relies on
    #[error("Unexpected data shape for {address} in tx {txid}: {reason}")]
    UnexpectedShape {
        address: String,
        txid: String,
        reason: String,
    },
}

/// Application-wide result type - single point of truth
pub type AppResult<T> = Result<T, AppError>;

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<glob::PatternError> for AppError {
    fn from(err: glob::PatternError) -> Self {
        AppError::Config(format!("Glob pattern error: {}", err))
    }
}

impl From<glob::GlobError> for AppError {
    fn from(err: glob::GlobError) -> Self {
        AppError::Config(format!("Glob error: {}", err))
    }
}

impl From<regex::Error> for AppError {
    fn from(err: regex::Error) -> Self {
        AppError::Config(format!("Invalid exclusion pattern: {}", err))
    }
}

impl AppError {
    /// Errors that stop a run because the input data contradicts itself
    pub fn is_data_integrity(&self) -> bool {
        matches!(
            self,
            AppError::AttributionConflict { .. } | AppError::UnexpectedShape { .. }
        )
    }

    /// Process exit status: 2 for data-integrity failures, 1 for everything else
    pub fn exit_code(&self) -> i32 {
        if self.is_data_integrity() {
            2
        } else {
            1
        }
    }
}
