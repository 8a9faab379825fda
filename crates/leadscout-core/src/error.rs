use std::path::PathBuf;

use thiserror::Error;

/// The only message a user ever sees when a search does not complete.
pub const SEARCH_FAILED_MESSAGE: &str = "The search failed or took too long. Please try a more specific area (e.g., 'West Village, NY' instead of just 'New York').";

/// A search could not produce results.
///
/// Every gateway failure (transport, service error, malformed or
/// schema-invalid response) collapses into this one value. The cause is
/// logged by the gateway, never carried here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{}", SEARCH_FAILED_MESSAGE)]
pub struct SearchFailed;

/// A configuration value is present but unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Errors writing the saved-leads slot.
///
/// Reads never fail: an absent or corrupt slot loads as an empty list.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize saved leads: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV encoding error: {0}")]
    Encode(#[from] csv::Error),

    #[error("export I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("encoded export is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}
