//! Error type definitions.
//!
//! This module defines the error types that cross module boundaries. Lookup
//! misses are not errors and never appear here; see `geoip::SourceOutcome`.

use std::path::PathBuf;

use log::SetLoggerError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Error types for database provisioning.
///
/// Transient failures (network errors, 5xx and 429 responses) are retried by
/// the downloader; everything else fails the download immediately.
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// GeoLite2 must be fetched but no license key was supplied.
    #[error("MaxMind license key required to download {0} (use --license-key or MAXMIND_LICENSE_KEY)")]
    MissingLicenseKey(&'static str),

    /// The HTTP client could not be constructed (e.g. an invalid proxy URL).
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Network failure while talking to the remote source.
    #[error("Network error downloading {database}: {source}")]
    Network {
        /// Database being downloaded
        database: &'static str,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// The remote source answered with a non-success status.
    #[error("Download of {database} failed with HTTP status {status}")]
    HttpStatus {
        /// Database being downloaded
        database: &'static str,
        /// HTTP status code
        status: u16,
    },

    /// The payload was fetched but is not an acceptable database file.
    #[error("Downloaded {database} rejected: {reason}")]
    Validation {
        /// Database being downloaded
        database: &'static str,
        /// Human-readable rejection reason
        reason: String,
    },

    /// Writing or replacing the local file failed.
    #[error("Failed to install {}: {source}", .path.display())]
    Io {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ProvisionError {
    /// Returns true for failures worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            ProvisionError::Network { .. } => true,
            ProvisionError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Error types for reading the batch input and writing the result table.
#[derive(Error, Debug)]
pub enum TableError {
    /// Extension is not one of the supported table formats.
    #[error("Unsupported table format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// Input must carry at least an identifier and an address column.
    #[error("{} has {found} column(s); expected at least 2 (identifier, address)", .path.display())]
    TooFewColumns {
        /// Input path
        path: PathBuf,
        /// Number of columns found
        found: usize,
    },

    /// CSV parsing or writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Spreadsheet reading error.
    #[error("Spreadsheet read error: {0}")]
    Spreadsheet(String),

    /// Spreadsheet writing error.
    #[error("Spreadsheet write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// File system error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<tempfile::PersistError> for TableError {
    fn from(e: tempfile::PersistError) -> Self {
        TableError::Io(e.error)
    }
}
