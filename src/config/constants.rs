//! Configuration constants.
//!
//! This module defines the constants used throughout the application: on-disk
//! layout of the databases, download endpoints, size limits, timeouts and the
//! sentinel strings that appear in lookup results.

use std::time::Duration;

// On-disk layout
/// Default directory holding both database files
pub const DEFAULT_DATA_DIR: &str = "./data";
/// Sub-directory of the data directory holding the GeoLite2 database
pub const GEOLITE2_DIR: &str = "GeoLite2";
/// Sub-directory of the data directory holding the PureIPDB database
pub const PUREIP_DIR: &str = "PureIPDB";
/// GeoLite2 edition (also the name of the .mmdb file inside the archive)
pub const GEOLITE2_EDITION: &str = "GeoLite2-City";
/// GeoLite2 database file name
pub const GEOLITE2_FILE_NAME: &str = "GeoLite2-City.mmdb";
/// PureIPDB database file name
pub const PUREIP_FILE_NAME: &str = "qqwry.ipdb";

// Remote sources
/// Environment variable name for the MaxMind license key
pub const MAXMIND_LICENSE_KEY_ENV: &str = "MAXMIND_LICENSE_KEY";
/// MaxMind download base URL
pub const MAXMIND_DOWNLOAD_BASE: &str = "https://download.maxmind.com/app/geoip_download";
/// Default PureIPDB download URL
pub const DEFAULT_PUREIP_URL: &str =
    "https://raw.gitmirror.com/nmgliangwei/qqwry.ipdb/main/qqwry.ipdb";
/// Environment variable name for an HTTP proxy used for the PureIPDB download
pub const PUREIP_PROXY_ENV: &str = "PUREIP_PROXY";

/// Browser-like User-Agent sent to the PureIPDB mirror.
///
/// The mirror rejects requests from obvious non-browser clients.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

// Download limits
/// Per-request timeout for database downloads (large files)
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);
/// Connection timeout for database downloads
pub const DOWNLOAD_CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
/// Number of attempts for transient download failures
pub const MAX_NETWORK_DOWNLOAD_RETRIES: usize = 3;
/// Base backoff between download attempts in milliseconds (doubled per attempt)
pub const DOWNLOAD_RETRY_BASE_DELAY_MS: u64 = 2000;
/// Maximum accepted download size (200MB)
pub const MAX_DOWNLOAD_SIZE: usize = 200 * 1024 * 1024;
/// Minimum size of an accepted database file (1MB)
pub const MIN_DATABASE_SIZE: usize = 1024 * 1024;
/// Exclusive upper bound of the PureIPDB metadata header length (1MB)
pub const MAX_IPDB_METADATA_LENGTH: usize = 1024 * 1024;

// Lookup results
/// Sentinel for fields a source did not supply
pub const UNKNOWN: &str = "unknown";
/// Sentinel for fields of an invalid-address record
pub const ERROR_SENTINEL: &str = "error";
/// Native "unknown" marker used inside PureIPDB records
pub const PUREIP_UNKNOWN_MARKER: &str = "未知";
/// Language block read from PureIPDB records
pub const PUREIP_LANGUAGE: &str = "CN";

// Batch processing
/// Row error for an empty or missing address cell
pub const EMPTY_ADDRESS_ERROR: &str = "address is empty";
/// Row error for an address that fails to parse
pub const INVALID_ADDRESS_ERROR: &str = "invalid address format";
/// Log batch progress every N rows
pub const PROGRESS_LOG_INTERVAL: usize = 1000;
/// Suffix appended to the input file stem for the default output path
pub const RESULTS_SUFFIX: &str = "_results";
