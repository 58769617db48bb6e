//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::constants::{
    DEFAULT_DATA_DIR, DEFAULT_PUREIP_URL, GEOLITE2_DIR, GEOLITE2_FILE_NAME,
    MAXMIND_DOWNLOAD_BASE, MAXMIND_LICENSE_KEY_ENV, PUREIP_DIR, PUREIP_FILE_NAME,
    PUREIP_PROXY_ENV,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Locations of the two database files under a data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabasePaths {
    /// PureIPDB (`qqwry.ipdb`), the primary database
    pub pureip: PathBuf,
    /// GeoLite2-City (`.mmdb`), the secondary database
    pub geolite2: PathBuf,
}

impl DatabasePaths {
    /// Builds the fixed layout `<dir>/PureIPDB/qqwry.ipdb` and
    /// `<dir>/GeoLite2/GeoLite2-City.mmdb`.
    pub fn from_data_dir(dir: &Path) -> Self {
        Self {
            pureip: dir.join(PUREIP_DIR).join(PUREIP_FILE_NAME),
            geolite2: dir.join(GEOLITE2_DIR).join(GEOLITE2_FILE_NAME),
        }
    }
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use ip_location::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     data_dir: PathBuf::from("/var/lib/ip_location"),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding both database files
    pub data_dir: PathBuf,

    /// MaxMind license key (only needed to download GeoLite2)
    pub license_key: Option<String>,

    /// Optional HTTP proxy for the PureIPDB download
    pub proxy: Option<String>,

    /// PureIPDB download URL
    pub pureip_url: String,

    /// MaxMind download endpoint
    pub maxmind_download_base: String,
}

impl Config {
    /// Database file locations derived from `data_dir`.
    pub fn database_paths(&self) -> DatabasePaths {
        DatabasePaths::from_data_dir(&self.data_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            license_key: None,
            proxy: None,
            pureip_url: DEFAULT_PUREIP_URL.to_string(),
            maxmind_download_base: MAXMIND_DOWNLOAD_BASE.to_string(),
        }
    }
}

/// Command-line interface.
///
/// # Examples
///
/// ```bash
/// # Single lookup
/// ip_location lookup 8.8.8.8
///
/// # Batch lookup from a spreadsheet (writes ips_results.xlsx)
/// ip_location batch ips.xlsx
///
/// # Download missing databases, or refresh both with --force
/// MAXMIND_LICENSE_KEY=... ip_location provision --force
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "ip_location",
    version,
    about = "Resolves IP addresses to country, region, city, coordinates and timezone."
)]
pub struct Cli {
    /// Directory holding the PureIPDB and GeoLite2 databases
    #[arg(long, global = true, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Look up a single IPv4 or IPv6 address
    Lookup {
        /// Address to resolve
        address: String,

        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Look up every address in a CSV or spreadsheet file
    ///
    /// The first column is an identifier, the second the address. The first
    /// row is treated as a header.
    Batch {
        /// Input file (.csv, .xlsx, .xls, .ods)
        input: PathBuf,

        /// Output file (.csv or .xlsx); defaults to `<input>_results.<ext>`
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Download the databases that are missing locally
    Provision {
        /// Re-download both databases even if present
        #[arg(long)]
        force: bool,

        /// MaxMind license key (falls back to MAXMIND_LICENSE_KEY)
        #[arg(long)]
        license_key: Option<String>,

        /// HTTP proxy for the PureIPDB download (falls back to PUREIP_PROXY)
        #[arg(long)]
        proxy: Option<String>,

        /// PureIPDB download URL
        #[arg(long, default_value = DEFAULT_PUREIP_URL)]
        pureip_url: String,
    },
}

impl Cli {
    /// Converts parsed arguments into the library configuration.
    ///
    /// The license key and proxy fall back to their environment variables
    /// when not given on the command line.
    pub fn to_config(&self) -> Config {
        let mut config = Config {
            data_dir: self.data_dir.clone(),
            ..Default::default()
        };
        if let Command::Provision {
            license_key,
            proxy,
            pureip_url,
            ..
        } = &self.command
        {
            config.license_key = license_key
                .clone()
                .or_else(|| non_empty_env(MAXMIND_LICENSE_KEY_ENV));
            config.proxy = proxy.clone().or_else(|| non_empty_env(PUREIP_PROXY_ENV));
            config.pureip_url = pureip_url.clone();
        }
        config
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
