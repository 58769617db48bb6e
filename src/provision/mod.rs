//! Database provisioning.
//!
//! Downloads the GeoLite2-City and PureIPDB files into the data directory.
//! Each payload is fetched into memory, validated, written to a temporary
//! file next to its destination and renamed into place, so a failed run
//! never leaves a truncated or invalid database behind.

mod download;
mod extract;
mod install;
mod validate;

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::config::{
    Config, DatabasePaths, BROWSER_USER_AGENT, DOWNLOAD_RETRY_BASE_DELAY_MS, DOWNLOAD_TIMEOUT,
    GEOLITE2_FILE_NAME, MAX_NETWORK_DOWNLOAD_RETRIES,
};
use crate::error_handling::ProvisionError;
use crate::geoip::{GEOLITE2_NAME, PUREIP_NAME};

use download::{build_client, download_with_retries, geolite2_url};
use extract::extract_from_tar_gz;
use install::install_atomically;
use validate::{validate_ipdb, validate_mmdb};

/// Settings for one provisioning run.
#[derive(Debug, Clone)]
pub struct ProvisionConfig {
    /// Destination files
    pub paths: DatabasePaths,
    /// MaxMind license key, required only when GeoLite2 must be fetched
    pub license_key: Option<String>,
    /// HTTP proxy for the PureIPDB download
    pub proxy: Option<String>,
    /// PureIPDB download URL
    pub pureip_url: String,
    /// MaxMind download endpoint
    pub maxmind_download_base: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Attempts per file, first one included
    pub max_retries: usize,
    /// Delay before the first retry; doubles on each further retry
    pub retry_base_delay: Duration,
}

impl From<&Config> for ProvisionConfig {
    fn from(config: &Config) -> Self {
        Self {
            paths: config.database_paths(),
            license_key: config.license_key.clone(),
            proxy: config.proxy.clone(),
            pureip_url: config.pureip_url.clone(),
            maxmind_download_base: config.maxmind_download_base.clone(),
            timeout: DOWNLOAD_TIMEOUT,
            max_retries: MAX_NETWORK_DOWNLOAD_RETRIES,
            retry_base_delay: Duration::from_millis(DOWNLOAD_RETRY_BASE_DELAY_MS),
        }
    }
}

/// The two provisioned databases, in provisioning order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, EnumIter)]
pub enum DatabaseKind {
    /// MaxMind GeoLite2-City
    GeoLite2,
    /// PureIPDB
    PureIp,
}

impl DatabaseKind {
    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            DatabaseKind::GeoLite2 => GEOLITE2_NAME,
            DatabaseKind::PureIp => PUREIP_NAME,
        }
    }

    /// Destination path within `paths`
    pub fn path(&self, paths: &DatabasePaths) -> PathBuf {
        match self {
            DatabaseKind::GeoLite2 => paths.geolite2.clone(),
            DatabaseKind::PureIp => paths.pureip.clone(),
        }
    }
}

/// What happened to one database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ProvisionOutcome {
    /// File already present and `force` was off
    Skipped,
    /// A new file was installed
    Installed {
        /// Size of the installed file
        bytes: usize,
    },
}

/// Per-database result of one provisioning run.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionEntry {
    /// Which database
    pub kind: DatabaseKind,
    /// Destination path
    pub path: PathBuf,
    /// Result
    pub outcome: ProvisionOutcome,
}

/// Result of a provisioning run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProvisionReport {
    /// One entry per database, in provisioning order
    pub entries: Vec<ProvisionEntry>,
}

impl ProvisionReport {
    /// Number of files installed.
    pub fn installed(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, ProvisionOutcome::Installed { .. }))
            .count()
    }
}

/// Makes both database files available under `config.paths`.
///
/// A file that already exists is skipped unless `force` is set. GeoLite2 is
/// handled first; the first failure aborts the run and leaves the
/// corresponding final file untouched.
pub async fn provision(
    config: &ProvisionConfig,
    force: bool,
) -> Result<ProvisionReport, ProvisionError> {
    let mut report = ProvisionReport::default();
    for kind in DatabaseKind::iter() {
        report.entries.push(provision_database(config, kind, force).await?);
    }
    Ok(report)
}

/// Makes one database file available; see [`provision`].
pub async fn provision_database(
    config: &ProvisionConfig,
    kind: DatabaseKind,
    force: bool,
) -> Result<ProvisionEntry, ProvisionError> {
    let path = kind.path(&config.paths);
    if path.exists() && !force {
        log::info!("{} already present at {}, skipping", kind.name(), path.display());
        return Ok(ProvisionEntry {
            kind,
            path,
            outcome: ProvisionOutcome::Skipped,
        });
    }

    let bytes = match kind {
        DatabaseKind::GeoLite2 => fetch_geolite2(config).await?,
        DatabaseKind::PureIp => fetch_pureip(config).await?,
    };
    install_atomically(&path, &bytes)?;

    Ok(ProvisionEntry {
        kind,
        path,
        outcome: ProvisionOutcome::Installed { bytes: bytes.len() },
    })
}

async fn fetch_geolite2(config: &ProvisionConfig) -> Result<Vec<u8>, ProvisionError> {
    let license_key = config
        .license_key
        .as_deref()
        .filter(|k| !k.trim().is_empty())
        .ok_or(ProvisionError::MissingLicenseKey(GEOLITE2_NAME))?;

    let client = build_client(config, None, None)?;
    let url = geolite2_url(&config.maxmind_download_base, license_key);
    let archive = download_with_retries(&client, &url, GEOLITE2_NAME, config).await?;

    let db_bytes = extract_from_tar_gz(&archive, GEOLITE2_FILE_NAME, GEOLITE2_NAME)?;
    validate_mmdb(&db_bytes, GEOLITE2_NAME)?;
    Ok(db_bytes)
}

async fn fetch_pureip(config: &ProvisionConfig) -> Result<Vec<u8>, ProvisionError> {
    let client = build_client(config, Some(BROWSER_USER_AGENT), config.proxy.as_deref())?;
    let bytes = download_with_retries(&client, &config.pureip_url, PUREIP_NAME, config).await?;
    validate_ipdb(&bytes, PUREIP_NAME)?;
    Ok(bytes)
}
