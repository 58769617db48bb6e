//! GeoIP data structures.
//!
//! This module defines the canonical lookup record, the per-source lookup
//! outcome and the descriptive metadata of loaded databases.

use serde::Serialize;
use strum_macros::EnumIter;

use crate::config::{ERROR_SENTINEL, UNKNOWN};

/// Which tier produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// PureIPDB, consulted first
    Primary,
    /// GeoLite2-City, consulted on primary miss
    Secondary,
    /// Neither database knew the address
    None,
    /// Input was not a valid address
    Invalid,
}

impl Source {
    /// Stable lowercase name used in output tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Primary => "primary",
            Source::Secondary => "secondary",
            Source::None => "none",
            Source::Invalid => "invalid",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical lookup result.
///
/// String fields a source does not supply hold `"unknown"`, numeric fields
/// hold `0.0`. Records for invalid input hold `"error"` in every string field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationRecord {
    /// Country name
    pub country: String,
    /// Most specific region / subdivision name
    pub region: String,
    /// City name
    pub city: String,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// IANA timezone name
    pub timezone: String,
    /// Tier that produced the record
    pub source: Source,
}

impl LocationRecord {
    /// All-unknown record, `source = None`.
    pub fn unknown() -> Self {
        Self {
            country: UNKNOWN.to_string(),
            region: UNKNOWN.to_string(),
            city: UNKNOWN.to_string(),
            latitude: 0.0,
            longitude: 0.0,
            timezone: UNKNOWN.to_string(),
            source: Source::None,
        }
    }

    /// Record for text that is not an address, `source = Invalid`.
    pub fn invalid() -> Self {
        Self {
            country: ERROR_SENTINEL.to_string(),
            region: ERROR_SENTINEL.to_string(),
            city: ERROR_SENTINEL.to_string(),
            latitude: 0.0,
            longitude: 0.0,
            timezone: ERROR_SENTINEL.to_string(),
            source: Source::Invalid,
        }
    }

    /// Same fields, different tier.
    pub fn with_source(self, source: Source) -> Self {
        Self { source, ..self }
    }

    /// False when the country is the `"unknown"` sentinel.
    pub fn has_known_country(&self) -> bool {
        self.country != UNKNOWN
    }
}

/// Result of asking one database about one address.
///
/// Adapters fill the location fields; the resolver assigns `source`.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceOutcome {
    /// The database has an entry for the address.
    Found(LocationRecord),
    /// The database has no entry for the address.
    NotFound,
    /// The database could not answer (corrupt data, unsupported family, ...).
    Unavailable(String),
}

/// Descriptive metadata of a loaded database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseInfo {
    /// Database name (e.g. "PureIPDB")
    pub name: &'static str,
    /// Build time, `YYYY-MM-DD HH:MM:SS` UTC, if the database records one
    pub build_time: Option<String>,
    /// Free-form description (languages, fields, database type)
    pub details: String,
}
