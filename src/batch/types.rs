//! Batch input and output rows.

use serde::Serialize;

use crate::geoip::{LocationRecord, Source};

/// One input row: identifier plus raw address text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    /// Row identifier, passed through unchanged
    pub id: String,
    /// Raw address cell; `None` when the cell is missing
    pub address: Option<String>,
}

impl BatchEntry {
    /// Convenience constructor
    pub fn new(id: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            address: Some(address.into()),
        }
    }
}

/// One output row.
///
/// Location fields stay `None` when the address was never resolved (empty or
/// invalid input); `error` then says why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchRow {
    /// Row identifier from the input
    pub id: String,
    /// Address as it appeared in the input
    pub address: String,
    /// Country name
    pub country: Option<String>,
    /// Region name
    pub region: Option<String>,
    /// City name
    pub city: Option<String>,
    /// Longitude in degrees
    pub longitude: Option<f64>,
    /// Latitude in degrees
    pub latitude: Option<f64>,
    /// IANA timezone name
    pub timezone: Option<String>,
    /// Tier that produced the location
    pub source: Option<Source>,
    /// Per-row failure message
    pub error: Option<String>,
}

impl BatchRow {
    pub(crate) fn resolved(entry: &BatchEntry, address: &str, record: LocationRecord) -> Self {
        Self {
            id: entry.id.clone(),
            address: address.to_string(),
            country: Some(record.country),
            region: Some(record.region),
            city: Some(record.city),
            longitude: Some(record.longitude),
            latitude: Some(record.latitude),
            timezone: Some(record.timezone),
            source: Some(record.source),
            error: None,
        }
    }

    pub(crate) fn failed(entry: &BatchEntry, address: &str, error: &str) -> Self {
        Self {
            id: entry.id.clone(),
            address: address.to_string(),
            country: None,
            region: None,
            city: None,
            longitude: None,
            latitude: None,
            timezone: None,
            source: None,
            error: Some(error.to_string()),
        }
    }
}

/// Counts per outcome for one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Rows processed
    pub total: usize,
    /// Resolved by the primary database
    pub primary: usize,
    /// Resolved by the secondary database
    pub secondary: usize,
    /// Valid addresses neither database knew
    pub unresolved: usize,
    /// Rows with an empty address cell
    pub empty: usize,
    /// Rows whose address did not parse
    pub invalid: usize,
}

impl BatchSummary {
    /// Tallies a finished batch.
    pub fn from_rows(rows: &[BatchRow]) -> Self {
        rows.iter().fold(Self::default(), |mut summary, row| {
            summary.total += 1;
            match (row.source, row.error.as_deref()) {
                (Some(Source::Primary), _) => summary.primary += 1,
                (Some(Source::Secondary), _) => summary.secondary += 1,
                (Some(Source::None), _) => summary.unresolved += 1,
                (_, Some(crate::config::EMPTY_ADDRESS_ERROR)) => summary.empty += 1,
                _ => summary.invalid += 1,
            }
            summary
        })
    }
}

impl std::fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} rows: {} primary, {} secondary, {} unresolved, {} empty, {} invalid",
            self.total, self.primary, self.secondary, self.unresolved, self.empty, self.invalid
        )
    }
}
