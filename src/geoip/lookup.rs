//! Database lookup implementations.
//!
//! Both backing databases implement `LocationLookup`, which turns every
//! reader result (hit, miss, decode failure) into a `SourceOutcome`. Nothing
//! here panics or returns an error; the resolver pattern-matches on the
//! outcome to decide whether to fall back.

use std::net::IpAddr;
use std::path::Path;

use anyhow::{Context, Result};
use maxminddb::Reader;

use super::adapters::{from_geolite2, from_pureip};
use super::ipdb::{IpdbError, IpdbReader};
use super::metadata::{geolite2_info, pureip_info, GEOLITE2_NAME, PUREIP_NAME};
use super::types::{DatabaseInfo, SourceOutcome};
use crate::config::PUREIP_LANGUAGE;

/// A read-only location database.
///
/// Implementations must be safe to query concurrently by shared reference.
pub trait LocationLookup: Send + Sync {
    /// Database name (for logs).
    fn name(&self) -> &'static str;

    /// Looks up one address.
    fn lookup(&self, ip: IpAddr) -> SourceOutcome;

    /// Descriptive metadata.
    fn info(&self) -> DatabaseInfo {
        DatabaseInfo {
            name: self.name(),
            build_time: None,
            details: String::new(),
        }
    }
}

/// PureIPDB (`qqwry.ipdb`), optimized for addresses in China.
pub struct PureIpDatabase {
    reader: IpdbReader,
}

impl PureIpDatabase {
    /// Loads a PureIPDB file from disk
    pub fn open(path: &Path) -> Result<Self> {
        let reader = IpdbReader::open(path)
            .with_context(|| format!("Failed to load PureIPDB database from {}", path.display()))?;
        Ok(Self { reader })
    }

    /// Wraps an already parsed reader.
    pub fn from_reader(reader: IpdbReader) -> Self {
        Self { reader }
    }
}

impl LocationLookup for PureIpDatabase {
    fn name(&self) -> &'static str {
        PUREIP_NAME
    }

    fn lookup(&self, ip: IpAddr) -> SourceOutcome {
        match self.reader.find_map(ip, PUREIP_LANGUAGE) {
            Ok(fields) => SourceOutcome::Found(from_pureip(&fields)),
            Err(IpdbError::NotFound) => SourceOutcome::NotFound,
            Err(e) => SourceOutcome::Unavailable(e.to_string()),
        }
    }

    fn info(&self) -> DatabaseInfo {
        pureip_info(&self.reader)
    }
}

/// MaxMind GeoLite2-City (`.mmdb`), worldwide coverage.
pub struct GeoLite2Database {
    reader: Reader<Vec<u8>>,
}

impl GeoLite2Database {
    /// Loads a GeoLite2 database from a local file path
    pub fn open(path: &Path) -> Result<Self> {
        let db_bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read GeoLite2 database from {}", path.display()))?;
        Self::from_bytes(db_bytes)
            .with_context(|| format!("Failed to parse GeoLite2 database from {}", path.display()))
    }

    /// Parses a GeoLite2 database already in memory.
    pub fn from_bytes(db_bytes: Vec<u8>) -> Result<Self> {
        let reader = Reader::from_source(db_bytes)?;
        Ok(Self { reader })
    }
}

impl LocationLookup for GeoLite2Database {
    fn name(&self) -> &'static str {
        GEOLITE2_NAME
    }

    fn lookup(&self, ip: IpAddr) -> SourceOutcome {
        // maxminddb 0.27 API: lookup() returns Result<LookupResult, MaxMindDbError>
        let city_lookup = match self.reader.lookup(ip) {
            Ok(result) => result,
            Err(e) => return SourceOutcome::Unavailable(e.to_string()),
        };

        if !city_lookup.has_data() {
            return SourceOutcome::NotFound;
        }

        match city_lookup.decode::<maxminddb::geoip2::City>() {
            Ok(Some(city)) => SourceOutcome::Found(from_geolite2(&city)),
            Ok(None) => SourceOutcome::NotFound,
            Err(e) => SourceOutcome::Unavailable(e.to_string()),
        }
    }

    fn info(&self) -> DatabaseInfo {
        geolite2_info(&self.reader)
    }
}
