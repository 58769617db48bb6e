//! Lookup session: the two database handles, opened once and shared by
//! every lookup until `close()`.

use super::handle::{DatabaseHandle, HandleState};
use super::lookup::{GeoLite2Database, LocationLookup, PureIpDatabase};
use super::metadata::{GEOLITE2_NAME, PUREIP_NAME};
use super::types::DatabaseInfo;
use crate::config::DatabasePaths;

/// Owns the primary (PureIPDB) and secondary (GeoLite2) handles.
///
/// Lookups take `&Session`, so a session can be shared across threads for
/// concurrent batch work. Opening never fails: a missing or unreadable
/// database leaves its handle `Absent` and lookups skip it.
#[derive(Debug)]
pub struct Session {
    primary: DatabaseHandle,
    secondary: DatabaseHandle,
}

impl Session {
    /// Opens both databases from their standard locations.
    pub fn open(paths: &DatabasePaths) -> Self {
        let primary = DatabaseHandle::open_with(PUREIP_NAME, &paths.pureip, PureIpDatabase::open);
        let secondary =
            DatabaseHandle::open_with(GEOLITE2_NAME, &paths.geolite2, GeoLite2Database::open);

        let session = Self { primary, secondary };
        if !session.has_open_database() {
            log::warn!("No location database is available; every lookup will return unknown");
        }
        session
    }

    /// Session over already loaded databases. `None` yields an absent handle.
    pub fn from_sources(
        primary: Option<Box<dyn LocationLookup>>,
        secondary: Option<Box<dyn LocationLookup>>,
    ) -> Self {
        let into_handle = |db: Option<Box<dyn LocationLookup>>| match db {
            Some(db) => DatabaseHandle::Open(db),
            None => DatabaseHandle::Absent,
        };
        Self {
            primary: into_handle(primary),
            secondary: into_handle(secondary),
        }
    }

    /// Session with both handles absent.
    pub fn empty() -> Self {
        Self::from_sources(None, None)
    }

    /// Primary database, if open.
    pub fn primary(&self) -> Option<&dyn LocationLookup> {
        self.primary.get()
    }

    /// Secondary database, if open.
    pub fn secondary(&self) -> Option<&dyn LocationLookup> {
        self.secondary.get()
    }

    /// States of the primary and secondary handles.
    pub fn states(&self) -> (HandleState, HandleState) {
        (self.primary.state(), self.secondary.state())
    }

    /// True when at least one handle is open.
    pub fn has_open_database(&self) -> bool {
        self.primary.get().is_some() || self.secondary.get().is_some()
    }

    /// Metadata of every open database, primary first.
    pub fn describe(&self) -> Vec<DatabaseInfo> {
        [self.primary(), self.secondary()]
            .into_iter()
            .flatten()
            .map(|db| db.info())
            .collect()
    }

    /// Releases both readers. Safe to call more than once.
    pub fn close(&mut self) {
        self.primary.close();
        self.secondary.close();
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}
