//! Database handle lifecycle.
//!
//! ```text
//! UNINITIALIZED --file present, load ok--> OPEN --close()--> CLOSED
//!       \--file missing or load failed--> ABSENT
//! ```
//!
//! There is no transition back to OPEN; a fresh `Session` is needed to pick
//! up new files.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use super::lookup::LocationLookup;

/// Observable handle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleState {
    /// Loaded and queryable
    Open,
    /// File missing or failed to load
    Absent,
    /// Explicitly shut down
    Closed,
}

/// One backing database for the duration of a session.
pub enum DatabaseHandle {
    /// Loaded and queryable
    Open(Box<dyn LocationLookup>),
    /// File missing or failed to load; skipped for the whole session
    Absent,
    /// Explicitly shut down
    Closed,
}

impl DatabaseHandle {
    /// Opens `path` with `load` if the file exists.
    ///
    /// A missing file or a load error yields `Absent` and a warning; neither is
    /// fatal.
    pub fn open_with<L, F>(name: &str, path: &Path, load: F) -> Self
    where
        L: LocationLookup + 'static,
        F: FnOnce(&Path) -> Result<L>,
    {
        if !path.exists() {
            log::warn!("{} database not found at {}", name, path.display());
            return DatabaseHandle::Absent;
        }

        log::info!("Loading {} database from {}", name, path.display());
        match load(path) {
            Ok(db) => {
                let info = db.info();
                log::info!(
                    "{} database loaded (built {}; {})",
                    name,
                    info.build_time.as_deref().unwrap_or("unknown"),
                    info.details
                );
                DatabaseHandle::Open(Box::new(db))
            }
            Err(e) => {
                log::warn!("{} database failed to load: {:#}", name, e);
                DatabaseHandle::Absent
            }
        }
    }

    /// Handle around an already loaded database.
    pub fn from_lookup<L: LocationLookup + 'static>(db: L) -> Self {
        DatabaseHandle::Open(Box::new(db))
    }

    /// The database, if the handle is open.
    pub fn get(&self) -> Option<&dyn LocationLookup> {
        match self {
            DatabaseHandle::Open(db) => Some(db.as_ref()),
            DatabaseHandle::Absent | DatabaseHandle::Closed => None,
        }
    }

    /// Current state.
    pub fn state(&self) -> HandleState {
        match self {
            DatabaseHandle::Open(_) => HandleState::Open,
            DatabaseHandle::Absent => HandleState::Absent,
            DatabaseHandle::Closed => HandleState::Closed,
        }
    }

    /// Releases the reader. Absent handles stay absent.
    pub fn close(&mut self) {
        if let DatabaseHandle::Open(db) = self {
            log::debug!("Closing {} database", db.name());
            *self = DatabaseHandle::Closed;
        }
    }
}

impl std::fmt::Debug for DatabaseHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatabaseHandle::Open(db) => write!(f, "Open({})", db.name()),
            DatabaseHandle::Absent => f.write_str("Absent"),
            DatabaseHandle::Closed => f.write_str("Closed"),
        }
    }
}
