//! Two-tier location resolution.
//!
//! The primary database is authoritative when it knows the country. Every
//! other primary answer is a miss and the secondary database is tried. When
//! neither answers, the all-unknown record is returned.

use std::net::IpAddr;

use super::session::Session;
use super::types::{LocationRecord, Source, SourceOutcome};
use crate::address::canonicalize;

/// Resolves one address against the session.
///
/// Never fails and never mutates the session; repeated calls with the same
/// address return the same record.
pub fn resolve(session: &Session, ip: IpAddr) -> LocationRecord {
    if let Some(primary) = session.primary() {
        match primary.lookup(ip) {
            SourceOutcome::Found(record) if record.has_known_country() => {
                return record.with_source(Source::Primary);
            }
            SourceOutcome::Found(_) => {
                log::debug!("{}: unknown country for {}", primary.name(), ip);
            }
            SourceOutcome::NotFound => {
                log::debug!("{}: no entry for {}", primary.name(), ip);
            }
            SourceOutcome::Unavailable(reason) => {
                log::debug!("{}: lookup of {} failed: {}", primary.name(), ip, reason);
            }
        }
    }

    if let Some(secondary) = session.secondary() {
        match secondary.lookup(ip) {
            SourceOutcome::Found(record) => return record.with_source(Source::Secondary),
            SourceOutcome::NotFound => {
                log::debug!("{}: no entry for {}", secondary.name(), ip);
            }
            SourceOutcome::Unavailable(reason) => {
                log::debug!("{}: lookup of {} failed: {}", secondary.name(), ip, reason);
            }
        }
    }

    LocationRecord::unknown()
}

/// Parses `raw` and resolves it.
///
/// Text that is not an address yields the invalid record without consulting
/// either database.
pub fn resolve_text(session: &Session, raw: &str) -> LocationRecord {
    match canonicalize(raw) {
        Ok(ip) => resolve(session, ip),
        Err(e) => {
            log::debug!("Rejecting {:?}: {}", raw, e);
            LocationRecord::invalid()
        }
    }
}
