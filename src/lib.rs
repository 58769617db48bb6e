//! ip_location library: two-tier IP geolocation over local databases
//!
//! Resolves IPv4 and IPv6 addresses to country, region, city, coordinates and
//! timezone. PureIPDB (`qqwry.ipdb`, strong coverage of China) is consulted
//! first and MaxMind GeoLite2-City second; when neither knows an address the
//! result is an explicit all-unknown record rather than an error.
//!
//! # Example
//!
//! ```no_run
//! use ip_location::{resolve_text, Config, Session};
//!
//! let config = Config::default();
//! let mut session = Session::open(&config.database_paths());
//!
//! let record = resolve_text(&session, "8.8.8.8");
//! println!("{} / {} / {} ({})", record.country, record.region, record.city, record.source);
//!
//! session.close();
//! ```
//!
//! Batch files and database downloads are available through [`run_batch`]
//! and [`run_provision`]; the latter requires a Tokio runtime.

#![warn(missing_docs)]

pub mod address;
pub mod batch;
pub mod config;
pub mod error_handling;
pub mod geoip;
pub mod initialization;
pub mod provision;
mod run;
pub mod table;

// Re-export public API
pub use address::{canonicalize, AddressError};
pub use batch::{process_batch, BatchEntry, BatchRow, BatchSummary};
pub use config::{Config, DatabasePaths, LogFormat, LogLevel};
pub use error_handling::{InitializationError, ProvisionError, TableError};
pub use geoip::{
    resolve, resolve_text, DatabaseInfo, LocationLookup, LocationRecord, Session, Source,
    SourceOutcome,
};
pub use provision::{provision, ProvisionConfig, ProvisionOutcome, ProvisionReport};
pub use run::{run_batch, run_lookup, run_provision, BatchReport, LookupReport};
