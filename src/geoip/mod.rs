//! IP geolocation over two local databases.
//!
//! PureIPDB (`qqwry.ipdb`) is consulted first and GeoLite2-City (`.mmdb`)
//! second. Both are opened once into a [`Session`] and queried through the
//! [`LocationLookup`] trait; [`resolve`] implements the fallback between them.

mod adapters;
mod handle;
pub mod ipdb;
mod lookup;
mod metadata;
mod resolver;
mod session;
mod types;

// Re-export public API
pub use adapters::{from_geolite2, from_pureip};
pub use handle::{DatabaseHandle, HandleState};
pub use lookup::{GeoLite2Database, LocationLookup, PureIpDatabase};
pub use metadata::{GEOLITE2_NAME, PUREIP_NAME};
pub use resolver::{resolve, resolve_text};
pub use session::Session;
pub use types::{DatabaseInfo, LocationRecord, Source, SourceOutcome};
