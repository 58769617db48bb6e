//! Descriptive metadata for loaded databases.
//!
//! This module extracts build time and content descriptions from both readers.

use chrono::DateTime;
use maxminddb::Reader;

use super::ipdb::IpdbReader;
use super::types::DatabaseInfo;

/// Name under which the primary database is reported
pub const PUREIP_NAME: &str = "PureIPDB";
/// Name under which the secondary database is reported
pub const GEOLITE2_NAME: &str = "GeoLite2";

/// Formats a Unix timestamp as `YYYY-MM-DD HH:MM:SS` (UTC).
pub(crate) fn format_build_time(epoch_secs: i64) -> Option<String> {
    DateTime::from_timestamp(epoch_secs, 0).map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// Extracts metadata from a PureIPDB reader
pub(crate) fn pureip_info(reader: &IpdbReader) -> DatabaseInfo {
    DatabaseInfo {
        name: PUREIP_NAME,
        build_time: format_build_time(reader.build_time()),
        details: format!(
            "languages: {}; fields: {}",
            reader.languages().join(", "),
            reader.fields().join(", ")
        ),
    }
}

/// Extracts metadata from a GeoLite2 reader
pub(crate) fn geolite2_info<T: AsRef<[u8]>>(reader: &Reader<T>) -> DatabaseInfo {
    let build_epoch = i64::try_from(reader.metadata.build_epoch).ok();
    DatabaseInfo {
        name: GEOLITE2_NAME,
        build_time: build_epoch.and_then(format_build_time),
        details: format!(
            "type: {}; ip version: {}; nodes: {}",
            reader.metadata.database_type, reader.metadata.ip_version, reader.metadata.node_count
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geoip::ipdb::test_helpers::{IpdbBuilder, FIXTURE_BUILD_TIME};

    #[test]
    fn test_format_build_time() {
        assert_eq!(
            format_build_time(0).as_deref(),
            Some("1970-01-01 00:00:00")
        );
        assert_eq!(
            format_build_time(FIXTURE_BUILD_TIME).as_deref(),
            Some("2023-11-14 22:13:20")
        );
    }

    #[test]
    fn test_format_build_time_out_of_range() {
        assert!(format_build_time(i64::MAX).is_none());
    }

    #[test]
    fn test_pureip_info() {
        let bytes = IpdbBuilder::new(&["country_name", "city_name"])
            .insert_v4("1.0.0.0", 8, &["中国", "北京"])
            .build();
        let reader = IpdbReader::from_bytes(bytes).unwrap();
        let info = pureip_info(&reader);
        assert_eq!(info.name, "PureIPDB");
        assert_eq!(info.build_time.as_deref(), Some("2023-11-14 22:13:20"));
        assert!(info.details.contains("CN"));
        assert!(info.details.contains("country_name, city_name"));
    }
}
