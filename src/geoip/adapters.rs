//! Per-source normalization into `LocationRecord`.
//!
//! Each backing database exposes its own field layout: PureIPDB returns a flat
//! field-name -> string map, GeoLite2 a nested `City` structure with localized
//! name tables and a list of subdivisions. The functions here map each layout
//! onto the canonical record, substituting sentinels for anything missing.
//! They do not decide tiers; the resolver stamps `source`.

use std::collections::BTreeMap;

use crate::config::{PUREIP_UNKNOWN_MARKER, UNKNOWN};
use crate::geoip::types::LocationRecord;

/// Maps a PureIPDB `find_map` result.
pub fn from_pureip(fields: &BTreeMap<String, String>) -> LocationRecord {
    let text = |name: &str| normalize_text(fields.get(name).map(String::as_str));
    let number = |name: &str| {
        fields
            .get(name)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    };

    LocationRecord {
        country: text("country_name"),
        region: text("region_name"),
        city: text("city_name"),
        latitude: number("latitude"),
        longitude: number("longitude"),
        timezone: text("timezone"),
        ..LocationRecord::unknown()
    }
}

/// Maps a decoded GeoLite2-City entry.
pub fn from_geolite2(city: &maxminddb::geoip2::City) -> LocationRecord {
    // Most specific subdivision is the last one.
    let region = city
        .subdivisions
        .last()
        .and_then(|subdivision| subdivision.names.english);

    LocationRecord {
        country: normalize_text(city.country.names.english),
        region: normalize_text(region),
        city: normalize_text(city.city.names.english),
        latitude: city.location.latitude.unwrap_or(0.0),
        longitude: city.location.longitude.unwrap_or(0.0),
        timezone: normalize_text(city.location.time_zone),
        ..LocationRecord::unknown()
    }
}

fn normalize_text(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() && v != PUREIP_UNKNOWN_MARKER => v.to_string(),
        _ => UNKNOWN.to_string(),
    }
}
