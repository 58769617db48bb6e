//! Acceptance checks for downloaded database payloads.

use maxminddb::Reader;

use crate::config::{MAX_IPDB_METADATA_LENGTH, MIN_DATABASE_SIZE};
use crate::error_handling::ProvisionError;

fn reject(database: &'static str, reason: String) -> ProvisionError {
    ProvisionError::Validation { database, reason }
}

/// Rejects payloads smaller than a real database (error pages, truncation).
pub(crate) fn check_min_size(bytes: &[u8], database: &'static str) -> Result<(), ProvisionError> {
    if bytes.len() < MIN_DATABASE_SIZE {
        return Err(reject(
            database,
            format!(
                "file too small: {} bytes (min: {} bytes)",
                bytes.len(),
                MIN_DATABASE_SIZE
            ),
        ));
    }
    Ok(())
}

/// PureIPDB: minimum size and a plausible metadata-length header.
pub(crate) fn validate_ipdb(bytes: &[u8], database: &'static str) -> Result<(), ProvisionError> {
    check_min_size(bytes, database)?;

    let header: [u8; 4] = bytes[..4]
        .try_into()
        .map_err(|_| reject(database, "missing metadata header".to_string()))?;
    let meta_length = u32::from_be_bytes(header) as usize;
    if meta_length == 0 || meta_length >= MAX_IPDB_METADATA_LENGTH {
        return Err(reject(
            database,
            format!("invalid metadata length {} in header", meta_length),
        ));
    }
    Ok(())
}

/// GeoLite2: minimum size and a successful parse by the MaxMind reader.
pub(crate) fn validate_mmdb(bytes: &[u8], database: &'static str) -> Result<(), ProvisionError> {
    check_min_size(bytes, database)?;

    let reader = Reader::from_source(bytes)
        .map_err(|e| reject(database, format!("not a valid MaxMind database: {}", e)))?;
    log::debug!(
        "{} validated: type {}, build epoch {}",
        database,
        reader.metadata.database_type,
        reader.metadata.build_epoch
    );
    Ok(())
}
