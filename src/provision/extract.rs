//! Archive extraction.
//!
//! MaxMind ships GeoLite2 as a tar.gz with the `.mmdb` file inside a dated
//! directory (e.g. `GeoLite2-City_20240101/GeoLite2-City.mmdb`).

use std::io::Read;

use flate2::read::GzDecoder;
use tar::Archive;

use crate::error_handling::ProvisionError;

/// Extracts `file_name` from a tar.gz archive, matching on the entry's final
/// path component only.
pub(crate) fn extract_from_tar_gz(
    tar_gz_bytes: &[u8],
    file_name: &str,
    database: &'static str,
) -> Result<Vec<u8>, ProvisionError> {
    let invalid = |reason: String| ProvisionError::Validation { database, reason };

    log::debug!("Extracting {} from tar.gz archive", file_name);

    let mut tar_archive = Archive::new(GzDecoder::new(tar_gz_bytes));
    let entries = tar_archive
        .entries()
        .map_err(|e| invalid(format!("failed to read tar archive entries: {}", e)))?;

    for entry_result in entries {
        let mut entry = entry_result.map_err(|e| invalid(format!("failed to read tar entry: {}", e)))?;
        let is_match = entry
            .path()
            .map_err(|e| invalid(format!("failed to get entry path: {}", e)))?
            .file_name()
            .and_then(|n| n.to_str())
            == Some(file_name);

        if is_match {
            let mut bytes = Vec::new();
            entry
                .read_to_end(&mut bytes)
                .map_err(|e| invalid(format!("failed to read {} from archive: {}", file_name, e)))?;
            log::info!("Extracted {} from tar.gz ({} bytes)", file_name, bytes.len());
            return Ok(bytes);
        }
    }

    Err(invalid(format!("{} not found in tar.gz archive", file_name)))
}
