//! CSV input and output.

use std::path::Path;

use csv::{ReaderBuilder, Writer};

use super::{row_cells, OUTPUT_HEADERS};
use crate::batch::{BatchEntry, BatchRow};
use crate::error_handling::TableError;

/// Reads `(id, address)` entries; the first record is the header.
pub(super) fn read_entries(path: &Path) -> Result<Vec<BatchEntry>, TableError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    // Only the header's column count is used; its text may be in any encoding.
    let columns = reader.byte_headers()?.len();
    if columns < 2 {
        return Err(TableError::TooFewColumns {
            path: path.to_path_buf(),
            found: columns,
        });
    }

    let mut entries = Vec::new();
    for result in reader.records() {
        let record = result?;
        entries.push(BatchEntry {
            id: record.get(0).unwrap_or_default().to_string(),
            address: record.get(1).map(str::to_string),
        });
    }
    Ok(entries)
}

/// Encodes rows as CSV with a header line.
pub(super) fn encode_rows(rows: &[BatchRow]) -> Result<Vec<u8>, TableError> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(OUTPUT_HEADERS)?;
    for row in rows {
        writer.write_record(row_cells(row))?;
    }
    writer
        .into_inner()
        .map_err(|e| TableError::Io(e.into_error()))
}
