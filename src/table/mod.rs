//! Batch input and output tables.
//!
//! Input is a CSV file or a spreadsheet (`.xlsx`, `.xls`, `.ods`) whose first
//! row is a header, first column an identifier and second column an address.
//! Output is CSV or `.xlsx`, chosen by extension, and is written to a
//! temporary file that replaces the destination only once complete.

mod delimited;
mod spreadsheet;

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::batch::{BatchEntry, BatchRow};
use crate::config::RESULTS_SUFFIX;
use crate::error_handling::TableError;

/// Output column headers, in order.
pub const OUTPUT_HEADERS: [&str; 10] = [
    "id",
    "address",
    "country",
    "region",
    "city",
    "longitude",
    "latitude",
    "timezone",
    "source",
    "error",
];

/// Supported table formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Comma-separated values
    Csv,
    /// Excel 2007+ workbook (read and write)
    Xlsx,
    /// Legacy Excel workbook (read only)
    Xls,
    /// OpenDocument spreadsheet (read only)
    Ods,
}

impl TableFormat {
    /// Format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("csv") => Ok(TableFormat::Csv),
            Some("xlsx") => Ok(TableFormat::Xlsx),
            Some("xls") => Ok(TableFormat::Xls),
            Some("ods") => Ok(TableFormat::Ods),
            _ => Err(TableError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// True for formats this crate can write.
    pub fn is_writable(&self) -> bool {
        matches!(self, TableFormat::Csv | TableFormat::Xlsx)
    }
}

/// `<stem>_results.csv` for CSV input, `<stem>_results.xlsx` otherwise, next
/// to the input file.
pub fn default_output_path(input: &Path) -> Result<PathBuf, TableError> {
    let extension = match TableFormat::from_path(input)? {
        TableFormat::Csv => "csv",
        TableFormat::Xlsx | TableFormat::Xls | TableFormat::Ods => "xlsx",
    };
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(input.with_file_name(format!("{}{}.{}", stem, RESULTS_SUFFIX, extension)))
}

/// Reads batch entries from `path`, skipping the header row.
pub fn read_entries(path: &Path) -> Result<Vec<BatchEntry>, TableError> {
    let entries = match TableFormat::from_path(path)? {
        TableFormat::Csv => delimited::read_entries(path)?,
        TableFormat::Xlsx | TableFormat::Xls | TableFormat::Ods => spreadsheet::read_entries(path)?,
    };
    log::info!("Read {} rows from {}", entries.len(), path.display());
    Ok(entries)
}

/// Writes result rows to `path` atomically.
pub fn write_rows(path: &Path, rows: &[BatchRow]) -> Result<(), TableError> {
    let format = TableFormat::from_path(path)?;
    let bytes = match format {
        TableFormat::Csv => delimited::encode_rows(rows)?,
        TableFormat::Xlsx => spreadsheet::encode_rows(rows)?,
        TableFormat::Xls | TableFormat::Ods => {
            return Err(TableError::UnsupportedFormat(path.to_path_buf()))
        }
    };
    persist_atomically(path, &bytes)?;
    log::info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Cell values of one row, in `OUTPUT_HEADERS` order.
pub(crate) fn row_cells(row: &BatchRow) -> [String; 10] {
    let text = |value: &Option<String>| value.clone().unwrap_or_default();
    let number = |value: Option<f64>| value.map(|v| v.to_string()).unwrap_or_default();
    [
        row.id.clone(),
        row.address.clone(),
        text(&row.country),
        text(&row.region),
        text(&row.city),
        number(row.longitude),
        number(row.latitude),
        text(&row.timezone),
        row.source.map(|s| s.to_string()).unwrap_or_default(),
        text(&row.error),
    ]
}

fn persist_atomically(path: &Path, bytes: &[u8]) -> Result<(), TableError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(path)?;
    Ok(())
}
