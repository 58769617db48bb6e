//! Spreadsheet input (xlsx, xls, ods) and xlsx output.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use rust_xlsxwriter::{Format, Workbook};

use super::{row_cells, OUTPUT_HEADERS};
use crate::batch::{BatchEntry, BatchRow};
use crate::error_handling::TableError;

/// Reads `(id, address)` entries from the first sheet; row 1 is the header.
pub(super) fn read_entries(path: &Path) -> Result<Vec<BatchEntry>, TableError> {
    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| TableError::Spreadsheet(format!("Failed to open {}: {}", path.display(), e)))?;

    let first_sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| TableError::Spreadsheet(format!("{} contains no sheets", path.display())))?;

    let range = workbook.worksheet_range(&first_sheet).map_err(|e| {
        TableError::Spreadsheet(format!("Failed to read sheet '{}': {}", first_sheet, e))
    })?;

    let (_, width) = range.get_size();
    if width < 2 {
        return Err(TableError::TooFewColumns {
            path: path.to_path_buf(),
            found: width,
        });
    }

    Ok(range
        .rows()
        .skip(1)
        .map(|row| BatchEntry {
            id: row.first().and_then(cell_text).unwrap_or_default(),
            address: row.get(1).and_then(cell_text),
        })
        .collect())
}

/// Cell value as text; `None` for empty cells.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(s.clone()),
        // Integers typed into a sheet come back as floats
        Data::Float(n) if n.fract() == 0.0 && n.abs() < 1e15 => Some(format!("{}", *n as i64)),
        Data::Float(n) => Some(n.to_string()),
        Data::Int(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// Encodes rows as a single-sheet xlsx workbook.
pub(super) fn encode_rows(rows: &[BatchRow]) -> Result<Vec<u8>, TableError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let worksheet = workbook.add_worksheet().set_name("results")?;

    for (col, header) in OUTPUT_HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (index, row) in rows.iter().enumerate() {
        let row_num = (index + 1) as u32;
        for (col, value) in row_cells(row).iter().enumerate() {
            let col = col as u16;
            match (col, row.longitude, row.latitude) {
                (5, Some(longitude), _) => {
                    worksheet.write_number(row_num, col, longitude)?;
                }
                (6, _, Some(latitude)) => {
                    worksheet.write_number(row_num, col, latitude)?;
                }
                _ if value.is_empty() => {}
                _ => {
                    worksheet.write_string(row_num, col, value)?;
                }
            }
        }
    }

    for (col, width) in column_widths(rows).iter().enumerate() {
        worksheet.set_column_width(col as u16, *width as f64)?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// Widest cell text per column (header included) plus two characters.
fn column_widths(rows: &[BatchRow]) -> [usize; OUTPUT_HEADERS.len()] {
    let mut widths = OUTPUT_HEADERS.map(|header| header.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row_cells(row).iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }
    widths.map(|width| width + 2)
}
