//! Batch resolution.
//!
//! Turns `(id, address)` entries into output rows in input order. Each row is
//! handled on its own: an empty or malformed address yields an error row and
//! never stops the batch.

mod types;

use std::time::Instant;

pub use types::{BatchEntry, BatchRow, BatchSummary};

use crate::address::canonicalize;
use crate::config::PROGRESS_LOG_INTERVAL;
use crate::geoip::{resolve, Session};

/// Resolves every entry against `session`.
pub fn process_batch(session: &Session, entries: &[BatchEntry]) -> Vec<BatchRow> {
    let start_time = Instant::now();
    let mut rows = Vec::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        rows.push(process_entry(session, entry));

        let completed = index + 1;
        if completed % PROGRESS_LOG_INTERVAL == 0 {
            log_progress(start_time, completed, entries.len());
        }
    }

    log_progress(start_time, rows.len(), entries.len());
    rows
}

fn process_entry(session: &Session, entry: &BatchEntry) -> BatchRow {
    let raw = entry.address.as_deref().unwrap_or_default();
    match canonicalize(raw) {
        Ok(ip) => BatchRow::resolved(entry, raw, resolve(session, ip)),
        Err(e) => {
            log::debug!("Row {}: {}", entry.id, e);
            BatchRow::failed(entry, raw, e.row_message())
        }
    }
}

fn log_progress(start_time: Instant, completed: usize, total: usize) {
    let elapsed_secs = start_time.elapsed().as_secs_f64();
    let rate = if elapsed_secs > 0.0 {
        completed as f64 / elapsed_secs
    } else {
        0.0
    };
    log::info!(
        "Processed {}/{} rows in {:.2} seconds (~{:.0} rows/sec)",
        completed,
        total,
        elapsed_secs,
        rate
    );
}
