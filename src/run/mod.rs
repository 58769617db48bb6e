//! Top-level operations behind the CLI subcommands.
//!
//! Each function opens what it needs, does its work and releases the
//! databases before returning. Errors carry context for the user.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::address::canonical_text;
use crate::batch::{process_batch, BatchSummary};
use crate::config::Config;
use crate::geoip::{resolve_text, DatabaseInfo, LocationRecord, Session};
use crate::provision::{provision, ProvisionConfig, ProvisionReport};
use crate::table::{default_output_path, read_entries, write_rows, TableFormat};

/// Result of a single lookup.
#[derive(Debug, Clone, Serialize)]
pub struct LookupReport {
    /// Address as given
    pub input: String,
    /// Canonical form, when the input parsed
    pub address: Option<String>,
    /// Resolved location
    pub record: LocationRecord,
    /// Databases that were open for the lookup
    pub databases: Vec<DatabaseInfo>,
}

/// Result of a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// Input table
    pub input: PathBuf,
    /// Output table
    pub output: PathBuf,
    /// Per-outcome counts
    pub summary: BatchSummary,
    /// Wall-clock duration
    pub elapsed_seconds: f64,
}

/// Resolves one address using the databases under `config.data_dir`.
pub fn run_lookup(config: &Config, address: &str) -> LookupReport {
    let mut session = Session::open(&config.database_paths());
    let report = LookupReport {
        input: address.to_string(),
        address: canonical_text(address).ok(),
        record: resolve_text(&session, address),
        databases: session.describe(),
    };
    session.close();
    report
}

/// Resolves every row of `input` and writes the results table.
///
/// The output defaults to `<stem>_results.<ext>` next to the input. Nothing
/// is written unless every row has been processed.
pub fn run_batch(config: &Config, input: &Path, output: Option<&Path>) -> Result<BatchReport> {
    let start_time = Instant::now();

    let output = match output {
        Some(path) => path.to_path_buf(),
        None => default_output_path(input)
            .with_context(|| format!("Cannot derive output path from {}", input.display()))?,
    };
    let output_format = TableFormat::from_path(&output)
        .with_context(|| format!("Unsupported output file {}", output.display()))?;
    if !output_format.is_writable() {
        anyhow::bail!(
            "Output file {} must be .csv or .xlsx",
            output.display()
        );
    }

    let entries =
        read_entries(input).with_context(|| format!("Failed to read {}", input.display()))?;

    let mut session = Session::open(&config.database_paths());
    let rows = process_batch(&session, &entries);
    session.close();

    write_rows(&output, &rows)
        .with_context(|| format!("Failed to write results to {}", output.display()))?;

    let summary = BatchSummary::from_rows(&rows);
    log::info!("Batch complete: {}", summary);

    Ok(BatchReport {
        input: input.to_path_buf(),
        output,
        summary,
        elapsed_seconds: start_time.elapsed().as_secs_f64(),
    })
}

/// Downloads the databases missing from `config.data_dir` (all of them with
/// `force`).
pub async fn run_provision(config: &Config, force: bool) -> Result<ProvisionReport> {
    let provision_config = ProvisionConfig::from(config);
    provision(&provision_config, force)
        .await
        .context("Database provisioning failed")
}
