//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `ip_location` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use ip_location::config::{Cli, Command};
use ip_location::initialization::init_logger_with;
use ip_location::provision::ProvisionOutcome;
use ip_location::{run_batch, run_lookup, run_provision, LookupReport};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    // This allows setting MAXMIND_LICENSE_KEY in .env without exporting it manually
    if dotenvy::dotenv().is_err() {
        // If .env not found in current dir, try next to the executable
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let cli = Cli::parse();

    // Initialize logger based on CLI flags
    let log_level = cli.log_level.clone();
    let log_format = cli.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    if let Err(e) = dispatch(&cli).await {
        eprintln!("ip_location error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}

async fn dispatch(cli: &Cli) -> Result<()> {
    let config = cli.to_config();

    match &cli.command {
        Command::Lookup { address, json } => {
            let report = run_lookup(&config, address);
            if *json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&report).context("Failed to encode result")?
                );
            } else {
                print_lookup(&report);
            }
        }
        Command::Batch { input, output } => {
            let report = run_batch(&config, input, output.as_deref())?;
            println!(
                "Processed {} in {:.1}s: {}",
                report.input.display(),
                report.elapsed_seconds,
                report.summary
            );
            println!("Results saved in {}", report.output.display());
        }
        Command::Provision { force, .. } => {
            let report = run_provision(&config, *force).await?;
            for entry in &report.entries {
                match &entry.outcome {
                    ProvisionOutcome::Skipped => println!(
                        "{}: already present at {}",
                        entry.kind.name(),
                        entry.path.display()
                    ),
                    ProvisionOutcome::Installed { bytes } => println!(
                        "{}: installed {} ({:.1} MiB)",
                        entry.kind.name(),
                        entry.path.display(),
                        *bytes as f64 / (1024.0 * 1024.0)
                    ),
                }
            }
        }
    }
    Ok(())
}

fn print_lookup(report: &LookupReport) {
    let record = &report.record;
    println!("Address:   {}", report.address.as_deref().unwrap_or(&report.input));
    println!("Country:   {}", record.country);
    println!("Region:    {}", record.region);
    println!("City:      {}", record.city);
    println!("Latitude:  {}", record.latitude);
    println!("Longitude: {}", record.longitude);
    println!("Timezone:  {}", record.timezone);
    println!("Source:    {}", record.source);

    if report.databases.is_empty() {
        println!("Databases: none loaded (run `ip_location provision`)");
    }
    for info in &report.databases {
        println!(
            "Database:  {} (built {}; {})",
            info.name,
            info.build_time.as_deref().unwrap_or("unknown"),
            info.details
        );
    }
}
