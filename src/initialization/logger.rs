//! Logger initialization.

use std::io::Write;

use crate::config::LogFormat;
use crate::error_handling::InitializationError;
use colored::*;
use log::LevelFilter;

/// Initializes the logger with the specified level and format.
///
/// `RUST_LOG` is read first; `level` then overrides it for this crate and as
/// the global default. HTTP client internals are capped at `info` so a
/// `--log-level debug` run stays readable during provisioning.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already set.
///
/// # Examples
///
/// ```bash
/// # Use RUST_LOG for quick debugging
/// RUST_LOG=debug ip_location lookup 8.8.8.8
///
/// # Structured output for log shippers
/// ip_location --log-format json batch ips.csv
/// ```
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    colored::control::set_override(true);

    let mut builder = env_logger::Builder::from_default_env();

    builder.filter_level(level);
    builder.filter_module("reqwest", LevelFilter::Info);
    builder.filter_module("hyper", LevelFilter::Info);
    builder.filter_module("hyper_util", LevelFilter::Info);
    builder.filter_module("ip_location", level);

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{}",
                    json_line(
                        chrono::Utc::now().timestamp_millis(),
                        record.level(),
                        record.target(),
                        &record.args().to_string()
                    )
                )
            });
        }
        LogFormat::Plain => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{} [{}] {}",
                    record.target().cyan(),
                    colored_level(record.level()),
                    record.args()
                )
            });
        }
    }

    // try_init so repeated initialization (tests) returns an error instead of panicking
    builder.try_init().map_err(InitializationError::from)?;

    Ok(())
}

fn colored_level(level: log::Level) -> ColoredString {
    let text = level.to_string();
    match level {
        log::Level::Error => text.red(),
        log::Level::Warn => text.yellow(),
        log::Level::Info => text.green(),
        log::Level::Debug => text.blue(),
        log::Level::Trace => text.purple(),
    }
}

/// One JSON log line: `{"ts":..,"level":..,"target":..,"msg":..}`.
fn json_line(ts_millis: i64, level: log::Level, target: &str, msg: &str) -> String {
    format!(
        "{{\"ts\":{},\"level\":\"{}\",\"target\":{},\"msg\":{}}}",
        ts_millis,
        level,
        serde_json::to_string(target).unwrap_or_else(|_| "\"\"".into()),
        serde_json::to_string(msg).unwrap_or_else(|_| "\"\"".into())
    )
}
