//! Tests for CLI subcommand parsing.

use clap::Parser;
use ip_location::config::{Cli, Command, DEFAULT_PUREIP_URL};
use ip_location::{LogFormat, LogLevel};
use std::path::PathBuf;

#[test]
fn test_lookup_defaults() {
    let cli = Cli::try_parse_from(["ip_location", "lookup", "114.114.114.114"]).unwrap();
    assert_eq!(cli.data_dir, PathBuf::from("./data"));
    assert!(matches!(cli.log_level, LogLevel::Info));
    assert!(matches!(cli.log_format, LogFormat::Plain));
    match cli.command {
        Command::Lookup { address, json } => {
            assert_eq!(address, "114.114.114.114");
            assert!(!json);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "ip_location",
        "lookup",
        "::1",
        "--json",
        "--data-dir",
        "/srv/geo",
        "--log-level",
        "debug",
        "--log-format",
        "json",
    ])
    .unwrap();
    assert_eq!(cli.data_dir, PathBuf::from("/srv/geo"));
    assert!(matches!(cli.log_level, LogLevel::Debug));
    assert!(matches!(cli.log_format, LogFormat::Json));
    assert!(matches!(cli.command, Command::Lookup { json: true, .. }));
}

#[test]
fn test_batch_without_output() {
    let cli = Cli::try_parse_from(["ip_location", "batch", "ips.xlsx"]).unwrap();
    match cli.command {
        Command::Batch { input, output } => {
            assert_eq!(input, PathBuf::from("ips.xlsx"));
            assert!(output.is_none());
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_batch_requires_input() {
    assert!(Cli::try_parse_from(["ip_location", "batch"]).is_err());
}

#[test]
fn test_provision_defaults() {
    let cli = Cli::try_parse_from(["ip_location", "provision"]).unwrap();
    match &cli.command {
        Command::Provision {
            force,
            license_key,
            proxy,
            pureip_url,
        } => {
            assert!(!force);
            assert!(license_key.is_none());
            assert!(proxy.is_none());
            assert_eq!(pureip_url, DEFAULT_PUREIP_URL);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_provision_overrides_reach_config() {
    let cli = Cli::try_parse_from([
        "ip_location",
        "provision",
        "--license-key",
        "k3y",
        "--proxy",
        "http://127.0.0.1:7890",
        "--pureip-url",
        "https://mirror.example/qqwry.ipdb",
    ])
    .unwrap();
    let config = cli.to_config();
    assert_eq!(config.license_key.as_deref(), Some("k3y"));
    assert_eq!(config.proxy.as_deref(), Some("http://127.0.0.1:7890"));
    assert_eq!(config.pureip_url, "https://mirror.example/qqwry.ipdb");
}

#[test]
fn test_unknown_subcommand_rejected() {
    assert!(Cli::try_parse_from(["ip_location", "scan", "urls.txt"]).is_err());
}

#[test]
fn test_invalid_log_level_rejected() {
    assert!(Cli::try_parse_from(["ip_location", "--log-level", "loud", "lookup", "1.1.1.1"]).is_err());
}
