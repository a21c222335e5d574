//! AWDRIP translator CLI.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context, Result};
use awdrip_catalog::{Settings, SettingsLocator};
use awdrip_cli::logging::{LogConfig, LogFormat, init_logging, resolve_log_file};
use clap::{ColorChoice, Parser};
use tracing::error;
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_check, run_once, run_watch};
use crate::summary::print_summary;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let settings = load_settings(cli.config.clone());
    let log_dir = settings
        .as_ref()
        .ok()
        .and_then(|(_, settings)| settings.log_dir.clone());
    let log_config = log_config_from_cli(&cli, log_dir);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let (settings_path, settings) = match settings {
        Ok(loaded) => loaded,
        Err(error) => {
            error!(error = format!("{error:#}"), "startup failed");
            eprintln!("error: {error:#}");
            std::process::exit(1);
        }
    };
    let exit_code = match cli.command {
        Command::Run => match run_once(&settings) {
            Ok(report) => {
                print_summary(&report);
                0
            }
            Err(error) => {
                error!(error = format!("{error:#}"), "batch failed");
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Watch(args) => match run_watch(&settings, args.max_runs) {
            Ok(()) => 0,
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Check => match run_check(&settings_path, &settings) {
            Ok(()) => 0,
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
    };
    std::process::exit(exit_code);
}

fn load_settings(explicit: Option<PathBuf>) -> Result<(PathBuf, Settings)> {
    let path = SettingsLocator::from_env(explicit).resolve();
    let settings = Settings::load(&path)
        .with_context(|| format!("load settings {}", path.display()))?;
    Ok((path, settings))
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli, log_dir: Option<PathBuf>) -> LogConfig {
    let level_filter = match cli.log_level {
        Some(LogLevelArg::Error) => LevelFilter::ERROR,
        Some(LogLevelArg::Warn) => LevelFilter::WARN,
        Some(LogLevelArg::Info) => LevelFilter::INFO,
        Some(LogLevelArg::Debug) => LevelFilter::DEBUG,
        Some(LogLevelArg::Trace) => LevelFilter::TRACE,
        None => cli.verbosity.tracing_level_filter(),
    };
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let log_file = resolve_log_file(cli.log_file.as_deref(), log_dir.as_deref());
    let with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => log_file.is_none() && io::stderr().is_terminal(),
    };
    let mut config = LogConfig::default()
        .with_level(level_filter)
        .with_format(format)
        .with_ansi(with_ansi)
        .with_log_file(log_file);
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "awdrip",
            "--log-level",
            "debug",
            "--log-format",
            "json",
            "--color",
            "never",
            "--log-file",
            "/tmp/awdrip-test.log",
            "run",
        ])
        .unwrap();
        let config = log_config_from_cli(&cli, Some(PathBuf::from("/var/log/awdrip")));
        assert_eq!(config.level_filter, LevelFilter::DEBUG);
        assert_eq!(config.format, LogFormat::Json);
        assert!(!config.with_ansi);
        assert!(!config.use_env_filter);
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/awdrip-test.log")));
    }

    #[test]
    fn log_dir_is_used_without_flags() {
        let cli = Cli::try_parse_from(["awdrip", "run"]).unwrap();
        let config = log_config_from_cli(&cli, Some(PathBuf::from("/var/log/awdrip")));
        assert_eq!(config.level_filter, LevelFilter::INFO);
        assert!(config.use_env_filter);
        assert!(!config.with_ansi);
        assert_eq!(
            config.log_file,
            Some(PathBuf::from("/var/log/awdrip/awdrip.log"))
        );
    }
}
