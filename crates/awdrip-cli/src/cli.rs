//! CLI argument definitions for the AWDRIP translator.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "awdrip",
    version,
    about = "Translate delimited source files into AWDRIP XML documents",
    long_about = "Translate delimited source files into AWDRIP XML documents.\n\n\
                  Each accepted row becomes one document, staged under a dated folder \
                  and then published to the output directory. Processed source files \
                  are moved to a dated archive folder."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Settings file (default: $AWDRIP_CONFIG, awdrip.<$AWDRIP_ENV>.toml, awdrip.toml).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to this file instead of the configured log directory or stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a single batch and print a summary.
    Run,

    /// Run a batch now and then every `interval_minutes`.
    Watch(WatchArgs),

    /// Validate the configuration documents and list what they define.
    Check,
}

#[derive(Parser)]
pub struct WatchArgs {
    /// Stop after this many batches.
    #[arg(long = "max-runs", value_name = "N")]
    pub max_runs: Option<u32>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from([
            "awdrip",
            "watch",
            "--max-runs",
            "2",
            "--config",
            "conf/awdrip.toml",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("conf/awdrip.toml")));
        assert!(matches!(cli.log_format, LogFormatArg::Json));
        match cli.command {
            Command::Watch(args) => assert_eq!(args.max_runs, Some(2)),
            _ => panic!("expected watch"),
        }
    }
}
