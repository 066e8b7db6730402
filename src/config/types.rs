//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument
//! parsing. The library itself takes explicit parameters; these types only
//! serve the `sitesentry` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Logging level for the application.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Command-line interface for the monitoring engine.
#[derive(Debug, Parser)]
#[command(name = "sitesentry", version, about)]
pub struct Cli {
    /// SQLite database path
    #[arg(long, default_value = super::DB_PATH, global = true)]
    pub db: PathBuf,

    /// Log level
    #[arg(long, value_enum, default_value = "info", global = true)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain", global = true)]
    pub log_format: LogFormat,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// The operations exposed by the binary.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a full check against a URL (registering it as an ad-hoc site)
    Check {
        /// Target URL
        url: String,
        /// Comma-separated keywords to scan for
        #[arg(long, value_delimiter = ',')]
        keywords: Vec<String>,
        /// Skip the TLS certificate inspection step
        #[arg(long)]
        no_ssl: bool,
        /// Skip performance and hotspot analysis
        #[arg(long)]
        no_performance: bool,
        /// Owner user id attached to emitted log entries
        #[arg(long, default_value = "cli")]
        user: String,
    },
    /// Print monitoring history for a site
    History {
        /// Site id
        site_id: String,
        /// Maximum entries to read
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Print the fleet-wide health overview
    Overview,
    /// Query activity logs for a user
    Logs {
        /// User id
        user: String,
        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Page size
        #[arg(long)]
        limit: Option<u32>,
        /// Filter by log type
        #[arg(long = "type")]
        entry_type: Option<String>,
        /// Filter by action
        #[arg(long)]
        action: Option<String>,
    },
    /// Export a user's logs as JSON or CSV
    Export {
        /// User id
        user: String,
        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: ExportFormat,
        /// Output file (stdout if omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Export output format.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ExportFormat {
    /// Pretty-printed JSON array
    Json,
    /// One row per log entry; nested fields embedded as JSON strings
    Csv,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
    }

    #[test]
    fn cli_parses_check_command() {
        let cli = Cli::parse_from([
            "sitesentry",
            "check",
            "https://example.com",
            "--keywords",
            "pricing,docs",
            "--no-ssl",
        ]);
        match cli.command {
            Command::Check {
                url,
                keywords,
                no_ssl,
                no_performance,
                ..
            } => {
                assert_eq!(url, "https://example.com");
                assert_eq!(keywords, vec!["pricing", "docs"]);
                assert!(no_ssl);
                assert!(!no_performance);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_parses_logs_command_with_defaults() {
        let cli = Cli::parse_from(["sitesentry", "logs", "user-1"]);
        match cli.command {
            Command::Logs { user, page, limit, .. } => {
                assert_eq!(user, "user-1");
                assert_eq!(page, 1);
                assert!(limit.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
