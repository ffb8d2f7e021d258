//! CLI argument definitions using clap
//!
//! Commands:
//! - search-filter serve --config <path>
//! - search-filter render --config <path> [--at <RFC3339>]
//! - search-filter check-config --config <path>
//!
//! `--config` falls back to `CONFIG_FILE`.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Saved search filters with date and identity placeholders
#[derive(Parser, Debug)]
#[command(name = "search-filter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API
    Serve {
        /// Path to configuration file
        #[arg(long, env = "CONFIG_FILE")]
        config: Option<PathBuf>,
    },

    /// Render one query document read from stdin
    Render {
        /// Path to configuration file
        #[arg(long, env = "CONFIG_FILE")]
        config: Option<PathBuf>,

        /// Evaluation instant (default: now)
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },

    /// Validate the configuration and print the resolved values
    CheckConfig {
        /// Path to configuration file
        #[arg(long, env = "CONFIG_FILE")]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_render_at() {
        let cli = Cli::try_parse_from([
            "search-filter",
            "render",
            "--config",
            "sf.yaml",
            "--at",
            "2024-03-10T12:00:00Z",
        ])
        .unwrap();

        match cli.command {
            Command::Render { config, at } => {
                assert_eq!(config, Some(PathBuf::from("sf.yaml")));
                assert_eq!(at, Some(Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()));
            }
            other => panic!("expected render, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_instant_rejected() {
        let result = Cli::try_parse_from(["search-filter", "render", "--at", "yesterday"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_check_config_subcommand_name() {
        let cli =
            Cli::try_parse_from(["search-filter", "check-config", "--config", "a.yaml"]).unwrap();
        assert!(matches!(cli.command, Command::CheckConfig { .. }));
    }
}
