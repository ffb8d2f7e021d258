//! CLI command implementations
//!
//! Every command loads and validates the configuration first; nothing starts
//! on a bad config.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::config::Config;
use crate::filters::{FileFilterRepository, FilterRepository, FilterService, InMemoryFilterRepository};
use crate::http_server::HttpServer;
use crate::observability;

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_query, write_json};

/// Main entry point for CLI
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config } => serve(config),
        Command::Render { config, at } => render(config, at),
        Command::CheckConfig { config } => check_config(config),
    }
}

fn load_config(explicit: Option<PathBuf>) -> CliResult<Config> {
    let path = Config::locate(explicit)?;
    Ok(Config::load(&path)?)
}

/// Open the configured store: the data file when set, memory otherwise
pub fn open_repository(config: &Config) -> CliResult<Arc<dyn FilterRepository>> {
    match &config.data_file {
        Some(path) => {
            let repo = FileFilterRepository::open(path.clone())
                .map_err(|e| CliError::boot_failed(format!("cannot open store: {}", e)))?;
            Ok(Arc::new(repo))
        }
        None => {
            tracing::warn!("no data_file configured, filters will not survive a restart");
            Ok(Arc::new(InMemoryFilterRepository::new()))
        }
    }
}

/// Build the filter service described by `config`
pub fn build_service(config: &Config, repo: Arc<dyn FilterRepository>) -> CliResult<FilterService> {
    let time_zone = config.time_zone().map_err(CliError::config_error)?;
    let service = FilterService::new(repo, time_zone, config.current_user_id)?
        .with_render_timeout(config.render_timeout());
    Ok(service)
}

/// Start the HTTP API and block until shutdown
pub fn serve(config_path: Option<PathBuf>) -> CliResult<()> {
    observability::init_logging();

    let config = load_config(config_path)?;
    let repo = open_repository(&config)?;
    let service = Arc::new(build_service(&config, repo)?);

    tracing::info!(
        timezone = %config.timezone,
        current_user_id = config.current_user_id,
        host = %config.http.host,
        port = config.http.port,
        "starting search-filter"
    );

    let server = HttpServer::with_config(config.http.clone(), service);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Render one query from stdin and print the result
pub fn render(config_path: Option<PathBuf>, at: Option<DateTime<Utc>>) -> CliResult<()> {
    observability::init_logging();

    let config = load_config(config_path)?;
    let service = build_service(&config, Arc::new(InMemoryFilterRepository::new()))?;

    let query = read_query()?;
    let rendered = service.preview(query, at.unwrap_or_else(Utc::now), None)?;
    write_json(&rendered)
}

/// Validate the configuration and print it with defaults filled in
pub fn check_config(config_path: Option<PathBuf>) -> CliResult<()> {
    let config = load_config(config_path)?;
    let resolved = json!({
        "timezone": config.timezone,
        "current_user_id": config.current_user_id,
        "data_file": config.data_file,
        "render_timeout_ms": config.render_timeout_ms,
        "http": config.http,
    });
    write_json(&resolved)
}
