//! # Service Configuration
//!
//! Loaded once at startup from a YAML file:
//!
//! ```yaml
//! timezone: Europe/Moscow        # required, IANA name
//! current_user_id: 42            # optional, default 42
//! data_file: /var/lib/search-filter/filters.json   # optional; in-memory when absent
//! render_timeout_ms: 1000        # optional
//! http:
//!   host: 0.0.0.0
//!   port: 8080
//!   cors_origins: []
//! ```
//!
//! `SEARCH_FILTER_TIMEZONE` overrides `timezone`. Unknown keys are rejected.

mod errors;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::http_server::HttpServerConfig;

pub use errors::{ConfigError, ConfigResult};

/// Environment variable overriding `timezone`
pub const TIMEZONE_ENV: &str = "SEARCH_FILTER_TIMEZONE";

/// Service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// IANA time zone calendar dates are rendered in
    #[serde(default)]
    pub timezone: String,

    /// Identity renders run on behalf of until real auth lands
    #[serde(default = "default_current_user_id")]
    pub current_user_id: i64,

    /// JSON file filters persist to; in-memory when absent
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    /// Budget for a single render
    #[serde(default = "default_render_timeout_ms")]
    pub render_timeout_ms: u64,

    /// HTTP listener
    #[serde(default)]
    pub http: HttpServerConfig,
}

fn default_current_user_id() -> i64 {
    42
}

fn default_render_timeout_ms() -> u64 {
    1000
}

impl Config {
    /// Load, apply environment overrides and validate
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut config = Self::from_yaml(&content).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })?;

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Require a non-empty config path. The CLI fills it from `--config` or
    /// `CONFIG_FILE`.
    pub fn locate(path: Option<PathBuf>) -> ConfigResult<PathBuf> {
        path.filter(|p| !p.as_os_str().is_empty())
            .ok_or(ConfigError::MissingPath)
    }

    fn from_yaml(content: &str) -> Result<Self, String> {
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }

    /// Apply environment overrides through `lookup`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(tz) = lookup(TIMEZONE_ENV).filter(|v| !v.trim().is_empty()) {
            self.timezone = tz;
        }
    }

    /// Check every key, reporting all problems at once
    pub fn validate(&self) -> ConfigResult<()> {
        let mut problems = Vec::new();

        if self.timezone.trim().is_empty() {
            problems.push("timezone".to_string());
        } else if let Err(e) = self.time_zone() {
            problems.push(format!("timezone: {}", e));
        }

        if self.current_user_id <= 0 {
            problems.push(format!(
                "current_user_id: must be > 0, got {}",
                self.current_user_id
            ));
        }

        if self.render_timeout_ms == 0 {
            problems.push("render_timeout_ms: must be > 0".to_string());
        }

        if self.http.host.trim().is_empty() {
            problems.push("http.host".to_string());
        } else if let Err(e) = self.http.socket_addr() {
            problems.push(format!("http.host: {}", e));
        }

        if self.http.port == 0 {
            problems.push("http.port: must be > 0".to_string());
        }

        if let Some(path) = &self.data_file {
            if path.as_os_str().is_empty() {
                problems.push("data_file: must not be empty".to_string());
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(problems))
        }
    }

    /// The configured zone, parsed
    pub fn time_zone(&self) -> Result<Tz, String> {
        self.timezone
            .trim()
            .parse::<Tz>()
            .map_err(|e| format!("invalid timezone '{}': {}", self.timezone, e))
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_millis(self.render_timeout_ms)
    }
}
