//! # Configuration Errors

use std::path::PathBuf;

use thiserror::Error;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors. All are fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Neither `--config` nor `CONFIG_FILE` was given
    #[error("config file is required (pass --config or set CONFIG_FILE)")]
    MissingPath,

    #[error("cannot read {}: {message}", .path.display())]
    Read { path: PathBuf, message: String },

    #[error("cannot parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    /// Every problem found, one per entry
    #[error("missing/invalid keys:\n  - {}", .0.join("\n  - "))]
    Invalid(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_lists_every_problem() {
        let err = ConfigError::Invalid(vec!["timezone".into(), "port".into()]);
        assert_eq!(err.to_string(), "missing/invalid keys:\n  - timezone\n  - port");
    }
}
