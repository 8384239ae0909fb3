//! Runtime configuration read from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `HEARTCARE_MODEL_PATH` | `models/heart_model.json` (relative to the working directory) |
//! | `HEARTCARE_LOG_MODE` | `auto` (`file` when stdout is a terminal, else `stdout`) |
//! | `HEARTCARE_LOG_FILE` | `heartcare.log` |
//! | `HEARTCARE_ENVIRONMENT` | `Production v2.0` |
//!
//! The model artifact is a JSON export of the logistic regression. It
//! replaces the `models/heart_model.skops` file written by the Python
//! training pipeline, which has no Rust loader; retrain exports must be
//! converted to the JSON format described in `adapters::logistic`.

use std::path::{Path, PathBuf};

/// Conventional location of the model artifact.
pub const DEFAULT_MODEL_PATH: &str = "models/heart_model.json";

const DEFAULT_LOG_FILE: &str = "heartcare.log";
const DEFAULT_ENVIRONMENT: &str = "Production v2.0";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// File when attached to a terminal, stdout otherwise
    Auto,
    File,
    Stdout,
}

impl LogMode {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Self::File,
            "stdout" => Self::Stdout,
            _ => Self::Auto,
        }
    }

    /// Whether to log to a file given terminal interactivity.
    #[must_use]
    pub fn use_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub model_path: PathBuf,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
    /// Label shown in the status panel
    pub environment: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl AppConfig {
    /// Read configuration from process environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            model_path: non_empty("HEARTCARE_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH)),
            log_mode: non_empty("HEARTCARE_LOG_MODE")
                .map(|v| LogMode::parse(&v))
                .unwrap_or(LogMode::Auto),
            log_file: non_empty("HEARTCARE_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
            environment: non_empty("HEARTCARE_ENVIRONMENT")
                .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()),
        }
    }

    /// Model path resolved against the current working directory.
    #[must_use]
    pub fn resolved_model_path(&self) -> PathBuf {
        resolve_against_cwd(&self.model_path)
    }
}

fn resolve_against_cwd(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(e) => {
            tracing::warn!("Cannot resolve working directory ({}); using {:?}", e, path);
            path.to_path_buf()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.model_path, PathBuf::from(DEFAULT_MODEL_PATH));
        assert_eq!(config.log_mode, LogMode::Auto);
        assert_eq!(config.log_file, PathBuf::from("heartcare.log"));
        assert_eq!(config.environment, "Production v2.0");
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("HEARTCARE_MODEL_PATH", "/opt/models/heart.json"),
            ("HEARTCARE_LOG_MODE", "STDOUT"),
            ("HEARTCARE_ENVIRONMENT", "Staging"),
        ]);
        assert_eq!(config.model_path, PathBuf::from("/opt/models/heart.json"));
        assert_eq!(config.log_mode, LogMode::Stdout);
        assert_eq!(config.environment, "Staging");
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = config_from(&[("HEARTCARE_MODEL_PATH", "  ")]);
        assert_eq!(config.model_path, PathBuf::from(DEFAULT_MODEL_PATH));
    }

    #[test]
    fn test_log_mode_selection() {
        assert!(LogMode::Auto.use_file(true));
        assert!(!LogMode::Auto.use_file(false));
        assert!(LogMode::File.use_file(false));
        assert!(!LogMode::Stdout.use_file(true));
        assert_eq!(LogMode::parse("bogus"), LogMode::Auto);
    }

    #[test]
    fn test_relative_model_path_resolves_against_cwd() {
        let config = config_from(&[]);
        let resolved = config.resolved_model_path();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with(DEFAULT_MODEL_PATH));
    }
}
