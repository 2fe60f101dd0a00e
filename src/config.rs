//! Runtime configuration from environment variables.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `HEARTCHECK_MODEL_DIR` | `model` | directory holding the three artifacts |
//! | `HEARTCHECK_STRICT_SCHEMA` | off | encoder disagreements are fatal |
//! | `HEARTCHECK_LOG_MODE` | `auto` | `file`, `stdout` or `auto` |
//! | `HEARTCHECK_LOG_FILE` | `heartcheck.log` | log path in file mode |
//! | `HEARTCHECK_SANITIZE_MAX_BYTES` | `16384` | bytes of each log line scanned for redaction |

use std::path::PathBuf;

use crate::adapters::sanitize::DEFAULT_SANITIZE_MAX_BYTES;
use crate::adapters::LoadOptions;

const MODEL_DIR_ENV: &str = "HEARTCHECK_MODEL_DIR";
const STRICT_SCHEMA_ENV: &str = "HEARTCHECK_STRICT_SCHEMA";
const LOG_MODE_ENV: &str = "HEARTCHECK_LOG_MODE";
const LOG_FILE_ENV: &str = "HEARTCHECK_LOG_FILE";
const SANITIZE_MAX_BYTES_ENV: &str = "HEARTCHECK_SANITIZE_MAX_BYTES";

const DEFAULT_MODEL_DIR: &str = "model";
const DEFAULT_LOG_FILE: &str = "heartcheck.log";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// File when stdout is a terminal (the TUI owns it), stdout otherwise
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

    /// Whether to log to a file, given whether stdout is interactive.
    #[must_use]
    pub fn use_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub model_dir: PathBuf,
    pub strict_schema: bool,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
    pub sanitize_max_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            strict_schema: false,
            log_mode: LogMode::Auto,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            sanitize_max_bytes: DEFAULT_SANITIZE_MAX_BYTES,
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            model_dir: lookup(MODEL_DIR_ENV)
                .filter(|v| !v.trim().is_empty())
                .map_or(defaults.model_dir, PathBuf::from),
            strict_schema: lookup(STRICT_SCHEMA_ENV)
                .map(|v| parse_bool(&v))
                .unwrap_or(defaults.strict_schema),
            log_mode: lookup(LOG_MODE_ENV).map_or(defaults.log_mode, |v| LogMode::parse(&v)),
            log_file: lookup(LOG_FILE_ENV)
                .filter(|v| !v.trim().is_empty())
                .map_or(defaults.log_file, PathBuf::from),
            sanitize_max_bytes: lookup(SANITIZE_MAX_BYTES_ENV)
                .and_then(|v| v.trim().parse::<usize>().ok())
                .filter(|&v| v > 0)
                .unwrap_or(defaults.sanitize_max_bytes),
        }
    }

    /// Artifact loading options derived from this configuration.
    #[must_use]
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            strict_schema: self.strict_schema,
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "TRUE" | "yes" | "YES")
}
