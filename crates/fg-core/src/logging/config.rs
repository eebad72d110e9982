use crate::logging::formatter::LogFormat;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Environment variable naming a log file when `--log-file` is absent
pub const LOG_FILE_ENV: &str = "FG_LOG_FILE";

/// Where and how log records are written
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    pub file: Option<PathBuf>,
    /// Write to stderr; stdout is reserved for artifacts
    pub console: bool,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: std::env::var(LOG_FILE_ENV).ok().map(PathBuf::from),
            console: true,
            format: LogFormat::Text,
        }
    }
}

impl LoggingConfig {
    /// Command-line settings; `verbose` wins over an explicit level
    pub fn from_args(
        log_level: Option<String>,
        log_file: Option<PathBuf>,
        verbose: bool,
        format: LogFormat,
    ) -> Self {
        let defaults = Self::default();
        let level = if verbose {
            "debug".to_string()
        } else {
            log_level.unwrap_or(defaults.level)
        };
        Self {
            level,
            file: log_file.or(defaults.file),
            console: true,
            format,
        }
    }

    /// `RUST_LOG` when set and valid, the configured level otherwise
    pub fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }
}
