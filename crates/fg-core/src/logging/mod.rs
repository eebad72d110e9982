pub mod config;
pub mod file_writer;
pub mod formatter;

pub use config::{LoggingConfig, LOG_FILE_ENV};
pub use formatter::LogFormat;

use anyhow::Result;
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Initialize logging system with the given configuration.
///
/// The console layer writes to stderr; stdout is reserved for artifacts.
pub fn init(config: LoggingConfig) -> Result<()> {
    let env_filter = config.filter();

    let mut layers: Vec<BoxedLayer> = Vec::new();

    if config.console {
        let console = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false);
        layers.push(match config.format {
            LogFormat::Text => console.with_ansi(true).boxed(),
            LogFormat::Json => console.json().with_ansi(false).boxed(),
        });
    }

    if let Some(log_file) = &config.file {
        let file = fmt::layer()
            .with_writer(file_writer::FileWriter::new(log_file.clone()))
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_timer(fmt::time::ChronoUtc::rfc_3339());
        layers.push(match config.format {
            LogFormat::Text => file.boxed(),
            LogFormat::Json => file.json().boxed(),
        });
    }

    Registry::default()
        .with(layers)
        .with(env_filter)
        .try_init()?;

    Ok(())
}

/// Initialize logging from CLI arguments, falling back to `RUST_LOG` and `FG_LOG_FILE`
pub fn init_from_args(
    log_level: Option<String>,
    log_file: Option<PathBuf>,
    verbose: bool,
    format: LogFormat,
) -> Result<()> {
    init(LoggingConfig::from_args(log_level, log_file, verbose, format))
}
