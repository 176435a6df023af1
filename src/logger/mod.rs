//! Logging setup
//!
//! Built on `tracing-subscriber` with:
//! - Console output with color control
//! - File output in Full, Compact or JSON format
//! - A log level that can be changed while the process runs

pub mod config;
pub mod error;
pub(crate) mod writer;

pub use config::*;
pub use error::LoggerError;

use std::io::IsTerminal;

use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt,
    layer::{Layered, SubscriberExt},
    reload,
    util::SubscriberInitExt,
};
use writer::LogFileWriter;

type FilteredRegistry = Layered<reload::Layer<EnvFilter, Registry>, Registry>;
type BoxedLayer = Box<dyn Layer<FilteredRegistry> + Send + Sync>;

/// Handle for changing the active log level after initialization
#[derive(Clone)]
pub struct LogLevelHandle {
    inner: reload::Handle<EnvFilter, Registry>,
}

impl LogLevelHandle {
    /// Replace the active filter, e.g. `set_level("debug")`
    pub fn set_level(&self, level: &str) -> Result<(), LoggerError> {
        parse_level(level).map_err(|e| LoggerError::filter(level, e.to_string()))?;
        let filter = EnvFilter::try_new(level)
            .map_err(|e| LoggerError::filter(level, e.to_string()))?;
        self.inner
            .reload(filter)
            .map_err(|e| LoggerError::reload(e.to_string()))
    }
}

/// Install the global subscriber described by `config`
pub fn init_logger(config: LoggerConfig) -> anyhow::Result<LogLevelHandle> {
    let (filter, handle, layers) = build_layers(&config)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(layers)
        .try_init()?;

    Ok(LogLevelHandle { inner: handle })
}

/// Builds the reloadable filter plus one output layer per enabled sink
fn build_layers(
    config: &LoggerConfig,
) -> anyhow::Result<(
    reload::Layer<EnvFilter, Registry>,
    reload::Handle<EnvFilter, Registry>,
    Vec<BoxedLayer>,
)> {
    config.validate()?;

    let (filter, handle) = reload::Layer::new(EnvFilter::try_new(&config.level)?);

    // File layer goes first so the console layer's ANSI setting
    // does not leak escape codes into span fields written to the file.
    let mut layers: Vec<BoxedLayer> = Vec::new();

    if config.file.enabled {
        let writer = LogFileWriter::new(&config.file)?;
        let layer = match config.file.format {
            LogFormat::Full => fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(writer)
                .boxed(),
            LogFormat::Compact => fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .compact()
                .with_writer(writer)
                .boxed(),
            LogFormat::Json => fmt::layer()
                .with_ansi(false)
                .json()
                .with_writer(writer)
                .boxed(),
        };
        layers.push(layer);
    }

    if config.console.enabled {
        let use_ansi = config.console.colored && std::io::stdout().is_terminal();
        layers.push(
            fmt::layer()
                .with_ansi(use_ansi)
                .with_target(true)
                .with_level(true)
                .boxed(),
        );
    }

    Ok((filter, handle, layers))
}
