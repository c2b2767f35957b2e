//! Subscriber setup via tracing-subscriber.
//!
//! Call [`Logger::init`] once at startup, after config is loaded, and keep
//! the returned handle alive until shutdown: it owns the file writer's
//! background worker, and dropping it flushes pending lines.

use std::path::Path;

use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::bootstrap::BootstrapError;
use crate::config::LoggingConfig;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Line encoding for the console sink. The file sink is always JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Console,
}

impl LogFormat {
    /// `"json"` (any case) selects JSON; anything else is human-readable.
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Console
        }
    }
}

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Stdout,
    File,
    Both,
}

impl LogOutput {
    /// Unknown values fall back to stdout.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => LogOutput::File,
            "both" => LogOutput::Both,
            _ => LogOutput::Stdout,
        }
    }

    fn console(&self) -> bool {
        matches!(self, LogOutput::Stdout | LogOutput::Both)
    }

    fn file(&self) -> bool {
        matches!(self, LogOutput::File | LogOutput::Both)
    }
}

/// Parse a log level string into a [`LevelFilter`].
///
/// Accepts `debug`, `info`, `warn`/`warning`, `error`, plus `fatal` and
/// `panic`, which tracing has no equivalent for and are treated as `error`.
/// `trace` is accepted too.
pub fn parse_level(level: &str) -> Result<LevelFilter, BootstrapError> {
    let normalized = level.trim().to_ascii_lowercase();
    let filter = match normalized.as_str() {
        "" => return Err(BootstrapError::Logger("log level must not be empty".into())),
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" | "warning" => LevelFilter::WARN,
        "error" | "fatal" | "panic" => LevelFilter::ERROR,
        _ => {
            return Err(BootstrapError::Logger(format!(
                "unrecognised log level: '{level}'"
            )))
        }
    };
    Ok(filter)
}

/// Configured level as the default directive; `RUST_LOG` directives refine
/// it per target.
fn make_filter(level: LevelFilter) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy()
}

fn console_layer(format: LogFormat, level: LevelFilter) -> BoxedLayer {
    match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stdout)
            .with_filter(make_filter(level))
            .boxed(),
        LogFormat::Console => fmt::layer()
            .with_writer(std::io::stdout)
            .with_filter(make_filter(level))
            .boxed(),
    }
}

/// Daily-rotated JSON file sink keeping `max_backups` old files.
fn file_layer(
    cfg: &LoggingConfig,
    level: LevelFilter,
) -> Result<(BoxedLayer, WorkerGuard), BootstrapError> {
    let path = cfg.file_path();
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| BootstrapError::Logger(format!("invalid log file path '{}'", cfg.file)))?;

    std::fs::create_dir_all(dir)?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(file_name)
        .max_log_files(cfg.max_backups + 1)
        .build(dir)
        .map_err(|e| {
            BootstrapError::Logger(format!("failed to open log file '{}': {e}", path.display()))
        })?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = fmt::layer()
        .json()
        .with_ansi(false)
        .with_writer(writer)
        .with_filter(make_filter(level))
        .boxed();
    Ok((layer, guard))
}

/// Build the sink layers for `cfg` without installing them.
pub(crate) fn build_layers(
    cfg: &LoggingConfig,
) -> Result<(Vec<BoxedLayer>, Option<WorkerGuard>), BootstrapError> {
    let level = parse_level(&cfg.level)?;
    let output = LogOutput::parse(&cfg.output);

    let mut layers = Vec::new();
    let mut guard = None;

    if output.console() {
        layers.push(console_layer(LogFormat::parse(&cfg.format), level));
    }
    if output.file() {
        let (layer, file_guard) = file_layer(cfg, level)?;
        layers.push(layer);
        guard = Some(file_guard);
    }

    Ok((layers, guard))
}

/// Handle to the process-wide logger.
pub struct Logger {
    config: LoggingConfig,
    level: LevelFilter,
    output: LogOutput,
    _file_guard: Option<WorkerGuard>,
}

impl Logger {
    /// Install the global subscriber. Only the first call in a process
    /// succeeds; later calls return [`BootstrapError::Logger`].
    pub fn init(cfg: &LoggingConfig) -> Result<Logger, BootstrapError> {
        let level = parse_level(&cfg.level)?;
        let (layers, guard) = build_layers(cfg)?;

        tracing_subscriber::registry()
            .with(layers)
            .try_init()
            .map_err(|e| BootstrapError::Logger(format!("failed to set subscriber: {e}")))?;

        Ok(Logger {
            config: cfg.clone(),
            level,
            output: LogOutput::parse(&cfg.output),
            _file_guard: guard,
        })
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    pub fn output(&self) -> LogOutput {
        self.output
    }

    pub fn config(&self) -> &LoggingConfig {
        &self.config
    }

    /// Flush buffered file output and stop the writer thread.
    pub fn close(self) {
        drop(self);
    }
}
