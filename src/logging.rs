//! Structured logging setup.
//!
//! Logs go to stderr by default so the run report on stdout stays clean.
//! `RUST_LOG` takes precedence over the built-in filter.

use std::env;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use strum::{Display, EnumString};
use tracing::Subscriber;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    Json,
    /// Multi-line, with source locations.
    Pretty,
    #[default]
    Compact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogOutput {
    Stdout,
    #[default]
    Stderr,
    /// `<dir>/<prefix>`, optionally rolled daily.
    File,
}

/// Where and how scaffolding runs are logged.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub output: LogOutput,
    pub directory: PathBuf,
    pub file_prefix: String,
    pub daily_rotation: bool,
    /// Directive used when `RUST_LOG` is unset.
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            output: LogOutput::default(),
            directory: PathBuf::from("logs"),
            file_prefix: env!("CARGO_PKG_NAME").to_string(),
            daily_rotation: true,
            default_filter: filter_for("warn"),
        }
    }
}

fn filter_for(level: &str) -> String {
    format!("lemoe_crud={}", level.to_ascii_lowercase())
}

impl LoggingConfig {
    /// Reads `LOG_FORMAT`, `LOG_OUTPUT`, `LOG_DIR` and `LOG_LEVEL`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Unknown format or output names keep the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            format: parsed_or(lookup("LOG_FORMAT"), defaults.format),
            output: parsed_or(lookup("LOG_OUTPUT"), defaults.output),
            directory: lookup("LOG_DIR").map_or(defaults.directory, PathBuf::from),
            default_filter: lookup("LOG_LEVEL")
                .map_or(defaults.default_filter, |level| filter_for(&level)),
            ..defaults
        }
    }

    fn writer(&self) -> Result<(NonBlocking, WorkerGuard)> {
        Ok(match self.output {
            LogOutput::Stdout => tracing_appender::non_blocking(io::stdout()),
            LogOutput::Stderr => tracing_appender::non_blocking(io::stderr()),
            LogOutput::File => {
                std::fs::create_dir_all(&self.directory).with_context(|| {
                    format!("cannot create log directory {:?}", self.directory)
                })?;
                let appender = if self.daily_rotation {
                    tracing_appender::rolling::daily(&self.directory, &self.file_prefix)
                } else {
                    tracing_appender::rolling::never(&self.directory, &self.file_prefix)
                };
                tracing_appender::non_blocking(appender)
            }
        })
    }
}

fn parsed_or<T: FromStr>(value: Option<String>, fallback: T) -> T {
    value
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(fallback)
}

fn fmt_layer<S>(config: &LoggingConfig, writer: NonBlocking) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'span> LookupSpan<'span> + 'static,
{
    let ansi = config.output != LogOutput::File;
    match config.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_writer(writer)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_file(true)
            .with_line_number(true)
            .with_ansi(ansi)
            .with_writer(writer)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer)
            .boxed(),
    }
}

/// Installs the global subscriber. Keep the returned guard alive until exit
/// or buffered lines are lost.
pub fn init_logging(config: LoggingConfig) -> Result<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.default_filter))
        .with_context(|| format!("invalid log filter {:?}", config.default_filter))?;
    let (writer, guard) = config.writer()?;

    tracing_subscriber::registry()
        .with(fmt_layer(&config, writer).with_filter(filter))
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        format = %config.format,
        output = %config.output,
        "logging ready"
    );
    Ok(guard)
}

/// Logs a finished operation at `warn` when it took longer than
/// `$threshold_ms`, at `debug` otherwise.
#[macro_export]
macro_rules! log_slow_operation {
    ($elapsed:expr, $threshold_ms:expr, $($fields:tt)+) => {{
        let elapsed_ms = $elapsed.as_millis() as u64;
        if elapsed_ms > $threshold_ms {
            tracing::warn!(elapsed_ms, threshold_ms = $threshold_ms, slow = true, $($fields)+);
        } else {
            tracing::debug!(elapsed_ms, $($fields)+);
        }
    }};
}

/// Span wrapping one generate or remove run.
pub fn run_span(operation: &str, target: &str, model: &str) -> tracing::Span {
    tracing::info_span!("run", operation, target, model)
}
