//! Access log setup.
//!
//! Provides:
//! - Append-only log file at a fixed relative path, no rotation
//! - `timestamp [LEVEL]: message` record format
//! - Stderr fallback when the log file cannot be opened
//! - Environment variable override via PGCHECK_LOG or RUST_LOG
//!
//! The subscriber is installed as the default for the calling thread only and
//! stays active for as long as the returned [`LoggingGuard`] is held.

use chrono::Local;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Subscriber};
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

/// Timestamp layout of a log record, millisecond precision.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Directory for the log file
    pub log_dir: PathBuf,
    /// File name before the extension
    pub file_prefix: String,
    /// File extension
    pub file_suffix: String,
    /// Optional custom log filter
    pub log_filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

impl LogConfig {
    /// Create a configuration writing `postgres.log` into `log_dir`.
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
            file_prefix: "postgres".to_string(),
            file_suffix: "log".to_string(),
            log_filter: None,
        }
    }

    /// Set custom log filter.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = Some(filter.into());
        self
    }

    /// Full path of the log file.
    pub fn log_path(&self) -> PathBuf {
        self.log_dir.join(format!("{}.{}", self.file_prefix, self.file_suffix))
    }
}

/// Guard that must be held for as long as records should be written.
///
/// Dropping it uninstalls the subscriber.
pub struct LoggingGuard {
    _default_guard: DefaultGuard,
}

/// Initialize logging with the given configuration.
///
/// If the log file cannot be opened, records go to stderr instead.
pub fn init_logging(config: LogConfig) -> LoggingGuard {
    let env_filter = build_env_filter(config.log_filter.as_deref());

    let default_guard = match open_log_file(&config) {
        Ok(appender) => tracing::subscriber::set_default(record_subscriber(appender, env_filter)),
        Err(e) => {
            eprintln!(
                "Warning: Failed to open log file {}: {}. Logging to stderr.",
                config.log_path().display(),
                e
            );
            tracing::subscriber::set_default(record_subscriber(std::io::stderr, env_filter))
        }
    };

    LoggingGuard { _default_guard: default_guard }
}

/// Open the log file in append mode, creating it if absent.
fn open_log_file(config: &LogConfig) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(config.file_prefix.as_str())
        .filename_suffix(config.file_suffix.as_str())
        .build(Path::new(&config.log_dir))
}

/// Build a subscriber that writes access log records to `writer`.
pub fn record_subscriber<W>(writer: W, filter: EnvFilter) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(filter)
        .with_ansi(false)
        .event_format(RecordFormat)
        .finish()
}

/// Build the environment filter from config or defaults.
fn build_env_filter(custom_filter: Option<&str>) -> EnvFilter {
    // Priority: custom filter > PGCHECK_LOG > RUST_LOG > default
    if let Some(filter) = custom_filter {
        return EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(default_log_filter()));
    }

    EnvFilter::try_from_env("PGCHECK_LOG")
        .or_else(|_| EnvFilter::try_from_env("RUST_LOG"))
        .unwrap_or_else(|_| EnvFilter::new(default_log_filter()))
}

/// Get the default log filter.
///
/// Diagnostics stay at debug, so a probe leaves exactly one record.
pub fn default_log_filter() -> &'static str {
    "info,tokio_postgres=warn"
}

/// Formats events as `timestamp [LEVEL]: message`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordFormat;

impl<S, N> FormatEvent<S, N> for RecordFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT);
        write!(writer, "{} [{}]: ", timestamp, event.metadata().level())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
