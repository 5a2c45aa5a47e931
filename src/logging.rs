//! Structured logging for `assh` commands.
//!
//! Two switches shape the logger: debug and verbose. Debug logs everything
//! with full annotations, verbose logs from INFO up, and the default logs only
//! warnings and errors with a bare `LEVEL message` layout.
//!
//! The built [`Logger`] is a plain value. Commands run inside
//! [`Logger::in_scope`], which routes `tracing` events to it for the duration
//! of the call.

use std::backtrace::Backtrace;
use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{Dispatch, Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::{self, Format, Full, Writer};
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{Layer, Registry};

use crate::error::{Error, Result};

/// Logging mode, derived from the debug and verbose switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    Debug,
    Verbose,
    Quiet,
}

impl LogMode {
    pub fn from_flags(debug: bool, verbose: bool) -> Self {
        match (debug, verbose) {
            (true, _) => LogMode::Debug,
            (false, true) => LogMode::Verbose,
            (false, false) => LogMode::Quiet,
        }
    }

    pub fn level(self) -> Level {
        match self {
            LogMode::Debug => Level::DEBUG,
            LogMode::Verbose => Level::INFO,
            LogMode::Quiet => Level::WARN,
        }
    }
}

/// Encoder key for the timestamp field.
pub const TIME_KEY: &str = "T";
/// Encoder key for the logger-name field.
pub const NAME_KEY: &str = "N";

/// Everything needed to build a [`Logger`].
///
/// An empty key omits that field from every record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: Level,
    /// Append a backtrace to WARN and ERROR records.
    pub stacktrace: bool,
    /// Annotate records with source file and line.
    pub caller: bool,
    pub time_key: &'static str,
    pub name_key: &'static str,
    /// Render level names in color.
    pub color_levels: bool,
}

impl LogConfig {
    /// Fully annotated configuration at DEBUG.
    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            stacktrace: true,
            caller: true,
            time_key: TIME_KEY,
            name_key: NAME_KEY,
            color_levels: true,
        }
    }

    pub fn for_mode(debug: bool, verbose: bool) -> Self {
        let mut config = Self::development();
        config.level = LogMode::from_flags(debug, verbose).level();
        if !debug {
            config.stacktrace = false;
            config.caller = false;
            config.time_key = "";
            config.name_key = "";
        }
        config.color_levels = true;
        config
    }

    /// Build a logger writing to `sink`.
    pub fn build(&self, sink: &LogSink) -> Result<Logger> {
        let writer = sink.open().map_err(Error::Logger)?;

        // without_time() changes the format type, hence the boxing.
        let records = if self.time_key.is_empty() {
            self.records(format::format().without_time(), writer)
        } else {
            self.records(format::format(), writer)
        };

        let subscriber = Registry::default()
            .with(records)
            .with(LevelFilter::from_level(self.level));

        Ok(Logger {
            dispatch: Dispatch::new(subscriber),
            config: self.clone(),
        })
    }

    fn records<T>(
        &self,
        format: Format<Full, T>,
        writer: BoxMakeWriter,
    ) -> Box<dyn Layer<Registry> + Send + Sync>
    where
        T: FormatTime + Send + Sync + 'static,
    {
        let format = format
            .with_ansi(self.color_levels)
            .with_target(!self.name_key.is_empty())
            .with_file(self.caller)
            .with_line_number(self.caller);
        tracing_subscriber::fmt::layer()
            .with_ansi(self.color_levels)
            .with_writer(writer)
            .event_format(Stacktrace {
                inner: format,
                enabled: self.stacktrace,
            })
            .boxed()
    }
}

/// Build the logger for the given switches.
pub fn initialize(debug: bool, verbose: bool, sink: &LogSink) -> Result<Logger> {
    LogConfig::for_mode(debug, verbose).build(sink)
}

/// A built logger.
#[derive(Debug, Clone)]
pub struct Logger {
    dispatch: Dispatch,
    config: LogConfig,
}

impl Logger {
    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Run `f` with this logger receiving every `tracing` event on the
    /// current thread.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}

/// Where log records go.
#[derive(Clone, Default)]
pub enum LogSink {
    #[default]
    Stderr,
    /// Append to a file, creating it if needed.
    File(PathBuf),
    /// A fresh writer from the factory for every record.
    Writer(Arc<dyn Fn() -> Box<dyn Write + Send> + Send + Sync>),
}

impl LogSink {
    pub fn writer<F, W>(make: F) -> Self
    where
        F: Fn() -> W + Send + Sync + 'static,
        W: Write + Send + 'static,
    {
        LogSink::Writer(Arc::new(move || Box::new(make()) as Box<dyn Write + Send>))
    }

    fn open(&self) -> io::Result<BoxMakeWriter> {
        match self {
            LogSink::Stderr => Ok(BoxMakeWriter::new(io::stderr)),
            LogSink::File(path) => {
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                Ok(BoxMakeWriter::new(file))
            }
            LogSink::Writer(make) => {
                let make = Arc::clone(make);
                Ok(BoxMakeWriter::new(move || make()))
            }
        }
    }
}

impl fmt::Debug for LogSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogSink::Stderr => f.write_str("Stderr"),
            LogSink::File(path) => f.debug_tuple("File").field(path).finish(),
            LogSink::Writer(_) => f.write_str("Writer(..)"),
        }
    }
}

/// Event format that appends a backtrace to WARN and ERROR records.
struct Stacktrace<F> {
    inner: F,
    enabled: bool,
}

impl<S, N, F> FormatEvent<S, N> for Stacktrace<F>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
    F: FormatEvent<S, N>,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        self.inner.format_event(ctx, writer.by_ref(), event)?;
        if self.enabled && *event.metadata().level() <= Level::WARN {
            writeln!(writer, "stacktrace:\n{}", Backtrace::force_capture())?;
        }
        Ok(())
    }
}
