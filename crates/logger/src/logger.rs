//! Leveled logger
//!
//! A `Logger` is a thin pass-through: it filters by minimum level, formats a
//! line with timestamp and caller-site metadata, and forwards the finished
//! bytes to a [`ByteSink`]. All interesting state lives behind the sink.
//!
//! # Line format
//!
//! ```text
//! [2024-01-01 10:00:00.123] [INFO] src/main.rs:42 service started
//! ```

use std::fmt::{self, Write as FmtWrite};
use std::io::{self, Write};
use std::panic::Location;
use std::sync::Arc;

use chrono::Local;

use rotolog_sink::ByteSink;

use crate::level::Level;

/// Default timestamp layout for log lines
pub const DEFAULT_TIME_LAYOUT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Leveled logging front-end over a byte sink
pub struct Logger {
    /// Minimum level that gets emitted
    level: Level,

    /// strftime layout for the line timestamp
    time_layout: String,

    /// Include `file:line` of the call site
    with_caller: bool,

    /// Destination for finished lines
    sink: Arc<dyn ByteSink>,
}

impl Logger {
    /// Create a logger over a sink, at the default (debug) threshold
    pub fn new(sink: Arc<dyn ByteSink>) -> Self {
        Self {
            level: Level::default(),
            time_layout: DEFAULT_TIME_LAYOUT.into(),
            with_caller: true,
            sink,
        }
    }

    /// Set the minimum emitted level
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set the timestamp layout
    #[must_use]
    pub fn with_time_layout(mut self, layout: impl Into<String>) -> Self {
        self.time_layout = layout.into();
        self
    }

    /// Enable or disable caller-site capture
    #[must_use]
    pub fn with_caller(mut self, with_caller: bool) -> Self {
        self.with_caller = with_caller;
        self
    }

    /// The current minimum level
    pub fn level(&self) -> Level {
        self.level
    }

    /// Whether a record at `level` would be emitted
    pub fn enabled(&self, level: Level) -> bool {
        level != Level::None && level >= self.level
    }

    /// Log at debug level
    #[track_caller]
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, args, Location::caller());
    }

    /// Log at info level
    #[track_caller]
    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, args, Location::caller());
    }

    /// Log at warn level
    #[track_caller]
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, args, Location::caller());
    }

    /// Log at error level
    #[track_caller]
    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Error, args, Location::caller());
    }

    /// Log at panic level, then panic with the formatted message
    #[track_caller]
    pub fn panic(&self, args: fmt::Arguments<'_>) -> ! {
        let message = args.to_string();
        self.log(Level::Panic, args, Location::caller());
        let _ = self.sink.flush();
        panic!("{message}");
    }

    /// Flush the underlying sink
    pub fn flush(&self) {
        if let Err(e) = self.sink.flush() {
            tracing::error!(error = %e, "log sink flush failed");
        }
    }

    fn log(&self, level: Level, args: fmt::Arguments<'_>, caller: &'static Location<'static>) {
        if !self.enabled(level) {
            return;
        }

        let mut line = String::with_capacity(96);
        let _ = write!(
            line,
            "[{}] [{}] ",
            Local::now().format(&self.time_layout),
            level.tag(),
        );
        if self.with_caller {
            let _ = write!(line, "{}:{} ", caller.file(), caller.line());
        }
        let _ = line.write_fmt(args);
        line.push('\n');

        if let Err(e) = self.sink.write_str(&line) {
            tracing::error!(error = %e, "log sink write failed");
        }
    }
}

/// Byte sink over locked stdout, the default logger destination
#[derive(Debug, Default)]
pub struct StdoutSink;

impl StdoutSink {
    /// Create a stdout sink
    pub fn new() -> Self {
        Self
    }
}

impl ByteSink for StdoutSink {
    fn write(&self, payload: &[u8]) -> rotolog_sink::Result<usize> {
        let mut out = io::stdout().lock();
        out.write_all(payload)?;
        Ok(payload.len())
    }

    fn flush(&self) -> rotolog_sink::Result<()> {
        io::stdout().lock().flush()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "logger_test.rs"]
mod logger_test;
