//! Process-wide default logger
//!
//! An explicit, caller-installed singleton rather than implicit package
//! state: [`set_default`] installs a logger once, and [`default`] lazily
//! falls back to a debug-level stdout logger if nothing was installed by the
//! time of the first use.

use std::sync::{Arc, OnceLock};

use crate::logger::{Logger, StdoutSink};

static DEFAULT: OnceLock<Logger> = OnceLock::new();

/// Install the process-wide default logger
///
/// Succeeds at most once; returns the rejected logger if a default already
/// exists (including the lazy stdout fallback, if [`default`] ran first).
pub fn set_default(logger: Logger) -> Result<(), Logger> {
    DEFAULT.set(logger)
}

/// The process-wide default logger
///
/// Initializes the stdout fallback on first use when nothing was installed.
pub fn default() -> &'static Logger {
    DEFAULT.get_or_init(|| Logger::new(Arc::new(StdoutSink::new())))
}

/// Log through the default logger at debug level
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => { $crate::default().debug(format_args!($($arg)*)) };
}

/// Log through the default logger at info level
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => { $crate::default().info(format_args!($($arg)*)) };
}

/// Log through the default logger at warn level
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => { $crate::default().warn(format_args!($($arg)*)) };
}

/// Log through the default logger at error level
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => { $crate::default().error(format_args!($($arg)*)) };
}

/// Log through the default logger at panic level, then panic
#[macro_export]
macro_rules! panic_log {
    ($($arg:tt)*) => { $crate::default().panic(format_args!($($arg)*)) };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_installs_once() {
        // First access wins, whether lazy or explicit
        let first = default();
        assert!(std::ptr::eq(first, default()));

        let rejected = set_default(Logger::new(Arc::new(StdoutSink::new())));
        assert!(rejected.is_err(), "second install must be rejected");
    }
}
