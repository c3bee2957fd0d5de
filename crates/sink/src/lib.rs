//! rotolog - Rotating file sink
//!
//! A durable byte sink that splits output files by calendar time and by
//! size. A leveled logging front-end (see `rotolog-logger`) formats lines
//! and drives this sink through the minimal [`ByteSink`] contract; this
//! crate owns everything with real invariants: file/directory naming, the
//! rollover decision, buffering and the flush discipline, and concurrency
//! under simultaneous writers plus a background flusher.
//!
//! # Layout on disk
//!
//! ```text
//! root_dir/
//! └── 202401/              # optional, from dir_format
//!     ├── 2024-01-01.log        # time bucket, from file_format
//!     ├── 2024-01-01.log.0001   # size rollover within the bucket
//!     └── 2024-01-02.log        # next bucket, index reset
//! ```
//!
//! # Example
//!
//! ```ignore
//! use rotolog_sink::{FileSink, RotationConfig};
//! use std::time::Duration;
//!
//! let sink = FileSink::new(
//!     RotationConfig::default()
//!         .with_root_dir("logs")
//!         .with_file_format("%Y-%m-%d.log")
//!         .with_max_file_size(64 * 1024 * 1024)
//!         .with_buffering(Duration::from_secs(1)),
//! )?;
//!
//! sink.write_str("2024-01-01 00:00:00 service started\n")?;
//! sink.flush()?;
//! ```

// =============================================================================
// Modules
// =============================================================================

/// Rotation configuration and validation
mod config;

/// Error taxonomy
mod error;

/// Write/rotation/flush counters
mod metrics;

/// The open-file handle and its optional in-memory buffer
mod output;

/// The rotating sink itself
mod sink;

// =============================================================================
// Public re-exports
// =============================================================================

pub use config::{RotationConfig, TimestampField, DEFAULT_BUFFER_CAPACITY, DEFAULT_SYNC_INTERVAL};
pub use error::{Result, SinkError};
pub use metrics::{MetricsSnapshot, SinkMetrics};
pub use sink::FileSink;

/// The byte/string-sink contract a logging front-end drives
///
/// Kept minimal on purpose: anything that can accept bytes and flush can sit
/// behind a logger, and [`FileSink`] is just one implementation.
pub trait ByteSink: Send + Sync {
    /// Write a payload, returning the number of bytes accepted
    fn write(&self, payload: &[u8]) -> Result<usize>;

    /// Write a string payload
    fn write_str(&self, text: &str) -> Result<usize> {
        self.write(text.as_bytes())
    }

    /// Flush buffered data towards storage
    fn flush(&self) -> Result<()>;
}

impl ByteSink for FileSink {
    fn write(&self, payload: &[u8]) -> Result<usize> {
        FileSink::write(self, payload)
    }

    fn write_str(&self, text: &str) -> Result<usize> {
        FileSink::write_str(self, text)
    }

    fn flush(&self) -> Result<()> {
        FileSink::flush(self)
    }
}
