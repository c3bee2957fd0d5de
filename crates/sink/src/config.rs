//! Rotation configuration
//!
//! A `RotationConfig` describes where files go and when the sink moves on to
//! a new one. The calendar granularity comes from strftime patterns: the
//! bucket file name is `file_format` applied to the write's effective time,
//! optionally nested in a `dir_format` sub-directory.
//!
//! # Example
//!
//! ```ignore
//! use rotolog_sink::RotationConfig;
//! use std::time::Duration;
//!
//! let config = RotationConfig::default()
//!     .with_root_dir("logs")
//!     .with_dir_format("%Y%m/")
//!     .with_file_format("%Y-%m-%d.log")
//!     .with_max_file_size(64 * 1024 * 1024)
//!     .with_buffering(Duration::from_secs(1));
//! ```

use std::path::PathBuf;
use std::time::Duration;

use chrono::format::{Item, StrftimeItems};

use crate::error::{Result, SinkError};

/// Default in-memory buffer high-water mark (64KB)
pub const DEFAULT_BUFFER_CAPACITY: usize = 64 * 1024;

/// Default interval between automatic flushes
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(1);

/// Where inside each payload an embedded timestamp lives
///
/// When configured, the sink derives the time bucket from the payload itself
/// instead of the wall clock: the payload is parsed at byte `offset` with the
/// strftime `format`, and whatever follows the timestamp is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampField {
    /// strftime pattern the timestamp is written in
    pub format: String,

    /// Byte offset of the timestamp within the payload
    pub offset: usize,
}

/// Configuration for a rotating file sink
///
/// Immutable after construction. Only `root_dir` and `file_format` are
/// required to be meaningful; everything else has a working default.
#[derive(Debug, Clone)]
pub struct RotationConfig {
    /// Base directory for all output files
    pub root_dir: PathBuf,

    /// strftime pattern for a time-split sub-directory; empty = no sub-directory
    pub dir_format: String,

    /// strftime pattern producing the bucket file name (the rotation granularity)
    pub file_format: String,

    /// Embedded-timestamp extractor; `None` uses the wall clock
    pub timestamp: Option<TimestampField>,

    /// Size threshold for rollover within a bucket; 0 disables size rollover
    pub max_file_size: u64,

    /// Interval between automatic flushes when the flush loop runs
    pub sync_interval: Duration,

    /// Flush after every write, bypassing the flush loop
    pub flush_each_write: bool,

    /// Route writes through an in-memory buffer before the file
    pub buffered: bool,

    /// Buffer high-water mark; the buffer drains to the file once it fills
    pub buffer_capacity: usize,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("logs"),
            dir_format: String::new(),
            file_format: "%Y%m%d.log".into(),
            timestamp: None,
            max_file_size: 0,
            sync_interval: DEFAULT_SYNC_INTERVAL,
            flush_each_write: false,
            buffered: false,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}

impl RotationConfig {
    /// Set the base directory
    #[must_use]
    pub fn with_root_dir(mut self, root_dir: impl Into<PathBuf>) -> Self {
        self.root_dir = root_dir.into();
        self
    }

    /// Set the sub-directory pattern (e.g. `"%Y%m"`)
    #[must_use]
    pub fn with_dir_format(mut self, dir_format: impl Into<String>) -> Self {
        self.dir_format = dir_format.into();
        self
    }

    /// Set the bucket file name pattern (e.g. `"%Y-%m-%d.log"`)
    #[must_use]
    pub fn with_file_format(mut self, file_format: impl Into<String>) -> Self {
        self.file_format = file_format.into();
        self
    }

    /// Derive time buckets from a timestamp embedded in each payload
    #[must_use]
    pub fn with_timestamp(mut self, format: impl Into<String>, offset: usize) -> Self {
        self.timestamp = Some(TimestampField {
            format: format.into(),
            offset,
        });
        self
    }

    /// Set the size rollover threshold in bytes (0 disables)
    #[must_use]
    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    /// Enable buffered writes with periodic flushing at `sync_interval`
    #[must_use]
    pub fn with_buffering(mut self, sync_interval: Duration) -> Self {
        self.buffered = true;
        self.sync_interval = sync_interval;
        self
    }

    /// Set the buffer high-water mark
    #[must_use]
    pub fn with_buffer_capacity(mut self, buffer_capacity: usize) -> Self {
        self.buffer_capacity = buffer_capacity;
        self
    }

    /// Flush (or sync, when unbuffered) after every write
    #[must_use]
    pub fn with_flush_each_write(mut self) -> Self {
        self.flush_each_write = true;
        self
    }

    /// Whether the background flush loop should run for this configuration
    pub(crate) fn wants_flush_loop(&self) -> bool {
        self.buffered && !self.flush_each_write
    }

    /// Validate the static configuration
    ///
    /// A failure here is a programming error in the hosting process, surfaced
    /// at setup time rather than on the write path.
    pub fn validate(&self) -> Result<()> {
        if self.root_dir.as_os_str().is_empty() {
            return Err(SinkError::config("root_dir must not be empty"));
        }
        if self.file_format.is_empty() {
            return Err(SinkError::config("file_format must not be empty"));
        }
        if !pattern_is_valid(&self.file_format) {
            return Err(SinkError::config(format!(
                "file_format '{}' is not a valid strftime pattern",
                self.file_format
            )));
        }
        if !self.dir_format.is_empty() && !pattern_is_valid(&self.dir_format) {
            return Err(SinkError::config(format!(
                "dir_format '{}' is not a valid strftime pattern",
                self.dir_format
            )));
        }
        if let Some(field) = &self.timestamp {
            if field.format.is_empty() || !pattern_is_valid(&field.format) {
                return Err(SinkError::config(format!(
                    "timestamp format '{}' is not a valid strftime pattern",
                    field.format
                )));
            }
        }
        if self.buffered && self.buffer_capacity == 0 {
            return Err(SinkError::config("buffer_capacity must be non-zero"));
        }
        if self.wants_flush_loop() && self.sync_interval.is_zero() {
            return Err(SinkError::config("sync_interval must be non-zero"));
        }
        Ok(())
    }
}

/// Check that a strftime pattern parses cleanly
///
/// `chrono` reports bad specifiers lazily as `Item::Error` while formatting,
/// which would otherwise surface as a panic deep in the write path.
fn pattern_is_valid(pattern: &str) -> bool {
    !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
