//! Sink error types

use std::io;

use thiserror::Error;

/// Result type for sink operations
pub type Result<T> = std::result::Result<T, SinkError>;

/// Errors that can occur while configuring or writing to a sink
#[derive(Debug, Error)]
pub enum SinkError {
    /// Invalid static configuration, detected at construction
    #[error("invalid sink configuration: {0}")]
    Config(String),

    /// Timestamp extractor points past the end of the payload
    #[error("timestamp offset {offset} out of range for {len}-byte payload")]
    TimestampOutOfRange {
        /// Configured byte offset
        offset: usize,
        /// Actual payload length
        len: usize,
    },

    /// Embedded timestamp did not match the configured format
    #[error("failed to parse embedded timestamp from '{snippet}'")]
    TimestampParse {
        /// Leading part of the text that failed to parse
        snippet: String,
        /// Underlying chrono error
        #[source]
        source: chrono::ParseError,
    },

    /// Failed to open the current log file
    #[error("failed to open '{path}'")]
    Open {
        /// Path of the file the sink attempted to open
        path: String,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// I/O error on the open file
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl SinkError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
