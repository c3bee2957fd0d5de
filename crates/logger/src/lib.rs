//! rotolog - Leveled logging facade
//!
//! A thin leveled front-end over any [`ByteSink`], most usefully the
//! rotating [`FileSink`](rotolog_sink::FileSink) from `rotolog-sink`: this
//! crate formats and filters; the sink owns rotation, buffering, and
//! durability.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use rotolog_logger::{set_default, Level, Logger};
//! use rotolog_sink::{FileSink, RotationConfig};
//!
//! let sink = FileSink::new(
//!     RotationConfig::default()
//!         .with_root_dir("logs")
//!         .with_file_format("%Y-%m-%d.log"),
//! )?;
//! set_default(Logger::new(sink).with_level(Level::Info)).ok();
//!
//! rotolog_logger::info!("service started on port {}", 8080);
//! ```

/// Severity levels
mod level;

/// The logger itself and the stdout sink
mod logger;

/// Declarative configuration
mod config;

/// Process-wide default instance and the logging macros
mod global;

pub use config::LogConfig;
pub use global::{default, set_default};
pub use level::{Level, ParseLevelError};
pub use logger::{Logger, StdoutSink, DEFAULT_TIME_LAYOUT};

// The sink contract the facade drives, re-exported for implementors
pub use rotolog_sink::ByteSink;
