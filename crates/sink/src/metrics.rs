//! Sink metrics
//!
//! In-process counters only; there is no reporting pipeline behind them.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters maintained by a file sink
#[derive(Debug, Default)]
pub struct SinkMetrics {
    /// Successful writes
    pub writes: AtomicU64,

    /// Payload bytes accepted across all files
    pub bytes_written: AtomicU64,

    /// File rotations (time-bucket or size)
    pub rotations: AtomicU64,

    /// Failed writes (parse, open, or I/O)
    pub write_errors: AtomicU64,

    /// Flush operations (manual, periodic, or per-write)
    pub flushes: AtomicU64,
}

impl SinkMetrics {
    /// Create a new metrics instance
    pub const fn new() -> Self {
        Self {
            writes: AtomicU64::new(0),
            bytes_written: AtomicU64::new(0),
            rotations: AtomicU64::new(0),
            write_errors: AtomicU64::new(0),
            flushes: AtomicU64::new(0),
        }
    }

    /// Record a successful write of `bytes` payload bytes
    #[inline]
    pub fn record_write(&self, bytes: u64) {
        self.writes.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Record a rotation
    #[inline]
    pub fn record_rotation(&self) {
        self.rotations.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed write
    #[inline]
    pub fn record_error(&self) {
        self.write_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a flush
    #[inline]
    pub fn record_flush(&self) {
        self.flushes.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a point-in-time snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            writes: self.writes.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            rotations: self.rotations.load(Ordering::Relaxed),
            write_errors: self.write_errors.load(Ordering::Relaxed),
            flushes: self.flushes.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of sink metrics
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub writes: u64,
    pub bytes_written: u64,
    pub rotations: u64,
    pub write_errors: u64,
    pub flushes: u64,
}
