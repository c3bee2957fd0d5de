//! Rotating file sink
//!
//! `FileSink` owns one "current file" at a time and splits output by calendar
//! time and by size. Every write runs the rotation decision and the write as
//! one critical section under a single exclusive lock, so concurrent writers
//! and the background flusher never interleave mid-rotation.
//!
//! # Rotation
//!
//! The effective time of a write (wall clock, or a timestamp parsed out of
//! the payload) is formatted with `file_format` into a bucket name. A new
//! bucket closes the current file and opens
//! `root_dir/[dir_format/]bucket`; filling `max_file_size` within a bucket
//! moves to `bucket.0001`, `bucket.0002`, and so on. Files open in append
//! mode, so a restart extends the previous process's output.
//!
//! # Durability
//!
//! Buffered bytes reach the file on flush: per write with
//! `flush_each_write`, on the `sync_interval` timer otherwise, or manually
//! via [`FileSink::flush`]. There is no teardown hook; a crash can lose
//! buffered-but-unflushed bytes. [`FileSink::stop`] exists for hosts that
//! want an orderly shutdown of the flush loop plus a final flush.

use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::{Arc, Weak};

use bytes::BytesMut;
use chrono::{Local, NaiveDate, NaiveDateTime};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::RotationConfig;
use crate::error::{Result, SinkError};
use crate::metrics::SinkMetrics;
use crate::output::FileOutput;

/// Maximum characters of payload text echoed into a parse error
const SNIPPET_LEN: usize = 32;

/// A rotating file sink
///
/// Cheap to share: construction returns an `Arc`, and all methods take
/// `&self`. The background flush loop (buffered mode without per-write
/// flushing) starts on the first write and requires a tokio runtime to be
/// current at that point; without one the sink still works, minus the timer.
pub struct FileSink {
    /// Immutable configuration
    config: RotationConfig,

    /// All mutable state, one exclusive lock
    state: Mutex<SinkState>,

    /// Write/rotation/flush counters
    metrics: SinkMetrics,

    /// Self-reference handed to the flush loop so it never keeps the sink alive
    me: Weak<FileSink>,
}

/// Mutable sink state, guarded by the sink's lock
#[derive(Default)]
struct SinkState {
    /// Whether first-write initialization has run
    initialized: bool,

    /// Resolved directory of the current file
    current_dir: PathBuf,

    /// Resolved path of the current file (empty until the first open attempt)
    current_file: PathBuf,

    /// Payload bytes written to the current file since it was opened
    bytes_written: u64,

    /// Size-rollover suffix within the current time bucket; 0 = no suffix
    rotation_index: u32,

    /// The single open file handle, when one is open
    output: Option<FileOutput>,

    /// Buffer reclaimed from the previous file, reused by the next one
    spare_buffer: Option<BytesMut>,

    /// Background flush loop, when running
    flush_loop: Option<FlushLoop>,
}

/// Handle to the background flush loop
struct FlushLoop {
    /// Stop signal; also fires for the loop when the sink is dropped
    stop: watch::Sender<()>,

    /// The spawned task, awaited by `stop()`
    task: JoinHandle<()>,
}

impl FileSink {
    /// Create a sink from a validated configuration
    ///
    /// Configuration problems are programming errors and surface here, never
    /// on the write path.
    pub fn new(config: RotationConfig) -> Result<Arc<Self>> {
        config.validate()?;
        Ok(Arc::new_cyclic(|me| Self {
            config,
            state: Mutex::new(SinkState::default()),
            metrics: SinkMetrics::new(),
            me: me.clone(),
        }))
    }

    /// Write a payload, rotating first if the bucket or size demands it
    ///
    /// Returns the number of payload bytes accepted. A timestamp parse
    /// failure aborts the write before any state changes; open and I/O
    /// failures are returned after the rotation bookkeeping they interrupted,
    /// so the next write retries the same path.
    pub fn write(&self, payload: &[u8]) -> Result<usize> {
        let mut state = self.state.lock();
        match self.write_locked(&mut state, payload) {
            Ok(n) => {
                self.metrics.record_write(n as u64);
                Ok(n)
            }
            Err(e) => {
                self.metrics.record_error();
                Err(e)
            }
        }
    }

    /// Write a string payload
    pub fn write_str(&self, text: &str) -> Result<usize> {
        self.write(text.as_bytes())
    }

    /// Manually flush: drain the buffer when buffered, sync the file when
    /// not. Idempotent; a no-op when no file is open.
    pub fn flush(&self) -> Result<()> {
        let mut state = self.state.lock();
        self.flush_locked(&mut state)
    }

    /// Stop the flush loop (if running) and perform a final flush
    ///
    /// The loop's termination is awaited, so once this returns no further
    /// timer flushes can race with teardown.
    pub async fn stop(&self) {
        let flush_loop = self.state.lock().flush_loop.take();
        if let Some(FlushLoop { stop, task }) = flush_loop {
            let _ = stop.send(());
            let _ = task.await;
        }
        if let Err(e) = self.flush() {
            tracing::error!(error = %e, "final flush failed");
        }
    }

    /// Path of the file the sink currently targets, once one exists
    pub fn current_path(&self) -> Option<PathBuf> {
        let state = self.state.lock();
        if state.current_file.as_os_str().is_empty() {
            None
        } else {
            Some(state.current_file.clone())
        }
    }

    /// Get reference to metrics
    pub fn metrics(&self) -> &SinkMetrics {
        &self.metrics
    }

    fn write_locked(&self, state: &mut SinkState, payload: &[u8]) -> Result<usize> {
        // Resolve the effective time first: a parse failure must leave the
        // sink untouched, including the first-write initialization below.
        let now = self.effective_time(payload)?;

        if !state.initialized {
            state.initialized = true;
            if self.config.wants_flush_loop() {
                self.spawn_flush_loop(state);
            }
        }

        self.roll_if_needed(state, now, payload.len())?;

        let Some(output) = state.output.as_mut() else {
            // roll_if_needed either leaves a handle open or returns its error
            return Err(SinkError::Io(std::io::Error::other("log file not open")));
        };
        let n = output.write(payload)?;
        state.bytes_written += n as u64;

        if self.config.flush_each_write {
            // Best-effort, matching the timer path: the bytes were accepted
            if let Err(e) = self.flush_locked(state) {
                tracing::error!(error = %e, "per-write flush failed");
            }
        }
        Ok(n)
    }

    /// Rotation decision: compute the candidate path for `now` and switch
    /// files when the bucket changed or the size threshold would overflow
    fn roll_if_needed(&self, state: &mut SinkState, now: NaiveDateTime, len: usize) -> Result<()> {
        let dir = if self.config.dir_format.is_empty() {
            self.config.root_dir.clone()
        } else {
            self.config
                .root_dir
                .join(now.format(&self.config.dir_format).to_string())
        };
        if dir != state.current_dir {
            // Best-effort: a failed mkdir is logged and the write proceeds;
            // the file open right after reports the real error.
            if let Err(e) = fs::create_dir_all(&dir) {
                tracing::warn!(path = %dir.display(), error = %e, "directory creation failed");
            }
            state.current_dir = dir.clone();
        }

        let bucket = now.format(&self.config.file_format).to_string();
        let candidate = if state.rotation_index == 0 {
            dir.join(&bucket)
        } else {
            dir.join(format!("{bucket}.{:04}", state.rotation_index))
        };

        if candidate != state.current_file {
            // Time bucket changed: the rotation index resets even when the
            // old file had room left.
            state.rotation_index = 0;
            state.bytes_written = 0;
            state.current_file = dir.join(&bucket);
            self.reopen(state)?;
        } else if self.config.max_file_size > 0
            && state.bytes_written + len as u64 > self.config.max_file_size
        {
            // Would overflow: move to the next suffix before writing. The
            // payload itself is never split, even if it alone exceeds the
            // threshold.
            state.rotation_index += 1;
            state.bytes_written = 0;
            state.current_file = dir.join(format!("{bucket}.{:04}", state.rotation_index));
            self.reopen(state)?;
        } else if state.output.is_none() {
            // A previous open of this same path failed; retry on every call.
            self.reopen(state)?;
        }
        Ok(())
    }

    /// Close the current file (draining any buffered bytes into it) and open
    /// `state.current_file` in append-or-create mode
    fn reopen(&self, state: &mut SinkState) -> Result<()> {
        if let Some(previous) = state.output.take() {
            let (buffer, drained) = previous.finish();
            if let Err(e) = drained {
                tracing::error!(error = %e, "drain of previous file failed");
            }
            state.spare_buffer = buffer;
            self.metrics.record_rotation();
        }

        // Retry path: the directory may never have been created if its mkdir
        // failed when the bucket was entered.
        if !state.current_dir.exists() {
            if let Err(e) = fs::create_dir_all(&state.current_dir) {
                tracing::warn!(path = %state.current_dir.display(), error = %e, "directory creation failed");
            }
        }

        let file = File::options()
            .create(true)
            .append(true)
            .open(&state.current_file)
            .map_err(|source| SinkError::Open {
                path: state.current_file.display().to_string(),
                source,
            })?;

        let output = if self.config.buffered {
            let buffer = state
                .spare_buffer
                .take()
                .unwrap_or_else(|| BytesMut::with_capacity(self.config.buffer_capacity));
            FileOutput::buffered(file, buffer, self.config.buffer_capacity)
        } else {
            FileOutput::direct(file)
        };
        state.output = Some(output);

        tracing::debug!(path = %state.current_file.display(), "opened log file");
        Ok(())
    }

    fn flush_locked(&self, state: &mut SinkState) -> Result<()> {
        if let Some(output) = state.output.as_mut() {
            output.flush()?;
            self.metrics.record_flush();
        }
        Ok(())
    }

    /// The time bucket source for a payload: an embedded timestamp when one
    /// is configured, the wall clock otherwise
    fn effective_time(&self, payload: &[u8]) -> Result<NaiveDateTime> {
        let Some(field) = &self.config.timestamp else {
            return Ok(Local::now().naive_local());
        };
        if field.offset >= payload.len() {
            return Err(SinkError::TimestampOutOfRange {
                offset: field.offset,
                len: payload.len(),
            });
        }
        let tail = &payload[field.offset..];
        // Binary data after the timestamp is tolerated: parse only the
        // leading valid UTF-8.
        let text = match std::str::from_utf8(tail) {
            Ok(text) => text,
            Err(e) => std::str::from_utf8(&tail[..e.valid_up_to()]).unwrap_or(""),
        };
        parse_payload_time(text, &field.format).map_err(|source| SinkError::TimestampParse {
            snippet: text.chars().take(SNIPPET_LEN).collect(),
            source,
        })
    }

    /// Spawn the periodic flusher; called once, on first write
    fn spawn_flush_loop(&self, state: &mut SinkState) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("no tokio runtime at first write; periodic flushing disabled");
            return;
        };
        let (stop, mut stopped) = watch::channel(());
        let sink = self.me.clone();
        let sync_interval = self.config.sync_interval;
        let task = runtime.spawn(async move {
            let mut ticker = tokio::time::interval(sync_interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // The first tick completes immediately; consume it so the loop
            // flushes one full interval after startup.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let Some(sink) = sink.upgrade() else { break };
                        if let Err(e) = sink.flush() {
                            tracing::error!(error = %e, "periodic flush failed");
                        }
                    }
                    // Err means the sink was dropped without stop(); exit
                    // silently either way.
                    _ = stopped.changed() => break,
                }
            }
            tracing::debug!("flush loop stopped");
        });
        state.flush_loop = Some(FlushLoop { stop, task });
        tracing::debug!(interval = ?sync_interval, "flush loop started");
    }
}

/// Parse a timestamp from the head of `text`, ignoring whatever follows it
///
/// Falls back to a date-only parse (midnight) for formats without time
/// fields, so daily layouts work without a dummy time component.
fn parse_payload_time(text: &str, format: &str) -> chrono::ParseResult<NaiveDateTime> {
    match NaiveDateTime::parse_and_remainder(text, format) {
        Ok((ts, _rest)) => Ok(ts),
        Err(datetime_err) => match NaiveDate::parse_and_remainder(text, format) {
            Ok((date, _rest)) => Ok(date.and_hms_opt(0, 0, 0).unwrap_or_default()),
            Err(_) => Err(datetime_err),
        },
    }
}

#[cfg(test)]
#[path = "sink_test.rs"]
mod sink_test;
