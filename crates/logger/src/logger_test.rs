//! Tests for the leveled logger

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::Mutex;
use tempfile::TempDir;

use rotolog_sink::{ByteSink, FileSink, Result, RotationConfig};

use crate::level::Level;
use crate::logger::Logger;

/// Sink that captures everything written, for asserting on output
#[derive(Default)]
struct CaptureSink {
    bytes: Mutex<Vec<u8>>,
}

impl CaptureSink {
    fn contents(&self) -> String {
        String::from_utf8(self.bytes.lock().clone()).unwrap()
    }
}

impl ByteSink for CaptureSink {
    fn write(&self, payload: &[u8]) -> Result<usize> {
        self.bytes.lock().extend_from_slice(payload);
        Ok(payload.len())
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }
}

fn capture_logger(level: Level) -> (Arc<CaptureSink>, Logger) {
    let sink = Arc::new(CaptureSink::default());
    let logger = Logger::new(Arc::clone(&sink) as Arc<dyn ByteSink>).with_level(level);
    (sink, logger)
}

#[test]
fn test_line_format() {
    let (sink, logger) = capture_logger(Level::Debug);

    logger.info(format_args!("started on port {}", 8080));

    let line = sink.contents();
    assert!(line.starts_with('['), "leads with the timestamp: {line}");
    assert!(line.contains("] [INFO] "), "level tag present: {line}");
    assert!(line.contains(file!()), "caller site present: {line}");
    assert!(line.ends_with("started on port 8080\n"), "message last: {line}");
}

#[test]
fn test_below_threshold_dropped() {
    let (sink, logger) = capture_logger(Level::Warn);

    logger.debug(format_args!("not this"));
    logger.info(format_args!("nor this"));
    logger.warn(format_args!("but this"));
    logger.error(format_args!("and this"));

    let out = sink.contents();
    assert!(!out.contains("not this"));
    assert!(!out.contains("nor this"));
    assert!(out.contains("[WARN] "));
    assert!(out.contains("[ERROR] "));
}

#[test]
fn test_none_threshold_silences_everything() {
    let (sink, logger) = capture_logger(Level::None);

    logger.error(format_args!("silence"));
    assert!(sink.contents().is_empty());
    assert!(!logger.enabled(Level::Error));
}

#[test]
fn test_without_caller() {
    let sink = Arc::new(CaptureSink::default());
    let logger = Logger::new(Arc::clone(&sink) as Arc<dyn ByteSink>).with_caller(false);

    logger.info(format_args!("bare"));
    assert!(!sink.contents().contains(file!()));
}

#[test]
fn test_panic_level_panics_with_message() {
    let (sink, logger) = capture_logger(Level::Debug);

    let result = catch_unwind(AssertUnwindSafe(|| {
        logger.panic(format_args!("unrecoverable: {}", 42));
    }));

    let payload = result.unwrap_err();
    let message = payload.downcast_ref::<String>().unwrap();
    assert_eq!(message, "unrecoverable: 42");
    assert!(sink.contents().contains("[PANIC] "));
}

#[test]
fn test_custom_time_layout() {
    let sink = Arc::new(CaptureSink::default());
    let logger = Logger::new(Arc::clone(&sink) as Arc<dyn ByteSink>)
        .with_time_layout("@%Y@")
        .with_caller(false);

    logger.info(format_args!("x"));
    let year = chrono::Local::now().format("%Y").to_string();
    assert!(sink.contents().starts_with(&format!("[@{year}@] [INFO] x")));
}

#[test]
fn test_drives_a_rotating_file_sink() {
    let dir = TempDir::new().unwrap();
    let sink = FileSink::new(
        RotationConfig::default()
            .with_root_dir(dir.path())
            .with_file_format("%Y-%m-%d.log"),
    )
    .unwrap();

    let logger = Logger::new(sink.clone() as Arc<dyn ByteSink>).with_caller(false);
    logger.info(format_args!("through the facade"));
    logger.flush();

    let path = sink.current_path().unwrap();
    let content = std::fs::read_to_string(path).unwrap();
    assert!(content.contains("[INFO] through the facade\n"));
}
