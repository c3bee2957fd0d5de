//! Tests for rotation configuration

use std::time::Duration;

use crate::config::{RotationConfig, DEFAULT_BUFFER_CAPACITY, DEFAULT_SYNC_INTERVAL};
use crate::error::SinkError;

#[test]
fn test_default_config() {
    let config = RotationConfig::default();

    assert_eq!(config.root_dir.to_str().unwrap(), "logs");
    assert!(config.dir_format.is_empty());
    assert_eq!(config.file_format, "%Y%m%d.log");
    assert!(config.timestamp.is_none());
    assert_eq!(config.max_file_size, 0);
    assert_eq!(config.sync_interval, DEFAULT_SYNC_INTERVAL);
    assert!(!config.flush_each_write);
    assert!(!config.buffered);
    assert_eq!(config.buffer_capacity, DEFAULT_BUFFER_CAPACITY);

    assert!(config.validate().is_ok());
}

#[test]
fn test_builder_methods() {
    let config = RotationConfig::default()
        .with_root_dir("/var/log/app")
        .with_dir_format("%Y%m")
        .with_file_format("%Y-%m-%d.log")
        .with_timestamp("%Y-%m-%d %H:%M:%S", 1)
        .with_max_file_size(1024)
        .with_buffering(Duration::from_millis(250))
        .with_buffer_capacity(4096);

    assert_eq!(config.root_dir.to_str().unwrap(), "/var/log/app");
    assert_eq!(config.dir_format, "%Y%m");
    assert_eq!(config.file_format, "%Y-%m-%d.log");
    let ts = config.timestamp.as_ref().unwrap();
    assert_eq!(ts.format, "%Y-%m-%d %H:%M:%S");
    assert_eq!(ts.offset, 1);
    assert_eq!(config.max_file_size, 1024);
    assert!(config.buffered);
    assert_eq!(config.sync_interval, Duration::from_millis(250));
    assert_eq!(config.buffer_capacity, 4096);

    assert!(config.validate().is_ok());
}

#[test]
fn test_empty_root_dir_rejected() {
    let config = RotationConfig::default().with_root_dir("");
    assert!(matches!(config.validate(), Err(SinkError::Config(_))));
}

#[test]
fn test_empty_file_format_rejected() {
    let config = RotationConfig::default().with_file_format("");
    assert!(matches!(config.validate(), Err(SinkError::Config(_))));
}

#[test]
fn test_bad_strftime_pattern_rejected() {
    // %Q is not a strftime specifier
    let config = RotationConfig::default().with_file_format("%Q.log");
    assert!(matches!(config.validate(), Err(SinkError::Config(_))));

    let config = RotationConfig::default().with_dir_format("%Q");
    assert!(matches!(config.validate(), Err(SinkError::Config(_))));

    let config = RotationConfig::default().with_timestamp("%Q", 0);
    assert!(matches!(config.validate(), Err(SinkError::Config(_))));
}

#[test]
fn test_zero_sync_interval_rejected_when_loop_would_run() {
    let config = RotationConfig::default().with_buffering(Duration::ZERO);
    assert!(matches!(config.validate(), Err(SinkError::Config(_))));

    // With per-write flushing there is no loop, so the interval is unused
    let config = RotationConfig::default()
        .with_buffering(Duration::ZERO)
        .with_flush_each_write();
    assert!(config.validate().is_ok());
}

#[test]
fn test_zero_buffer_capacity_rejected() {
    let config = RotationConfig::default()
        .with_buffering(Duration::from_secs(1))
        .with_buffer_capacity(0);
    assert!(matches!(config.validate(), Err(SinkError::Config(_))));
}

#[test]
fn test_wants_flush_loop() {
    assert!(!RotationConfig::default().wants_flush_loop());
    assert!(RotationConfig::default()
        .with_buffering(Duration::from_secs(1))
        .wants_flush_loop());
    assert!(!RotationConfig::default()
        .with_buffering(Duration::from_secs(1))
        .with_flush_each_write()
        .wants_flush_loop());
}
