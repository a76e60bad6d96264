// SPDX-License-Identifier: MIT OR Apache-2.0

use logshelf::{FilePublisher, Formatter, Level, LogRecord, Publisher};
use std::fs;
use std::path::Path;
use std::sync::Arc;

const MIB: u64 = 1024 * 1024;

/// Writes the message and a newline, nothing else.
#[derive(Debug)]
struct Bare;

impl Formatter for Bare {
    fn format(&self, record: &LogRecord) -> String {
        format!("{}\n", record.message())
    }
}

fn publisher(path: &Path, limit: u64) -> FilePublisher {
    FilePublisher::with_formatter(path, limit, Arc::new(Bare))
}

/// A record that formats to exactly `len` bytes.
fn record(len: usize) -> LogRecord {
    LogRecord::new("Disk", Level::Info, "x".repeat(len - 1), 0)
}

fn size(path: &Path) -> Option<u64> {
    fs::metadata(path).ok().map(|m| m.len())
}

#[test]
fn one_mebibyte_limit_rotates_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("20260101").join("Disk.log");
    let publisher = publisher(&path, MIB);
    let line = record(1000);

    let mut rotations = 0;
    let mut written = 0u64;
    // stop at the first record after a rotation
    while rotations == 0 || size(&path).is_none() {
        publisher.publish(&line);
        written += 1000;
        if size(&path).is_none() {
            rotations += 1;
            assert!(written > MIB);
            assert!(written - 1000 <= MIB);
        }
        assert!(written < 2 * MIB, "never rotated");
    }
    assert_eq!(rotations, 1);
    assert_eq!(size(&path), Some(1000));
    assert_eq!(publisher.bytes_written(), Some(1000));
}

#[test]
fn existing_bytes_count_against_limit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Disk.log");
    fs::write(&path, vec![b'.'; 600]).unwrap();

    let publisher = publisher(&path, 1000);
    let line = record(100);
    for _ in 0..4 {
        publisher.publish(&line);
    }
    assert_eq!(size(&path), Some(1000));
    publisher.publish(&line);
    assert_eq!(size(&path), None);
}

#[test]
fn restart_picks_up_where_last_run_stopped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Disk.log");
    let line = record(250);

    let first = publisher(&path, 1000);
    first.publish(&line);
    first.publish(&line);
    first.close();
    drop(first);

    let second = publisher(&path, 1000);
    second.publish(&line);
    assert_eq!(second.bytes_written(), Some(750));
    second.publish(&line);
    assert_eq!(size(&path), Some(1000));
    second.publish(&line);
    assert_eq!(size(&path), None);
}

#[test]
fn raising_limit_defers_rotation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Disk.log");
    let publisher = publisher(&path, 150);
    let line = record(100);
    publisher.publish(&line);
    publisher.set_limit(1000);
    publisher.publish(&line);
    assert_eq!(size(&path), Some(200));
    assert_eq!(publisher.limit(), 1000);
}

#[test]
fn default_format_lands_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Disk.log");
    let publisher = FilePublisher::new(&path, MIB);
    let record = LogRecord::new("Disk", Level::Error, "boom", 0)
        .with_concurrent(2)
        .with_thread(false, 7);
    publisher.publish(&record);
    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.ends_with(".2[E,7] boom\n"), "{contents:?}");
    assert_eq!(contents.lines().count(), 1);
}
