// SPDX-License-Identifier: MIT OR Apache-2.0

use chrono::{Days, Local, NaiveDate};
use logshelf::retention::day_dir_name;
use logshelf::{Level, LogIdentity, Logger, Registry};
use std::fs;
use std::path::Path;

struct Disk;
impl LogIdentity for Disk {
    fn on_create(logger: &Logger) {
        logger.enable_file_log_mb(1);
    }
}

fn day(offset: u64) -> NaiveDate {
    Local::now().date_naive() - Days::new(offset)
}

fn seed(root: &Path) {
    for offset in [0, 1, 2, 30] {
        let dir = root.join(day_dir_name(day(offset)));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("Disk.log"), "old\n").unwrap();
    }
    fs::write(root.join("stray.log"), "stray\n").unwrap();
    fs::create_dir_all(root.join("backup")).unwrap();
}

fn names(root: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(root)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn one_day_keeps_only_today() {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path());
    let registry = Registry::new();
    registry.open(dir.path(), Level::All, false);
    let logger = registry.get::<Disk>();
    logger.info("today");

    registry.delete_log_file_keeping(1).unwrap();
    assert_eq!(names(dir.path()), [day_dir_name(day(0))]);
    assert!(logger.is_destroyed());

    // today's file survived and a new logger appends to it
    registry.get::<Disk>().info("later");
    let contents =
        fs::read_to_string(dir.path().join(day_dir_name(day(0))).join("Disk.log")).unwrap();
    assert_eq!(contents.lines().count(), 3);
}

#[test]
fn three_days_keep_today_and_two_before() {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path());
    let registry = Registry::new();
    registry.open(dir.path(), Level::All, false);

    registry.delete_log_file_keeping(3).unwrap();
    let mut expected = vec![
        day_dir_name(day(0)),
        day_dir_name(day(1)),
        day_dir_name(day(2)),
    ];
    expected.sort();
    assert_eq!(names(dir.path()), expected);
}

#[test]
fn missing_directory_is_fine() {
    let dir = tempfile::tempdir().unwrap();
    let registry = Registry::new();
    registry.open(dir.path().join("never-created"), Level::All, false);
    registry.delete_log_file_keeping(1).unwrap();
    registry.delete_log_file().unwrap();
}
