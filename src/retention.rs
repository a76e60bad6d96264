// SPDX-License-Identifier: MIT OR Apache-2.0

//! Day-partitioned log directory layout and the retention sweep.
//!
//! The log root holds one subdirectory per day, named `yyyyMMdd`. Keeping `n` days
//! means keeping today and the `n - 1` days before it; anything else in the root
//! (older days, loose files, directories with other names) is stale.

use chrono::NaiveDate;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The subdirectory name for `date`.
pub fn day_dir_name(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Parses a `yyyyMMdd` directory name.
pub fn parse_day_dir(name: &str) -> Option<NaiveDate> {
    if name.len() != 8 || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = name[0..4].parse().ok()?;
    let month = name[4..6].parse().ok()?;
    let day = name[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/**
Lists the entries of `root` that fall outside a `save_days` window ending `today`.

`save_days` must be at least 1; deleting everything is the caller's business.
*/
pub(crate) fn stale_entries(root: &Path, save_days: u32, today: NaiveDate) -> io::Result<Vec<PathBuf>> {
    debug_assert!(save_days > 0);
    let oldest_kept = today
        .checked_sub_days(chrono::Days::new(u64::from(save_days - 1)))
        .unwrap_or(NaiveDate::MIN);
    let mut stale = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type()?.is_dir() {
            stale.push(path);
            continue;
        }
        let keep = entry
            .file_name()
            .to_str()
            .and_then(parse_day_dir)
            .is_some_and(|day| day >= oldest_kept);
        if !keep {
            stale.push(path);
        }
    }
    stale.sort();
    Ok(stale)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn names_round_trip() {
        assert_eq!(day_dir_name(date(2026, 1, 9)), "20260109");
        assert_eq!(parse_day_dir("20260109"), Some(date(2026, 1, 9)));
        assert_eq!(parse_day_dir("20261341"), None);
        assert_eq!(parse_day_dir("2026019"), None);
        assert_eq!(parse_day_dir("+2026019"), None);
        assert_eq!(parse_day_dir("misc"), None);
    }

    #[test]
    fn keeps_window_and_flags_the_rest() {
        let root = tempfile::tempdir().unwrap();
        let today = date(2026, 10, 19);
        for name in ["20261019", "20261018", "20261017", "20261001", "notes"] {
            fs::create_dir(root.path().join(name)).unwrap();
        }
        fs::write(root.path().join("loose.log"), "x").unwrap();

        let stale = stale_entries(root.path(), 2, today).unwrap();
        let names: Vec<String> = stale
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["20261001", "20261017", "loose.log", "notes"]);
    }

    #[test]
    fn one_day_keeps_only_today() {
        let root = tempfile::tempdir().unwrap();
        let today = date(2026, 3, 1);
        fs::create_dir(root.path().join("20260301")).unwrap();
        fs::create_dir(root.path().join("20260228")).unwrap();
        let stale = stale_entries(root.path(), 1, today).unwrap();
        assert_eq!(stale, [root.path().join("20260228")]);
    }
}
