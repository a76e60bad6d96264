// SPDX-License-Identifier: MIT OR Apache-2.0

//! Renders a [`LogRecord`] as one line of text.
//!
//! The default line looks like
//!
//! ```text
//! 20261019 09:05:42.017.2[W,3] disk almost full
//! ```
//!
//! * date and time in local time, zero-padded
//! * `.2`: the same-millisecond disambiguator, only when non-zero
//! * `[W,3]`: only present if the level is not Info or the record came from a
//!   thread other than the main thread. It holds the level code (empty for Info)
//!   and, off the main thread, a comma and the thread id.
//! * a space, the message, a newline

use crate::error::LogError;
use crate::log_record::LogRecord;
use std::fmt::{Debug, Write};

pub trait Formatter: Debug + Send + Sync {
    /**
    Renders `record`, including the trailing newline.

    Implementations must not panic; a record that cannot be rendered should still
    produce some line so its existence isn't lost.
    */
    fn format(&self, record: &LogRecord) -> String;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DefaultFormatter;

impl DefaultFormatter {
    fn try_format(&self, record: &LogRecord) -> Result<String, LogError> {
        let time = record.calendar()?;
        let mut line = String::with_capacity(32 + record.message().len());
        // writing into a String cannot fail
        let _ = write!(
            line,
            "{:04}{:02}{:02} {:02}:{:02}:{:02}.{:03}",
            time.year, time.month, time.day, time.hour, time.minute, time.second, time.millisecond
        );
        if record.concurrent() > 0 {
            let _ = write!(line, ".{}", record.concurrent());
        }
        if record.level() != crate::Level::Info || !record.is_main_thread() {
            line.push('[');
            line.push_str(record.level().code());
            if !record.is_main_thread() {
                let _ = write!(line, ",{}", record.thread_id());
            }
            line.push(']');
        }
        line.push(' ');
        line.push_str(record.message());
        line.push('\n');
        Ok(line)
    }
}

impl Formatter for DefaultFormatter {
    fn format(&self, record: &LogRecord) -> String {
        match self.try_format(record) {
            Ok(line) => line,
            Err(e) => fallback_line(record, &e),
        }
    }
}

/// The line written for a record that could not be formatted.
pub fn fallback_line(record: &LogRecord, error: &LogError) -> String {
    format!(
        "{} [format error: {}] {}\n",
        record.millis(),
        error,
        record.message()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Level;
    use chrono::{Local, TimeZone};

    #[cfg(target_arch = "wasm32")]
    use wasm_bindgen_test::*;

    fn millis_of(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, ms: i64) -> i64 {
        Local
            .with_ymd_and_hms(y, mo, d, h, mi, s)
            .earliest()
            .unwrap()
            .timestamp_millis()
            + ms
    }

    #[cfg_attr(not(target_arch = "wasm32"), test)]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    fn info_on_main_thread_has_no_brackets() {
        let record = LogRecord::new("Net", Level::Info, "hello", millis_of(2024, 3, 5, 7, 8, 9, 4));
        assert_eq!(DefaultFormatter.format(&record), "20240305 07:08:09.004 hello\n");
    }

    #[cfg_attr(not(target_arch = "wasm32"), test)]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    fn level_code_and_thread_go_in_brackets() {
        let millis = millis_of(2024, 12, 31, 23, 59, 58, 120);
        let warning = LogRecord::new("Net", Level::Warning, "w", millis);
        assert_eq!(DefaultFormatter.format(&warning), "20241231 23:59:58.120[W] w\n");

        let off_main = LogRecord::new("Net", Level::Info, "i", millis).with_thread(false, 42);
        assert_eq!(DefaultFormatter.format(&off_main), "20241231 23:59:58.120[,42] i\n");

        let both = LogRecord::new("Net", Level::Error, "e", millis).with_thread(false, 3);
        assert_eq!(DefaultFormatter.format(&both), "20241231 23:59:58.120[E,3] e\n");
    }

    #[cfg_attr(not(target_arch = "wasm32"), test)]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    fn disambiguator_only_when_positive() {
        let millis = millis_of(2024, 1, 2, 3, 4, 5, 6);
        let record = LogRecord::new("Net", Level::Debug, "d", millis).with_concurrent(2);
        assert_eq!(DefaultFormatter.format(&record), "20240102 03:04:05.006.2[D] d\n");
        let record = LogRecord::new("Net", Level::Debug, "d", millis).with_concurrent(0);
        assert_eq!(DefaultFormatter.format(&record), "20240102 03:04:05.006[D] d\n");
    }

    #[cfg_attr(not(target_arch = "wasm32"), test)]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    fn unformattable_record_falls_back() {
        let record = LogRecord::new("Net", Level::Info, "still here", i64::MIN);
        let line = DefaultFormatter.format(&record);
        assert!(line.starts_with(&i64::MIN.to_string()));
        assert!(line.contains("format error"));
        assert!(line.ends_with("still here\n"));
    }

    #[cfg_attr(not(target_arch = "wasm32"), test)]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    fn display_drops_newline() {
        let record = LogRecord::new("Net", Level::Info, "hello", millis_of(2024, 3, 5, 7, 8, 9, 4));
        assert_eq!(record.to_string(), "20240305 07:08:09.004 hello");
    }
}
