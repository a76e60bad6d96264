// SPDX-License-Identifier: MIT OR Apache-2.0

//! Log record type for the logshelf logging system.
//!
//! A [`LogRecord`] is created once per emitted message by the registry's record
//! generator and is immutable afterwards. It is handed by reference to every
//! enabled publisher, so the console and the file see exactly the same values.
//!
//! Calendar fields (year through millisecond, in local time) are derived from the
//! millisecond timestamp on first use and cached, so records that are filtered out
//! or only go to the console never pay for the calendar conversion.

use crate::Level;
use crate::error::LogError;
use chrono::{Datelike, Local, TimeZone, Timelike};
use std::fmt::Display;
use std::sync::{Arc, OnceLock};

/// Local calendar breakdown of a record's timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalendarFields {
    pub year: i32,
    /// 1-based
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millisecond: u32,
}

impl CalendarFields {
    /**
    Breaks `millis` down in the local time zone.

    Returns `None` if the instant is outside the range chrono can represent.
    */
    pub fn from_millis(millis: i64) -> Option<Self> {
        let time = Local.timestamp_millis_opt(millis).single()?;
        Some(Self {
            year: time.year(),
            month: time.month(),
            day: time.day(),
            hour: time.hour(),
            minute: time.minute(),
            second: time.second(),
            // leap seconds report 1000..=1999
            millisecond: time.timestamp_subsec_millis().min(999),
        })
    }
}

/**
One emitted log message.

Records are built by the registry (see [crate::Registry]) with the wall-clock time,
the thread that logged, and a disambiguator for records that share a millisecond.
[LogRecord::new] exists so that custom [crate::Formatter]s and publishers can be tested
in isolation.
*/
#[derive(Debug, Clone)]
pub struct LogRecord {
    tag: Arc<str>,
    message: String,
    level: Level,
    millis: i64,
    concurrent: u32,
    is_main_thread: bool,
    thread_id: u64,
    calendar: OnceLock<Option<CalendarFields>>,
}

impl LogRecord {
    /**
    Creates a record logged from the main thread with no disambiguator.

    Use [LogRecord::with_thread] and [LogRecord::with_concurrent] to set the rest.
    */
    pub fn new(tag: impl Into<Arc<str>>, level: Level, message: impl Into<String>, millis: i64) -> Self {
        Self {
            tag: tag.into(),
            message: message.into(),
            level,
            millis,
            concurrent: 0,
            is_main_thread: true,
            thread_id: crate::sys::current_thread_id(),
            calendar: OnceLock::new(),
        }
    }

    pub fn with_concurrent(mut self, concurrent: u32) -> Self {
        self.concurrent = concurrent;
        self
    }

    pub fn with_thread(mut self, is_main_thread: bool, thread_id: u64) -> Self {
        self.is_main_thread = is_main_thread;
        self.thread_id = thread_id;
        self
    }

    /// The identity tag of the logger that produced this record.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// Milliseconds since the Unix epoch.
    pub fn millis(&self) -> i64 {
        self.millis
    }

    /**
    Tie-breaker between records from different loggers in the same millisecond.

    0 for the first record of a millisecond and whenever the same logger logs twice in a row.
    */
    pub fn concurrent(&self) -> u32 {
        self.concurrent
    }

    pub fn is_main_thread(&self) -> bool {
        self.is_main_thread
    }

    pub fn thread_id(&self) -> u64 {
        self.thread_id
    }

    /**
    Calendar fields of the timestamp, computed on first call.
    */
    pub fn calendar(&self) -> Result<CalendarFields, LogError> {
        self.calendar
            .get_or_init(|| CalendarFields::from_millis(self.millis))
            .ok_or(LogError::TimestampOutOfRange(self.millis))
    }
}

impl PartialEq for LogRecord {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag
            && self.message == other.message
            && self.level == other.level
            && self.millis == other.millis
            && self.concurrent == other.concurrent
            && self.is_main_thread == other.is_main_thread
            && self.thread_id == other.thread_id
    }
}

impl Eq for LogRecord {}

/// Renders the record with the default line format, without the trailing newline.
impl Display for LogRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use crate::formatter::Formatter;
        let line = crate::formatter::DefaultFormatter.format(self);
        f.write_str(line.trim_end_matches('\n'))
    }
}
/*
Boilerplate notes for LogRecord:

IMPLEMENTED:
- Debug/Clone: Derived
- PartialEq/Eq: by hand, ignoring the calendar cache which is derived data
- Display: the default line format

NOT IMPLEMENTED:
- Hash: no use as a key; would have to skip the cache too
- Ord: timestamp order is not record order, see `concurrent`
- Default: a record without a tag or message is meaningless
*/
