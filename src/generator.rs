// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builds [`LogRecord`]s and stamps them with a same-millisecond disambiguator.
//!
//! Millisecond timestamps are too coarse to order a burst of records coming from
//! several loggers. The generator remembers the last `(millis, tag)` pair it
//! stamped: a record in the same millisecond from a *different* logger gets the
//! next value of a small counter, which the formatter appends to the time. This is
//! an ordering hint for someone merging per-logger files by eye, not a logical clock.

use crate::Level;
use crate::log_record::LogRecord;
use crate::spinlock::Spinlock;
use std::sync::{Arc, OnceLock};
use std::thread::ThreadId;

#[derive(Debug, Default)]
struct LastStamp {
    millis: i64,
    tag: Option<Arc<str>>,
    counter: u32,
}

impl LastStamp {
    fn next(&mut self, millis: i64, tag: &Arc<str>) -> u32 {
        if millis != self.millis || self.tag.is_none() {
            self.millis = millis;
            self.counter = 0;
        } else if self.tag.as_deref() == Some(&**tag) {
            self.counter = 0;
        } else {
            self.counter += 1;
        }
        self.tag = Some(tag.clone());
        self.counter
    }
}

#[derive(Debug, Default)]
pub(crate) struct RecordGenerator {
    last: Spinlock<LastStamp>,
    main_thread: OnceLock<ThreadId>,
}

impl RecordGenerator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Records the calling thread as the main thread. Only the first call counts.
    pub(crate) fn mark_main_thread(&self) {
        let _ = self.main_thread.set(std::thread::current().id());
    }

    pub(crate) fn generate(&self, tag: &Arc<str>, level: Level, message: String) -> LogRecord {
        self.generate_with_clock(tag, level, message, crate::sys::now_millis)
    }

    /**
    Like [RecordGenerator::generate], reading the time from `clock`.

    The clock is read while the stamp lock is held, so stamps come out in lock order.
    */
    pub(crate) fn generate_with_clock(
        &self,
        tag: &Arc<str>,
        level: Level,
        message: String,
        clock: impl FnOnce() -> i64,
    ) -> LogRecord {
        let (millis, concurrent) = {
            let mut last = self.last.lock();
            let millis = clock();
            (millis, last.next(millis, tag))
        };
        let is_main_thread = self
            .main_thread
            .get()
            .is_some_and(|id| *id == std::thread::current().id());
        LogRecord::new(tag.clone(), level, message, millis)
            .with_concurrent(concurrent)
            .with_thread(is_main_thread, crate::sys::current_thread_id())
    }
}
