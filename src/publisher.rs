// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::log_record::LogRecord;
use std::fmt::Debug;

/**
A destination for log records: the console, a file, or anything a host provides.
*/
pub trait Publisher: Debug + Send + Sync {
    /**
        Writes the record out.

        Publishing never fails from the caller's point of view. A publisher that hits an
        error drops the record and recovers on its own.
    */
    fn publish(&self, record: &LogRecord);

    /**
    Releases any resources held. Publishing after `close` is allowed, and reacquires them.
    */
    fn close(&self);
}

/*
Boilerplate notes.

# Publisher

Clone doesn't make sense for a publisher that owns a file handle: two clones would be two writers.
PartialEq/Eq: data equality vs. "same destination" is unclear, don't implement.
Default is not sensible since a file publisher needs a path.
Send/Sync are required: loggers publish from whatever thread logs.
*/
