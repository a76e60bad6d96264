// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error type shared by the crate.
//!
//! Logging calls themselves never return errors; these values show up from
//! administrative operations, from the fallible `try_*` twins of precondition
//! checks, and inside the diagnostics channel.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("the registry has not been opened; call Registry::open first")]
    NotOpened,
    #[error("unknown log level: {0:?}")]
    InvalidLevel(String),
    #[error("invalid logger tag {0:?}: tags become file names")]
    InvalidTag(String),
    #[error("logger tag {tag:?} is already used by another identity")]
    TagConflict { tag: &'static str },
    #[error("timestamp {0}ms cannot be represented as a local date")]
    TimestampOutOfRange(i64),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot create log file {}: {source}", path.display())]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, LogError>;
