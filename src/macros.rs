// SPDX-License-Identifier: MIT OR Apache-2.0

//! Logging macros.
//!
//! Each macro takes a logger identity type followed by [`format!`] arguments, fetches
//! the identity's logger from the process-wide registry and formats the message only
//! if the level passes.
//!
//! ```rust
//! use logshelf::{DefaultLogger, Level};
//!
//! let dir = tempfile::tempdir().unwrap();
//! logshelf::open(dir.path(), Level::Info, false);
//!
//! let job = 23;
//! logshelf::log_info!(DefaultLogger, "completed job {job}");
//! // never formatted
//! logshelf::log_debug!(DefaultLogger, "{:?}", vec![0u8; 1024]);
//! ```
//!
//! The process-wide registry must be open; see [`crate::open`].

/// Logs at an explicit [`Level`](crate::Level) through the process-wide registry.
#[macro_export]
macro_rules! log_at {
    ($level:expr, $identity:ty, $($arg:tt)+) => {
        $crate::global()
            .get::<$identity>()
            .log_with($level, || ::std::format!($($arg)+))
    };
}

/// Logs at [`Level::Debug`](crate::Level::Debug).
#[macro_export]
macro_rules! log_debug {
    ($identity:ty, $($arg:tt)+) => {
        $crate::log_at!($crate::Level::Debug, $identity, $($arg)+)
    };
}

/// Logs at [`Level::Info`](crate::Level::Info).
#[macro_export]
macro_rules! log_info {
    ($identity:ty, $($arg:tt)+) => {
        $crate::log_at!($crate::Level::Info, $identity, $($arg)+)
    };
}

/// Logs at [`Level::Warning`](crate::Level::Warning).
#[macro_export]
macro_rules! log_warning {
    ($identity:ty, $($arg:tt)+) => {
        $crate::log_at!($crate::Level::Warning, $identity, $($arg)+)
    };
}

/// Logs at [`Level::Error`](crate::Level::Error).
#[macro_export]
macro_rules! log_error {
    ($identity:ty, $($arg:tt)+) => {
        $crate::log_at!($crate::Level::Error, $identity, $($arg)+)
    };
}
