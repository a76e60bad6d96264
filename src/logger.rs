// SPDX-License-Identifier: MIT OR Apache-2.0

//! The per-identity logger facade.
//!
//! A [`Logger`] is a cheap, cloneable handle onto the registry's entry for one
//! identity. The entry holds the logger's level and, once file logging is enabled,
//! its [`FilePublisher`]. Once the registry destroys an entry (global level change,
//! directory wipe, explicit destroy) every handle onto it goes quiet for good: it
//! never logs and never reopens its file. Fetch a fresh handle from the registry
//! instead of keeping one across such events.

use crate::Level;
use crate::file_publisher::FilePublisher;
use crate::publisher::Publisher;
use crate::registry::Shared;
use std::any::TypeId;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

const MIB: u64 = 1024 * 1024;

#[derive(Debug)]
pub(crate) struct EntryState {
    pub(crate) level: Level,
    pub(crate) publisher: Option<Arc<FilePublisher>>,
}

#[derive(Debug)]
pub(crate) struct LoggerEntry {
    key: TypeId,
    tag: Arc<str>,
    registry: Weak<Shared>,
    destroyed: AtomicBool,
    state: Mutex<EntryState>,
}

impl LoggerEntry {
    pub(crate) fn new(key: TypeId, tag: &'static str, level: Level, registry: Weak<Shared>) -> Self {
        Self {
            key,
            tag: Arc::from(tag),
            registry,
            destroyed: AtomicBool::new(false),
            state: Mutex::new(EntryState {
                level,
                publisher: None,
            }),
        }
    }

    pub(crate) fn key(&self) -> TypeId {
        self.key
    }

    pub(crate) fn tag(&self) -> &str {
        &self.tag
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, EntryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::Acquire)
    }

    /**
    Marks the entry destroyed and retires its publisher.

    Returns the publisher so the registry can deregister it, or `None` if there was
    none or the entry was already destroyed.
    */
    pub(crate) fn destroy(&self) -> Option<Arc<FilePublisher>> {
        let publisher = {
            let mut state = self.lock();
            if self.destroyed.swap(true, Ordering::AcqRel) {
                return None;
            }
            state.publisher.take()
        };
        if let Some(publisher) = &publisher {
            publisher.revoke();
        }
        publisher
    }
}

impl Drop for LoggerEntry {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(publisher) = state.publisher.take() {
            publisher.revoke();
        }
    }
}

/**
A handle onto the logger for one identity.

Obtain one with [crate::Registry::get]. Handles are cheap to clone; all clones share
level and file.
*/
#[derive(Debug, Clone)]
pub struct Logger {
    entry: Arc<LoggerEntry>,
}

impl Logger {
    pub(crate) fn from_entry(entry: Arc<LoggerEntry>) -> Self {
        Self { entry }
    }

    pub fn tag(&self) -> &str {
        self.entry.tag()
    }

    pub fn level(&self) -> Level {
        self.entry.lock().level
    }

    /// Changes this logger's threshold. Ignored once the logger is destroyed.
    pub fn set_level(&self, level: Level) {
        let mut state = self.entry.lock();
        if self.entry.is_destroyed() {
            return;
        }
        state.level = level;
    }

    /// Whether a record at `level` would be emitted right now.
    pub fn is_loggable(&self, level: Level) -> bool {
        let state = self.entry.lock();
        !self.entry.is_destroyed() && level.is_record_level() && level.is_loggable(state.level)
    }

    pub fn is_destroyed(&self) -> bool {
        self.entry.is_destroyed()
    }

    /// Whether both handles refer to the same registry entry.
    pub fn same_logger(&self, other: &Logger) -> bool {
        Arc::ptr_eq(&self.entry, &other.entry)
    }

    /**
    Starts writing this logger's records to `<log dir>/<yyyyMMdd>/<tag>.log`.

    The file is deleted and started over whenever it grows past `limit_bytes`.
    Calling again changes the limit of the existing file.

    # Panics

    If `limit_bytes` is 0.
    */
    pub fn enable_file_log(&self, limit_bytes: u64) {
        assert!(limit_bytes > 0, "file log limit must be greater than 0");
        if let Some(shared) = self.entry.registry.upgrade() {
            shared.attach_file_publisher(&self.entry, limit_bytes);
        }
    }

    /// [Logger::enable_file_log] with the limit in MiB.
    pub fn enable_file_log_mb(&self, limit_mb: u32) {
        self.enable_file_log(u64::from(limit_mb) * MIB);
    }

    /// The publisher writing this logger's file, if file logging is enabled.
    pub fn file_publisher(&self) -> Option<Arc<FilePublisher>> {
        self.entry.lock().publisher.clone()
    }

    /**
    Logs `message` at `level`.

    Empty messages and the sentinel levels [Level::All] and [Level::Off] are ignored.
    */
    pub fn log(&self, level: Level, message: impl AsRef<str>) {
        let message = message.as_ref();
        if message.is_empty() {
            return;
        }
        self.log_with(level, || message.to_owned());
    }

    /**
    Logs the message returned by `message`, which is only called if `level` passes.
    */
    pub fn log_with(&self, level: Level, message: impl FnOnce() -> String) {
        let Some(publisher) = self.admit(level) else {
            return;
        };
        let Some(shared) = self.entry.registry.upgrade() else {
            return;
        };
        let message = message();
        if message.is_empty() {
            return;
        }
        let record = shared.generator().generate(&self.entry.tag, level, message);
        if let Some(publisher) = publisher {
            publisher.publish(&record);
        }
        shared.publish_to_console(&record);
    }

    pub fn debug(&self, message: impl AsRef<str>) {
        self.log(Level::Debug, message);
    }

    pub fn info(&self, message: impl AsRef<str>) {
        self.log(Level::Info, message);
    }

    pub fn warning(&self, message: impl AsRef<str>) {
        self.log(Level::Warning, message);
    }

    pub fn error(&self, message: impl AsRef<str>) {
        self.log(Level::Error, message);
    }

    /// `Some(file publisher if any)` if a record at `level` should be emitted.
    fn admit(&self, level: Level) -> Option<Option<Arc<FilePublisher>>> {
        if !level.is_record_level() {
            return None;
        }
        let state = self.entry.lock();
        if self.entry.is_destroyed() || !level.is_loggable(state.level) {
            return None;
        }
        Some(state.publisher.clone())
    }
}
