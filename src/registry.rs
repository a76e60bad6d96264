// SPDX-License-Identifier: MIT OR Apache-2.0

//! The logger registry.
//!
//! A [`Registry`] owns the process-level logging settings (log directory, global
//! level, console output) and a cache holding at most one logger per identity. It is
//! also the sole arbiter of which [`FilePublisher`] may write an identity's file: the
//! registry keeps a weak reference to every publisher it hands out, and before it
//! creates a second publisher for an identity it revokes the first one.
//!
//! # Lifecycle
//!
//! A registry must be opened before loggers can be fetched from it. The first
//! [`Registry::open`] wins; later calls are ignored.
//!
//! ```
//! use logshelf::{DefaultLogger, Level, Registry};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let registry = Registry::new();
//! registry.open(dir.path(), Level::Info, false);
//!
//! let logger = registry.get::<DefaultLogger>();
//! logger.info("hello");
//! assert!(logger.same_logger(&registry.get::<DefaultLogger>()));
//! ```
//!
//! Loggers live until they are destroyed. Destruction happens when
//!
//! * the global level changes ([`Registry::set_global_level`]),
//! * the directory is handed out or wiped ([`Registry::log_dir`], [`Registry::delete_log_file`]),
//! * [`Registry::clear_loggers`] or [`Registry::destroy`] is called, or
//! * the logger was [released](Registry::release) and its last handle drops.
//!
//! A destroyed logger closes its file and ignores everything logged to it.
//! The next [`Registry::get`] creates a fresh one, which runs the identity's
//! [`LogIdentity::on_create`] hook again.
//!
//! # Process-wide registry
//!
//! Most programs want a single registry; [`global`] returns it, and [`open`] and [`get`]
//! forward to it.
//!
//! # Locking
//!
//! Registry operations take one registry-wide lock. Logging itself does not: the
//! settings fixed by `open` are read lock-free, and a record only takes its logger's
//! lock (briefly) and then its publisher's lock. Locks are always taken in the order
//! registry, logger, publisher.

use crate::config::LogConfig;
use crate::console::{Console, ConsolePublisher, Severity, StdErrorConsole};
use crate::diagnostics::Diagnostics;
use crate::error::{LogError, Result};
use crate::file_publisher::{FilePublisher, remove_path};
use crate::formatter::{DefaultFormatter, Formatter};
use crate::generator::RecordGenerator;
use crate::identity::{LogIdentity, is_valid_tag};
use crate::log_record::LogRecord;
use crate::logger::{Logger, LoggerEntry};
use crate::publisher::Publisher;
use crate::retention::{day_dir_name, stale_entries};
use crate::Level;
use chrono::{Local, NaiveDate};
use std::any::TypeId;
use std::cell::Cell;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, Weak};

/// Tag of the records printed by [Registry::debug].
pub const DEBUG_TAG: &str = "DebugLogger";

#[derive(Debug)]
struct Settings {
    directory: PathBuf,
    console: Option<ConsolePublisher>,
    formatter: Arc<dyn Formatter>,
}

impl Settings {
    fn log_file_path(&self, tag: &str, day: NaiveDate) -> PathBuf {
        self.directory.join(day_dir_name(day)).join(format!("{tag}.log"))
    }
}

#[derive(Debug, Default)]
struct RegistryState {
    level: Level,
    loggers: HashMap<TypeId, Arc<LoggerEntry>>,
    publishers: HashMap<TypeId, Weak<FilePublisher>>,
    tags: HashMap<&'static str, TypeId>,
}

impl RegistryState {
    /// Forgets destroyed loggers and dropped publishers.
    fn reclaim(&mut self, diagnostics: &Diagnostics) {
        let loggers = self.loggers.len();
        let publishers = self.publishers.len();
        self.loggers.retain(|_, entry| !entry.is_destroyed());
        self.publishers.retain(|_, publisher| publisher.strong_count() > 0);
        let (reclaimed_loggers, reclaimed_publishers) =
            (loggers - self.loggers.len(), publishers - self.publishers.len());
        if reclaimed_loggers + reclaimed_publishers > 0 {
            diagnostics.emit(|| {
                format!(
                    "reclaimed {reclaimed_loggers} loggers, {reclaimed_publishers} publishers"
                )
            });
        }
    }

    /// Revokes whatever publisher is still registered for `key`.
    fn revoke_publisher(&mut self, key: TypeId, diagnostics: &Diagnostics) {
        let Some(stale) = self.publishers.remove(&key).and_then(|weak| weak.upgrade()) else {
            return;
        };
        stale.revoke();
        diagnostics.emit(|| {
            format!(
                "closed stale publisher for {} ----- size {}",
                stale.path().display(),
                self.publishers.len()
            )
        });
    }

    fn deregister(&mut self, key: TypeId, publisher: &Arc<FilePublisher>) {
        let registered = self
            .publishers
            .get(&key)
            .is_some_and(|weak| std::ptr::eq(weak.as_ptr(), Arc::as_ptr(publisher)));
        if registered {
            self.publishers.remove(&key);
        }
    }
}

thread_local! {
    /// The registry whose [Registry::log_dir] closure is running on this thread.
    static IN_LOG_DIR: Cell<*const Shared> = const { Cell::new(std::ptr::null()) };
}

/// Marks the current thread as inside `log_dir` until dropped.
struct LogDirScope {
    previous: *const Shared,
}

impl LogDirScope {
    fn enter(shared: &Shared) -> Self {
        Self {
            previous: IN_LOG_DIR.with(|cell| cell.replace(shared)),
        }
    }
}

impl Drop for LogDirScope {
    fn drop(&mut self) {
        IN_LOG_DIR.with(|cell| cell.set(self.previous));
    }
}

/// Registry internals shared with the loggers it creates.
#[derive(Debug)]
pub(crate) struct Shared {
    state: Mutex<RegistryState>,
    settings: OnceLock<Settings>,
    generator: RecordGenerator,
    diagnostics: Arc<Diagnostics>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        // the lock is not reentrant; waiting here would never end
        if std::ptr::eq(IN_LOG_DIR.with(Cell::get), self) {
            panic!("registry called from inside its own log_dir closure");
        }
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn settings(&self) -> Result<&Settings> {
        self.settings.get().ok_or(LogError::NotOpened)
    }

    /// Settings, or a panic naming the operation that needed them.
    fn require_open(&self, operation: &str) -> &Settings {
        match self.settings() {
            Ok(settings) => settings,
            Err(e) => panic!("{operation}: {e}"),
        }
    }

    pub(crate) fn generator(&self) -> &RecordGenerator {
        &self.generator
    }

    pub(crate) fn publish_to_console(&self, record: &LogRecord) {
        if let Some(console) = self.settings.get().and_then(|s| s.console.as_ref()) {
            console.publish(record);
        }
    }

    /**
    Gives `entry` a file publisher with `limit`, or changes the limit of the one it has.

    Only the cached entry of an identity may open its file; requests from released or
    destroyed entries are ignored.
    */
    pub(crate) fn attach_file_publisher(&self, entry: &Arc<LoggerEntry>, limit: u64) {
        let mut state = self.lock();
        let Ok(settings) = self.settings() else {
            return;
        };
        let key = entry.key();
        let cached = state
            .loggers
            .get(&key)
            .is_some_and(|cached| Arc::ptr_eq(cached, entry));
        let mut entry_state = entry.lock();
        if entry.is_destroyed() || !cached {
            self.diagnostics
                .emit(|| format!("ignored file log request from retired logger {}", entry.tag()));
            return;
        }
        if let Some(existing) = &entry_state.publisher {
            existing.set_limit(limit);
            return;
        }
        state.revoke_publisher(key, &self.diagnostics);
        let path = settings.log_file_path(entry.tag(), Local::now().date_naive());
        let publisher = Arc::new(FilePublisher::with_parts(
            path,
            limit,
            settings.formatter.clone(),
            self.diagnostics.clone(),
        ));
        state.publishers.insert(key, Arc::downgrade(&publisher));
        self.diagnostics.emit(|| {
            format!(
                "publisher {} +++++ size {}",
                publisher.path().display(),
                state.publishers.len()
            )
        });
        entry_state.publisher = Some(publisher);
    }

    /// Destroys every cached logger and revokes every publisher still alive.
    fn clear_locked(&self, state: &mut RegistryState) {
        let loggers = std::mem::take(&mut state.loggers);
        let count = loggers.len();
        for (key, entry) in loggers {
            if let Some(publisher) = entry.destroy() {
                state.deregister(key, &publisher);
            }
        }
        for (_, publisher) in state.publishers.drain() {
            if let Some(publisher) = publisher.upgrade() {
                publisher.revoke();
            }
        }
        if count > 0 {
            self.diagnostics.emit(|| format!("destroyed {count} loggers ----- size 0"));
        }
    }
}

/**
Coordinates loggers, their files and the process-level settings.

`Registry` is a cheap handle; clones share the same state.
*/
#[derive(Debug, Clone)]
pub struct Registry {
    shared: Arc<Shared>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Creates an unopened registry.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(RegistryState::default()),
                settings: OnceLock::new(),
                generator: RecordGenerator::new(),
                diagnostics: Arc::new(Diagnostics::new()),
            }),
        }
    }

    /**
    Opens the registry on `directory`.

    Returns whether this call opened it. Only the first call has any effect.
    */
    pub fn open(&self, directory: impl Into<PathBuf>, level: Level, enable_console: bool) -> bool {
        self.open_with(
            LogConfig::new(directory)
                .with_level(level)
                .with_console(enable_console),
        )
    }

    /// [Registry::open] with the full configuration.
    pub fn open_with(&self, config: LogConfig) -> bool {
        let mut state = self.shared.lock();
        if let Some(settings) = self.shared.settings.get() {
            self.shared.diagnostics.emit(|| {
                format!(
                    "already open on {}, ignoring {}",
                    settings.directory.display(),
                    config.directory.display()
                )
            });
            return false;
        }
        let sink: Arc<dyn Console> = config
            .console_sink
            .unwrap_or_else(|| Arc::new(StdErrorConsole::new()));
        self.shared.diagnostics.configure(config.diagnostics, sink.clone());
        let settings = Settings {
            directory: config.directory,
            console: config.console.then(|| ConsolePublisher::new(sink)),
            formatter: config
                .formatter
                .unwrap_or_else(|| Arc::new(DefaultFormatter)),
        };
        self.shared.diagnostics.emit(|| {
            format!(
                "opened on {} at {}",
                settings.directory.display(),
                config.level
            )
        });
        // Only ever set here, under the state lock.
        let _ = self.shared.settings.set(settings);
        state.level = config.level;
        self.shared.generator.mark_main_thread();
        true
    }

    pub fn is_open(&self) -> bool {
        self.shared.settings.get().is_some()
    }

    /// The root log directory, once open.
    pub fn directory(&self) -> Option<&Path> {
        self.shared.settings.get().map(|s| s.directory.as_path())
    }

    /// The level new loggers start with.
    pub fn global_level(&self) -> Level {
        self.shared.lock().level
    }

    /**
    Changes the global level.

    If the level actually changes, every cached logger is destroyed so that the next
    [Registry::get] recreates it at the new level.
    */
    pub fn set_global_level(&self, level: Level) {
        let mut state = self.shared.lock();
        self.shared.require_open("set_global_level");
        if state.level == level {
            return;
        }
        state.level = level;
        self.shared.clear_locked(&mut state);
    }

    /**
    Returns the logger for identity `T`, creating it if needed.

    # Panics

    If the registry is not open, or `T`'s tag is invalid or already used by a
    different identity. See [Registry::try_get].
    */
    pub fn get<T: LogIdentity>(&self) -> Logger {
        match self.try_get::<T>() {
            Ok(logger) => logger,
            Err(e) => panic!("get::<{}>: {e}", std::any::type_name::<T>()),
        }
    }

    /// [Registry::get], reporting precondition violations instead of panicking.
    pub fn try_get<T: LogIdentity>(&self) -> Result<Logger> {
        let key = TypeId::of::<T>();
        let tag = T::tag();
        let logger = {
            let mut state = self.shared.lock();
            self.shared.settings()?;
            if !is_valid_tag(tag) {
                return Err(LogError::InvalidTag(tag.to_string()));
            }
            match state.tags.entry(tag) {
                Entry::Occupied(owner) if *owner.get() != key => {
                    return Err(LogError::TagConflict { tag });
                }
                Entry::Occupied(_) => {}
                Entry::Vacant(vacant) => {
                    vacant.insert(key);
                }
            }
            state.reclaim(&self.shared.diagnostics);
            if let Some(entry) = state.loggers.get(&key) {
                return Ok(Logger::from_entry(entry.clone()));
            }
            state.revoke_publisher(key, &self.shared.diagnostics);
            let entry = Arc::new(LoggerEntry::new(
                key,
                tag,
                state.level,
                Arc::downgrade(&self.shared),
            ));
            state.loggers.insert(key, entry.clone());
            self.shared.diagnostics.emit(|| {
                format!("logger {tag} +++++ size {}", state.loggers.len())
            });
            Logger::from_entry(entry)
        };
        T::on_create(&logger);
        Ok(logger)
    }

    /**
    Drops the registry's reference to `T`'s logger.

    Outstanding handles keep working; the logger is destroyed, and its file closed,
    when the last one drops. Returns whether a logger was cached.
    */
    pub fn release<T: LogIdentity>(&self) -> bool {
        let mut state = self.shared.lock();
        self.shared.require_open("release");
        let released = state.loggers.remove(&TypeId::of::<T>());
        if released.is_some() {
            self.shared.diagnostics.emit(|| {
                format!("logger {} released, size {}", T::tag(), state.loggers.len())
            });
        }
        released.is_some()
    }

    /**
    Destroys `T`'s logger now, closing its file.

    Returns whether a logger was cached.
    */
    pub fn destroy<T: LogIdentity>(&self) -> bool {
        let key = TypeId::of::<T>();
        let mut state = self.shared.lock();
        self.shared.require_open("destroy");
        let Some(entry) = state.loggers.remove(&key) else {
            return false;
        };
        if let Some(publisher) = entry.destroy() {
            state.deregister(key, &publisher);
        }
        self.shared.diagnostics.emit(|| {
            format!("logger {} ----- size {}", entry.tag(), state.loggers.len())
        });
        true
    }

    /// Destroys every cached logger.
    pub fn clear_loggers(&self) {
        let mut state = self.shared.lock();
        self.shared.require_open("clear_loggers");
        self.shared.clear_locked(&mut state);
    }

    /// Number of cached loggers.
    pub fn logger_count(&self) -> usize {
        self.shared.lock().loggers.len()
    }

    /// Number of file publishers still alive.
    pub fn open_publisher_count(&self) -> usize {
        self.shared
            .lock()
            .publishers
            .values()
            .filter(|publisher| publisher.strong_count() > 0)
            .count()
    }

    /**
    Runs `f` with the log directory after destroying every logger.

    The registry stays locked while `f` runs, so no logger can reopen a file under it.

    # Panics

    If the registry is not open, or if `f` calls back into this registry (which
    would otherwise deadlock).
    */
    pub fn log_dir<R>(&self, f: impl FnOnce(&Path) -> R) -> R {
        let mut state = self.shared.lock();
        let settings = self.shared.require_open("log_dir");
        self.shared.clear_locked(&mut state);
        let _scope = LogDirScope::enter(&self.shared);
        f(settings.directory.as_path())
    }

    /**
    Deletes the whole log directory.

    # Panics

    If the registry is not open.
    */
    pub fn delete_log_file(&self) -> Result<()> {
        let result = self.log_dir(remove_path);
        self.shared
            .diagnostics
            .emit(|| format!("deleted log directory: {result:?}"));
        Ok(result?)
    }

    /**
    Deletes everything in the log directory except the last `save_days` days.

    Today counts as one day, so `save_days == 1` keeps only today's directory and
    `save_days == 0` deletes everything. Files in the root and directories not named
    `yyyyMMdd` are always deleted. Loggers are destroyed only if something is deleted.
    Deletion carries on past failures; the first one is returned.

    # Panics

    If the registry is not open.
    */
    pub fn delete_log_file_keeping(&self, save_days: u32) -> Result<()> {
        if save_days == 0 {
            return self.delete_log_file();
        }
        let mut state = self.shared.lock();
        let settings = self.shared.require_open("delete_log_file_keeping");
        if !settings.directory.exists() {
            return Ok(());
        }
        let stale = stale_entries(&settings.directory, save_days, Local::now().date_naive())?;
        if stale.is_empty() {
            return Ok(());
        }
        self.shared.clear_locked(&mut state);
        let mut first_error = None;
        for path in stale {
            let result = remove_path(&path);
            self.shared
                .diagnostics
                .emit(|| format!("deleted {}: {result:?}", path.display()));
            if let Err(e) = result {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    /**
    Prints `message` to the console under the tag [DEBUG_TAG].

    Printed only when console output is enabled and the global level admits
    [Level::Debug]. Never written to a file.
    */
    pub fn debug(&self, message: &str) {
        let Some(console) = self.shared.settings.get().and_then(|s| s.console.as_ref()) else {
            return;
        };
        if message.is_empty() || !Level::Debug.is_loggable(self.global_level()) {
            return;
        }
        console.console().print(Severity::Debug, DEBUG_TAG, message);
    }
}

static GLOBAL_REGISTRY: OnceLock<Registry> = OnceLock::new();

/**
The process-wide registry.

```
use logshelf::{DefaultLogger, Level};

let dir = tempfile::tempdir().unwrap();
logshelf::open(dir.path(), Level::All, false);
logshelf::get::<DefaultLogger>().info("started");
assert!(logshelf::global().is_open());
```
*/
pub fn global() -> &'static Registry {
    GLOBAL_REGISTRY.get_or_init(Registry::new)
}

/// Opens the process-wide registry. See [Registry::open].
pub fn open(directory: impl Into<PathBuf>, level: Level, enable_console: bool) -> bool {
    global().open(directory, level, enable_console)
}

/// Fetches a logger from the process-wide registry. See [Registry::get].
pub fn get<T: LogIdentity>() -> Logger {
    global().get::<T>()
}
