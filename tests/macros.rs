// SPDX-License-Identifier: MIT OR Apache-2.0

use logshelf::{InMemoryConsole, Level, LogConfig, LogIdentity};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

struct Net;
impl LogIdentity for Net {}

static TEST_LOGGER_GUARD: Mutex<()> = Mutex::new(());

/// Opens the process-wide registry once, returning its console.
fn console() -> &'static InMemoryConsole {
    static CONSOLE: OnceLock<Arc<InMemoryConsole>> = OnceLock::new();
    CONSOLE.get_or_init(|| {
        let console = Arc::new(InMemoryConsole::new());
        let dir = tempfile::tempdir().unwrap().keep();
        logshelf::global().open_with(
            LogConfig::new(dir)
                .with_console(true)
                .with_console_sink(console.clone()),
        );
        console
    })
}

struct Counted<'a>(&'a AtomicUsize);

impl fmt::Display for Counted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fetch_add(1, Ordering::SeqCst);
        f.write_str("counted")
    }
}

#[test]
fn macros_log_at_their_level() {
    let _guard = TEST_LOGGER_GUARD.lock().unwrap();
    let console = console();
    logshelf::global().set_global_level(Level::All);
    console.drain();

    logshelf::log_debug!(Net, "d{}", 1);
    logshelf::log_info!(Net, "i{}", 2);
    logshelf::log_warning!(Net, "w{}", 3);
    logshelf::log_error!(Net, "e{}", 4);
    assert_eq!(console.drain_logs(), "D/Net: d1\nI/Net: i2\nW/Net: w3\nE/Net: e4");
}

#[test]
fn filtered_arguments_are_not_formatted() {
    let _guard = TEST_LOGGER_GUARD.lock().unwrap();
    let console = console();
    logshelf::global().set_global_level(Level::Warning);
    console.drain();

    let formats = AtomicUsize::new(0);
    logshelf::log_info!(Net, "{}", Counted(&formats));
    assert_eq!(formats.load(Ordering::SeqCst), 0);
    logshelf::log_error!(Net, "{}", Counted(&formats));
    assert_eq!(formats.load(Ordering::SeqCst), 1);
    assert_eq!(console.drain_logs(), "E/Net: counted");
}

#[test]
fn free_functions_use_the_global_registry() {
    let _guard = TEST_LOGGER_GUARD.lock().unwrap();
    console();
    assert!(!logshelf::open("/nonexistent/elsewhere", Level::Off, false));
    assert!(logshelf::global().is_open());
    assert!(logshelf::get::<Net>().same_logger(&logshelf::global().get::<Net>()));
}
