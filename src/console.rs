// SPDX-License-Identifier: MIT OR Apache-2.0

//! Console output.
//!
//! The platform print call is abstracted as [`Console`], taking a severity, a tag and
//! the message. [`StdErrorConsole`] is the default: stderr on native targets, the
//! browser's `console.*` functions on WASM. [`ConsolePublisher`] adapts a console to
//! the [`Publisher`] interface by mapping record levels to severities.

use crate::Level;
use crate::log_record::LogRecord;
use crate::publisher::Publisher;
use std::fmt::Debug;
use std::sync::Arc;

/// Console severities. There is no console severity for the sentinel levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

impl Severity {
    /// The console severity for a record level, if there is one.
    pub fn for_level(level: Level) -> Option<Severity> {
        match level {
            Level::Debug => Some(Severity::Debug),
            Level::Info => Some(Severity::Info),
            Level::Warning => Some(Severity::Warning),
            Level::Error => Some(Severity::Error),
            Level::All | Level::Off => None,
        }
    }

    pub const fn letter(self) -> char {
        match self {
            Severity::Debug => 'D',
            Severity::Info => 'I',
            Severity::Warning => 'W',
            Severity::Error => 'E',
        }
    }
}

/**
A platform print primitive.
*/
pub trait Console: Debug + Send + Sync {
    fn print(&self, severity: Severity, tag: &str, message: &str);
}

/**
A reference console that prints to stderr.
 */
#[derive(Debug, Clone)]
pub struct StdErrorConsole {}

// ============================================================================
// BOILERPLATE TRAIT IMPLEMENTATIONS
// ============================================================================
//
// - Debug/Clone: derived
// - Copy: zero-sized, no heap
// - PartialEq/Eq/Hash: all instances are equivalent
// - Default: convenient zero-argument constructor
// - Display/From/Into: no meaningful representation or conversions

impl Copy for StdErrorConsole {}

impl PartialEq for StdErrorConsole {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for StdErrorConsole {}

impl std::hash::Hash for StdErrorConsole {
    fn hash<H: std::hash::Hasher>(&self, _state: &mut H) {}
}

impl Default for StdErrorConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl StdErrorConsole {
    pub const fn new() -> Self {
        Self {}
    }
}

impl Console for StdErrorConsole {
    fn print(&self, severity: Severity, tag: &str, message: &str) {
        #[cfg(not(target_arch = "wasm32"))]
        {
            use std::io::Write;
            let mut lock = std::io::stderr().lock();
            // nowhere to report a failing stderr
            let _ = writeln!(lock, "{}/{}: {}", severity.letter(), tag, message);
        }
        #[cfg(target_arch = "wasm32")]
        {
            let msg = format!("{}: {}", tag, message);
            match severity {
                Severity::Debug => {
                    web_sys::console::debug_1(&msg.into());
                }
                Severity::Info => {
                    web_sys::console::info_1(&msg.into());
                }
                Severity::Warning => {
                    web_sys::console::warn_1(&msg.into());
                }
                Severity::Error => {
                    web_sys::console::error_1(&msg.into());
                }
            }
        }
    }
}

/**
Publishes records to a [Console].

Records whose level has no console severity are dropped. Nothing is buffered, so
[Publisher::close] has nothing to do.
*/
#[derive(Debug, Clone)]
pub struct ConsolePublisher {
    console: Arc<dyn Console>,
}

impl ConsolePublisher {
    pub fn new(console: Arc<dyn Console>) -> Self {
        Self { console }
    }

    pub fn console(&self) -> &Arc<dyn Console> {
        &self.console
    }
}

impl Default for ConsolePublisher {
    fn default() -> Self {
        Self::new(Arc::new(StdErrorConsole::new()))
    }
}

impl Publisher for ConsolePublisher {
    fn publish(&self, record: &LogRecord) {
        if let Some(severity) = Severity::for_level(record.level()) {
            self.console.print(severity, record.tag(), record.message());
        }
    }

    fn close(&self) {
        //nothing to do since we are unbuffered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inmemory_console::InMemoryConsole;

    #[test]
    fn levels_map_to_severities() {
        let console = Arc::new(InMemoryConsole::new());
        let publisher = ConsolePublisher::new(console.clone());
        for level in [Level::Debug, Level::Info, Level::Warning, Level::Error] {
            publisher.publish(&LogRecord::new("Net", level, level.name(), 0));
        }
        let lines = console.drain();
        let severities: Vec<Severity> = lines.iter().map(|l| l.severity).collect();
        assert_eq!(
            severities,
            [Severity::Debug, Severity::Info, Severity::Warning, Severity::Error]
        );
        assert!(lines.iter().all(|l| l.tag == "Net"));
        assert_eq!(lines[2].message, "warning");
    }

    #[test]
    fn sentinel_levels_are_dropped() {
        let console = Arc::new(InMemoryConsole::new());
        let publisher = ConsolePublisher::new(console.clone());
        publisher.publish(&LogRecord::new("Net", Level::Off, "off", 0));
        publisher.publish(&LogRecord::new("Net", Level::All, "all", 0));
        publisher.close();
        assert!(console.drain().is_empty());
    }
}
