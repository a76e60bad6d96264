// SPDX-License-Identifier: MIT OR Apache-2.0

//! # In-Memory Console
//!
//! A [`Console`] that keeps printed lines in memory instead of writing them out,
//! for:
//!
//! - Unit testing code that logs to the console
//! - Observing the crate's diagnostics channel
//! - Environments where stderr is redirected or unavailable

use crate::console::{Console, Severity};
use std::sync::Mutex;

/// One captured console print.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConsoleLine {
    pub severity: Severity,
    pub tag: String,
    pub message: String,
}

/// A console that stores everything printed to it.
///
/// # Example
///
/// ```rust
/// use logshelf::{InMemoryConsole, LogConfig, Registry, DefaultLogger};
/// use std::sync::Arc;
///
/// let dir = tempfile::tempdir().unwrap();
/// let console = Arc::new(InMemoryConsole::new());
/// let registry = Registry::new();
/// registry.open_with(
///     LogConfig::new(dir.path())
///         .with_console(true)
///         .with_console_sink(console.clone()),
/// );
///
/// registry.get::<DefaultLogger>().info("Test message 42");
///
/// let logs = console.drain_logs();
/// assert!(logs.contains("Test message 42"));
/// ```
#[derive(Debug)]
pub struct InMemoryConsole {
    lines: Mutex<Vec<ConsoleLine>>,
}

// - Default: empty buffer
// - Clone: NOT implemented, two buffers would silently split the output
// - PartialEq/Eq/Hash: NOT implemented, comparing mutex contents is racy
// - Send/Sync: automatic via Mutex (required by Console)

impl Default for InMemoryConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryConsole {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(Vec::new()),
        }
    }

    /// Takes every captured line, leaving the buffer empty.
    pub fn drain(&self) -> Vec<ConsoleLine> {
        let mut lines = self.lines.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *lines)
    }

    /// Drains the buffer into one string, one `S/tag: message` entry per line.
    ///
    /// ```rust
    /// use logshelf::{Console, InMemoryConsole, Severity};
    ///
    /// let console = InMemoryConsole::new();
    /// console.print(Severity::Warning, "Net", "slow");
    /// assert_eq!(console.drain_logs(), "W/Net: slow");
    /// assert_eq!(console.drain_logs(), "");
    /// ```
    pub fn drain_logs(&self) -> String {
        self.drain()
            .iter()
            .map(|line| format!("{}/{}: {}", line.severity.letter(), line.tag, line.message))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn len(&self) -> usize {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Console for InMemoryConsole {
    fn print(&self, severity: Severity, tag: &str, message: &str) {
        let mut lines = self.lines.lock().unwrap_or_else(|e| e.into_inner());
        lines.push(ConsoleLine {
            severity,
            tag: tag.to_string(),
            message: message.to_string(),
        });
    }
}
