// SPDX-License-Identifier: MIT OR Apache-2.0

//! The crate's own debug channel.
//!
//! Registry bookkeeping (loggers created and destroyed, publishers opened, stale
//! publishers closed, write failures) is reported here instead of to the caller.
//! It is off unless the `diagnostics` feature is on or the registry is opened with
//! diagnostics enabled. Messages are built lazily, so a disabled channel costs one
//! atomic load.

use crate::console::{Console, Severity, StdErrorConsole};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

pub(crate) const DIAGNOSTICS_TAG: &str = "logshelf";

#[derive(Debug)]
pub(crate) struct Diagnostics {
    enabled: AtomicBool,
    console: OnceLock<Arc<dyn Console>>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagnostics {
    pub(crate) fn new() -> Self {
        Self {
            enabled: AtomicBool::new(cfg!(feature = "diagnostics")),
            console: OnceLock::new(),
        }
    }

    /// Enables or disables the channel, printing to `console` from now on.
    /// The console can be chosen once.
    pub(crate) fn configure(&self, enabled: bool, console: Arc<dyn Console>) {
        let _ = self.console.set(console);
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub(crate) fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub(crate) fn emit(&self, message: impl FnOnce() -> String) {
        if !self.is_enabled() {
            return;
        }
        let message = message();
        match self.console.get() {
            Some(console) => console.print(Severity::Debug, DIAGNOSTICS_TAG, &message),
            None => StdErrorConsole::new().print(Severity::Debug, DIAGNOSTICS_TAG, &message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inmemory_console::InMemoryConsole;

    #[test]
    fn disabled_channel_does_not_build_messages() {
        let diagnostics = Diagnostics::new();
        let console = Arc::new(InMemoryConsole::new());
        diagnostics.configure(false, console.clone());
        diagnostics.emit(|| panic!("message built while disabled"));
        assert!(console.is_empty());
    }

    #[test]
    fn enabled_channel_prints_at_debug() {
        let diagnostics = Diagnostics::new();
        let console = Arc::new(InMemoryConsole::new());
        diagnostics.configure(true, console.clone());
        diagnostics.emit(|| "publisher +++++".to_string());
        let lines = console.drain();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].severity, Severity::Debug);
        assert_eq!(lines[0].tag, DIAGNOSTICS_TAG);
    }
}
