// SPDX-License-Identifier: MIT OR Apache-2.0

//! Open-time configuration for a [`Registry`](crate::Registry).

use crate::Level;
use crate::console::Console;
use crate::formatter::Formatter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const ENV_LEVEL: &str = "LOGSHELF_LEVEL";
pub const ENV_CONSOLE: &str = "LOGSHELF_CONSOLE";
pub const ENV_DIAGNOSTICS: &str = "LOGSHELF_DIAGNOSTICS";

/**
Everything [crate::Registry::open_with] needs.

```rust
use logshelf::{Level, LogConfig};

let config = LogConfig::new("/tmp/app-logs")
    .with_level(Level::Info)
    .with_console(true);
assert_eq!(config.level, Level::Info);
```
*/
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Root log directory; per-day subdirectories go inside it.
    pub directory: PathBuf,
    /// Global level new loggers start with.
    pub level: Level,
    /// Also print records to the console.
    pub console: bool,
    /// Print the crate's own bookkeeping messages to the console.
    pub diagnostics: bool,
    pub(crate) console_sink: Option<Arc<dyn Console>>,
    pub(crate) formatter: Option<Arc<dyn Formatter>>,
}

impl LogConfig {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            level: Level::All,
            console: false,
            diagnostics: cfg!(feature = "diagnostics"),
            console_sink: None,
            formatter: None,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_console(mut self, console: bool) -> Self {
        self.console = console;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: bool) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Prints console output and diagnostics through `console` instead of stderr.
    pub fn with_console_sink(mut self, console: Arc<dyn Console>) -> Self {
        self.console_sink = Some(console);
        self
    }

    /// Formats file lines with `formatter` instead of [crate::DefaultFormatter].
    pub fn with_formatter(mut self, formatter: Arc<dyn Formatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /**
    Applies `LOGSHELF_LEVEL`, `LOGSHELF_CONSOLE` and `LOGSHELF_DIAGNOSTICS`.

    Unparseable values are ignored.
    */
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(level) = var(ENV_LEVEL).and_then(|v| v.parse().ok()) {
            self.level = level;
        }
        if let Some(console) = var(ENV_CONSOLE).and_then(|v| parse_switch(&v)) {
            self.console = console;
        }
        if let Some(diagnostics) = var(ENV_DIAGNOSTICS).and_then(|v| parse_switch(&v)) {
            self.diagnostics = diagnostics;
        }
    }
}

fn parse_switch(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
