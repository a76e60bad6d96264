// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::error::LogError;
use std::fmt::Display;
use std::str::FromStr;

/**
Severity of a log record, and the threshold a logger filters against.

Levels are totally ordered by declaration order. [Level::All] and [Level::Off] are
sentinels: they make sense as thresholds, but no record is ever emitted at them.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Level {
    /// Threshold that lets every record through
    #[default]
    All,
    /// Detail for whoever is debugging this component
    Debug,
    /// Normal operation
    Info,
    /// Suspicious condition
    Warning,
    /// Runtime error
    Error,
    /// Threshold that lets nothing through
    Off,
}

impl Level {
    pub const MIN: Level = Level::All;
    pub const MAX: Level = Level::Off;

    /**
    Whether a record at `self` passes a logger whose threshold is `threshold`.
    */
    #[inline]
    pub fn is_loggable(self, threshold: Level) -> bool {
        self >= threshold
    }

    /// Whether records may carry this level.
    #[inline]
    pub fn is_record_level(self) -> bool {
        !matches!(self, Level::All | Level::Off)
    }

    /**
    The single-letter code written into log lines.

    [Level::Info] is the common case and has an empty code.
    */
    pub const fn code(self) -> &'static str {
        match self {
            Level::All => "A",
            Level::Debug => "D",
            Level::Info => "",
            Level::Warning => "W",
            Level::Error => "E",
            Level::Off => "O",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Level::All => "all",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Error => "error",
            Level::Off => "off",
        }
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Level {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Level::All),
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warning" | "warn" => Ok(Level::Warning),
            "error" => Ok(Level::Error),
            "off" => Ok(Level::Off),
            _ => Err(LogError::InvalidLevel(s.to_string())),
        }
    }
}
