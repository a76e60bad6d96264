//SPDX-License-Identifier: MIT OR Apache-2.0
/*!
# logshelf

logshelf gives every component of a program its own logger, and every logger its own
size-limited log file.

# Development status

logshelf is experimental and the API may change.

# The problem

A long-running program (a device app, a daemon) wants to keep a few days of logs on
disk without ever filling the disk. Logs of one noisy component should not push out
the logs of another, and a support engineer should be able to grab "the network log
from yesterday" without grepping through everything.

# The model

* A **logger identity** is a type implementing [LogIdentity]. Its tag names its
  records and its file.
* The [Registry] keeps at most one logger per identity, owns the log directory and
  the global [Level], and guarantees at most one open file per identity.
* A logger can print to the console, write to a [FilePublisher], or both. A file
  lives at `<log dir>/<yyyyMMdd>/<tag>.log` and is deleted and started over when it
  grows past its byte limit.
* Old days are removed with [Registry::delete_log_file_keeping].

# The API

```rust
use logshelf::{Level, LogIdentity, Logger};

struct Network;

impl LogIdentity for Network {
    fn on_create(logger: &Logger) {
        logger.enable_file_log_mb(1);
    }
}

let dir = tempfile::tempdir().unwrap();
logshelf::open(dir.path(), Level::Info, true);

let log = logshelf::get::<Network>();
log.info("connected");
log.debug("filtered out at Info");
logshelf::log_warning!(Network, "retrying in {}s", 5);

logshelf::global().delete_log_file_keeping(7).unwrap();
```

# Line format

File lines look like

```text
20261019 14:03:07.412 connected
20261019 14:03:07.412.1[W] retrying in 5s
20261019 14:03:07.415[E,3] worker failed
```

The timestamp is local time. A `.n` suffix orders records from different loggers
within one millisecond. The bracket holds the level code, omitted for `Info`, and the
thread id when the record was not logged from the thread that opened the registry.
See [DefaultFormatter].

# Multithreading

Everything is `Send + Sync`. Logging does not take the registry lock; records from
one logger are written in the order their threads reach the file.

# Diagnostics

The crate's own bookkeeping can be printed to the console with
[LogConfig::with_diagnostics], the `LOGSHELF_DIAGNOSTICS` environment variable, or
the `diagnostics` feature.
*/

mod config;
mod console;
mod diagnostics;
mod error;
mod file_publisher;
mod formatter;
mod generator;
mod identity;
mod inmemory_console;
mod level;
mod log_record;
mod logger;
mod macros;
mod publisher;
mod registry;
pub mod retention;
mod spinlock;
mod sys;

pub use config::{ENV_CONSOLE, ENV_DIAGNOSTICS, ENV_LEVEL, LogConfig};
pub use console::{Console, ConsolePublisher, Severity, StdErrorConsole};
pub use error::{LogError, Result};
pub use file_publisher::FilePublisher;
pub use formatter::{DefaultFormatter, Formatter, fallback_line};
pub use identity::{DefaultLogger, LogIdentity};
pub use inmemory_console::{ConsoleLine, InMemoryConsole};
pub use level::Level;
pub use log_record::{CalendarFields, LogRecord};
pub use logger::Logger;
pub use publisher::Publisher;
pub use registry::{DEBUG_TAG, Registry, get, global, open};
