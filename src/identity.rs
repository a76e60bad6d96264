// SPDX-License-Identifier: MIT OR Apache-2.0

//! Logger identities.
//!
//! An identity is a type. The registry keeps at most one live logger per identity
//! type, and the identity's tag names both the records it produces and its log file
//! (`<tag>.log`).

use crate::logger::Logger;

/**
Declares a type as a logger identity.

```rust
use logshelf::{LogIdentity, Logger};

struct Network;

impl LogIdentity for Network {
    fn on_create(logger: &Logger) {
        // keep up to 5 MiB of network logs
        logger.enable_file_log_mb(5);
    }
}
```
*/
pub trait LogIdentity: 'static {
    /**
    The tag used in records and as the log file stem.

    Defaults to the type's name without its module path or generic arguments.
    Tags must be non-empty, must not contain path separators and must not be `.` or `..`.
    */
    fn tag() -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }

    /**
    Runs once each time the registry creates a logger for this identity.

    Called without any registry lock held, so it may call back into the registry,
    for example to enable file logging.
    */
    fn on_create(logger: &Logger) {
        let _ = logger;
    }
}

/// `a::b::Name<c::D>` → `Name`
pub(crate) fn short_type_name(full: &'static str) -> &'static str {
    let base = match full.find('<') {
        Some(generic) => &full[..generic],
        None => full,
    };
    match base.rfind("::") {
        Some(sep) => &base[sep + 2..],
        None => base,
    }
}

pub(crate) fn is_valid_tag(tag: &str) -> bool {
    !tag.is_empty() && tag != "." && tag != ".." && !tag.contains(['/', '\\', '\0'])
}

/**
The identity used when a caller has no reason to declare its own.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DefaultLogger;

impl LogIdentity for DefaultLogger {
    fn tag() -> &'static str {
        "default"
    }
}
