//! Leveled logging macros for library code.
//!
//! With the `logging` feature every macro becomes a `tracing` event at its
//! level. Without it the arguments are dropped at expansion time, so field
//! expressions are never evaluated.
//!
//! ```rust,ignore
//! use crate::logging::{debug, warn};
//!
//! debug!(properties = collection.len(), "flattening collection");
//! warn!(property = name, error = %err, "restore aborted");
//! ```

#[cfg(feature = "logging")]
macro_rules! event {
    ($level:ident, $($arg:tt)*) => {
        tracing::event!(tracing::Level::$level, $($arg)*)
    };
}

#[cfg(not(feature = "logging"))]
macro_rules! event {
    ($($arg:tt)*) => {};
}

/// Per-property details.
macro_rules! log_trace {
    ($($arg:tt)*) => { $crate::logging::event!(TRACE, $($arg)*) };
}

/// Operation summaries.
macro_rules! log_debug {
    ($($arg:tt)*) => { $crate::logging::event!(DEBUG, $($arg)*) };
}

/// Row store lifecycle.
#[cfg(feature = "kv")]
macro_rules! log_info {
    ($($arg:tt)*) => { $crate::logging::event!(INFO, $($arg)*) };
}

/// Rejected input that is about to propagate as an error.
macro_rules! log_warn {
    ($($arg:tt)*) => { $crate::logging::event!(WARN, $($arg)*) };
}

pub(crate) use event;

pub(crate) use log_debug as debug;
#[cfg(feature = "kv")]
pub(crate) use log_info as info;
pub(crate) use log_trace as trace;
pub(crate) use log_warn as warn;
