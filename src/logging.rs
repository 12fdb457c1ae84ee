//! Logging abstraction
//!
//! The store never writes to a global logger. A [`Logger`] is injected into
//! each [`StoreManager`](crate::store::StoreManager) and every message passes
//! through a level gate first:
//! - [`NoopLogger`]: default, discards everything
//! - [`DefmtLogger`] (`defmt` feature): forwards to defmt on embedded targets
//! - any user type implementing [`Logger`] (host tests collect messages)
//!
//! Store operations behave identically whichever logger is attached.

use core::fmt;

/// Log level
///
/// Ordered from least to most verbose. A manager configured with level `L`
/// emits messages whose level is `<= L`, and nothing at all when `L` is
/// [`LogLevel::Quiet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    /// No output
    #[default]
    Quiet,
    /// Warnings about degraded state (invalid size, invalid magic)
    Default,
    /// Lifecycle events (init, validate, wipe)
    Info,
    /// Byte-level tracing of every field access
    Debug,
}

impl LogLevel {
    /// Convert a raw level number
    ///
    /// Out-of-range values select [`LogLevel::Default`].
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => LogLevel::Quiet,
            1 => LogLevel::Default,
            2 => LogLevel::Info,
            3 => LogLevel::Debug,
            _ => LogLevel::Default,
        }
    }

    /// Whether a message at `message` level passes this gate
    pub fn enables(self, message: LogLevel) -> bool {
        self != LogLevel::Quiet && message != LogLevel::Quiet && message <= self
    }
}

/// Line-oriented leveled log sink
pub trait Logger {
    /// Emit one message
    fn log(&self, level: LogLevel, args: fmt::Arguments<'_>);
}

impl<L: Logger + ?Sized> Logger for &L {
    fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        (**self).log(level, args)
    }
}

/// Logger that discards every message
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn log(&self, _level: LogLevel, _args: fmt::Arguments<'_>) {}
}

/// Logger forwarding to defmt
#[cfg(feature = "defmt")]
#[derive(Debug, Clone, Copy, Default)]
pub struct DefmtLogger;

#[cfg(feature = "defmt")]
impl Logger for DefmtLogger {
    fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        let message = defmt::Display2Format(&args);
        match level {
            LogLevel::Quiet => {}
            LogLevel::Default => defmt::warn!("{}", message),
            LogLevel::Info => defmt::info!("{}", message),
            LogLevel::Debug => defmt::debug!("{}", message),
        }
    }
}

/// Log lifecycle message through a store's gated logger
macro_rules! log_info {
    ($store:expr, $($arg:tt)*) => {
        $store.emit($crate::logging::LogLevel::Info, format_args!($($arg)*))
    };
}

/// Log degraded-state warning through a store's gated logger
macro_rules! log_warn {
    ($store:expr, $($arg:tt)*) => {
        $store.emit($crate::logging::LogLevel::Default, format_args!($($arg)*))
    };
}

/// Log byte-level trace through a store's gated logger
macro_rules! log_debug {
    ($store:expr, $($arg:tt)*) => {
        $store.emit($crate::logging::LogLevel::Debug, format_args!($($arg)*))
    };
}

pub(crate) use log_debug;
pub(crate) use log_info;
pub(crate) use log_warn;
