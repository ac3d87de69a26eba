//! Internal logging system for the culling engine
//!
//! This module provides a small pluggable logging layer:
//! - Customizable logger via the Logger trait
//! - Severity levels (Trace, Debug, Info, Warn, Error) with a global filter
//! - Colored console output by default
//! - File and line information for ERROR logs
//!
//! The active logger is process-wide and guarded by a RwLock. Culling itself
//! never blocks on it for longer than a single `Logger::log` call.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use colored::*;

/// Logger trait for custom logging implementations
///
/// # Example
///
/// ```no_run
/// use portal_culling::culling::log::{Logger, LogEntry};
///
/// struct FrameLogger;
///
/// impl Logger for FrameLogger {
///     fn log(&self, entry: &LogEntry) {
///         eprintln!("{}: {}", entry.source, entry.message);
///     }
/// }
///
/// portal_culling::culling::log::set_logger(FrameLogger);
/// ```
pub trait Logger: Send + Sync {
    /// Log an entry
    fn log(&self, entry: &LogEntry);
}

/// Log entry containing all information about a log message
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Severity level
    pub severity: LogSeverity,

    /// Timestamp when the log was created
    pub timestamp: SystemTime,

    /// Source module (e.g., "portal_culling::CellGraph")
    pub source: String,

    /// Log message
    pub message: String,

    /// Source file (only for ERROR logs)
    pub file: Option<&'static str>,

    /// Source line (only for ERROR logs)
    pub line: Option<u32>,
}

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    /// Per-step traversal details
    Trace,

    /// Development/debugging information
    Debug,

    /// Important informational messages (graph rebuilt, etc.)
    Info,

    /// Degraded behaviour (malformed cells, depth overflow)
    Warn,

    /// Errors returned to the caller
    Error,
}

impl LogSeverity {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => LogSeverity::Trace,
            1 => LogSeverity::Debug,
            2 => LogSeverity::Info,
            3 => LogSeverity::Warn,
            _ => LogSeverity::Error,
        }
    }
}

/// Default logger implementation using colored console output
///
/// Format:
/// - Normal: `[timestamp] [SEVERITY] [source] message`
/// - Error: `[timestamp] [ERROR] [source] message (file:line)`
pub struct DefaultLogger;

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let datetime: DateTime<Local> = entry.timestamp.into();
        let timestamp = datetime.format("%Y-%m-%d %H:%M:%S%.3f").to_string();

        let severity_str = match entry.severity {
            LogSeverity::Trace => "TRACE".bright_black(),
            LogSeverity::Debug => "DEBUG".cyan(),
            LogSeverity::Info => "INFO ".green(),
            LogSeverity::Warn => "WARN ".yellow(),
            LogSeverity::Error => "ERROR".red().bold(),
        };

        let source = entry.source.bright_blue();

        if let (Some(file), Some(line)) = (entry.file, entry.line) {
            println!(
                "[{}] [{}] [{}] {} ({}:{})",
                timestamp, severity_str, source, entry.message, file, line
            );
        } else {
            println!(
                "[{}] [{}] [{}] {}",
                timestamp, severity_str, source, entry.message
            );
        }
    }
}

// ===== GLOBAL LOGGER =====

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Minimum severity forwarded to the logger (Info by default)
static MIN_SEVERITY: AtomicU8 = AtomicU8::new(LogSeverity::Info as u8);

fn logger() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)))
}

/// Replace the active logger
pub fn set_logger<L: Logger + 'static>(new_logger: L) {
    if let Ok(mut lock) = logger().write() {
        *lock = Box::new(new_logger);
    }
}

/// Reset the active logger to DefaultLogger
pub fn reset_logger() {
    if let Ok(mut lock) = logger().write() {
        *lock = Box::new(DefaultLogger);
    }
}

/// Drop every entry below `severity`
pub fn set_min_severity(severity: LogSeverity) {
    MIN_SEVERITY.store(severity as u8, Ordering::Relaxed);
}

/// Current minimum severity
pub fn min_severity() -> LogSeverity {
    LogSeverity::from_u8(MIN_SEVERITY.load(Ordering::Relaxed))
}

/// Whether an entry of `severity` would reach the logger
pub fn enabled(severity: LogSeverity) -> bool {
    severity >= min_severity()
}

/// Logging entry point used by the cull_* macros
pub fn log(severity: LogSeverity, source: &str, message: String) {
    if !enabled(severity) {
        return;
    }
    if let Ok(lock) = logger().read() {
        lock.log(&LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: None,
            line: None,
        });
    }
}

/// Logging entry point with file:line information (used by cull_error!)
pub fn log_detailed(
    severity: LogSeverity,
    source: &str,
    message: String,
    file: &'static str,
    line: u32,
) {
    if !enabled(severity) {
        return;
    }
    if let Ok(lock) = logger().read() {
        lock.log(&LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: Some(file),
            line: Some(line),
        });
    }
}

// ===== LOGGING MACROS =====

/// Log a TRACE message
#[macro_export]
macro_rules! cull_trace {
    ($source:expr, $($arg:tt)*) => {
        if $crate::log::enabled($crate::log::LogSeverity::Trace) {
            $crate::log::log(
                $crate::log::LogSeverity::Trace,
                $source,
                format!($($arg)*)
            )
        }
    };
}

/// Log a DEBUG message
#[macro_export]
macro_rules! cull_debug {
    ($source:expr, $($arg:tt)*) => {
        if $crate::log::enabled($crate::log::LogSeverity::Debug) {
            $crate::log::log(
                $crate::log::LogSeverity::Debug,
                $source,
                format!($($arg)*)
            )
        }
    };
}

/// Log an INFO message
///
/// # Example
///
/// ```no_run
/// portal_culling::cull_info!("portal_culling::CellGraph", "Built {} cells", 12);
/// ```
#[macro_export]
macro_rules! cull_info {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log(
            $crate::log::LogSeverity::Info,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a WARN message
#[macro_export]
macro_rules! cull_warn {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log(
            $crate::log::LogSeverity::Warn,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an ERROR message with file:line information
#[macro_export]
macro_rules! cull_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log_detailed(
            $crate::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
