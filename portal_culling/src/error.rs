//! Error types for the culling engine
//!
//! Culling is an optimization: nothing in the per-frame path returns an
//! error. Errors are reserved for API misuse (bad configuration, unknown
//! keys, culling before a graph exists) and for level input that cannot be
//! turned into a graph at all.

use std::fmt;

/// Result type for culling operations
pub type Result<T> = std::result::Result<T, Error>;

/// Culling engine errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration values out of range
    InvalidConfig(String),

    /// Level description that cannot produce a cell graph
    InvalidLevel(String),

    /// Renderable, light or cell key that does not exist
    InvalidKey(String),

    /// Operation requires a built cell graph
    NotInitialized(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
            Error::InvalidLevel(msg) => write!(f, "Invalid level: {}", msg),
            Error::InvalidKey(msg) => write!(f, "Invalid key: {}", msg),
            Error::NotInitialized(msg) => write!(f, "Not initialized: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Log an error at ERROR severity and build the matching `Error`.
///
/// ```ignore
/// return Err(cull_err!(InvalidConfig, "portal_culling::Config", "depth {} too small", d));
/// ```
#[macro_export]
macro_rules! cull_err {
    ($kind:ident, $source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::cull_error!($source, "{}", message);
        $crate::error::Error::$kind(message)
    }};
}

/// Log an error and return it from the enclosing function.
#[macro_export]
macro_rules! cull_bail {
    ($kind:ident, $source:expr, $($arg:tt)*) => {
        return Err($crate::cull_err!($kind, $source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
