//! Logging macros for ergonomic log message formatting.
//!
//! These macros take a logger, a source and `format!`-style arguments and
//! return the logger's `Result`.
//!
//! # Examples
//!
//! ```
//! use rust_log_router::prelude::*;
//! use rust_log_router::info;
//!
//! let logger = Logger::new();
//!
//! // Basic logging
//! info!(logger, "Server", "Server started").unwrap();
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server", "Listening on port {}", port).unwrap();
//! ```

/// Log a formatted message at any severity.
///
/// # Examples
///
/// ```
/// # use rust_log_router::prelude::*;
/// # let logger = Logger::new();
/// use rust_log_router::log;
/// log!(logger, Severity::Info, "Tests", "Simple message").unwrap();
/// log!(logger, "notice", "Tests", "Code: {}", 500).unwrap();
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $severity:expr, $source:expr, $($arg:tt)+) => {
        $logger.log($severity, $source, format!($($arg)+))
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $source:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Debug, $source, $($arg)+)
    };
}

/// Log a transport-level message.
#[macro_export]
macro_rules! transport {
    ($logger:expr, $source:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Transport, $source, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use rust_log_router::prelude::*;
/// # let logger = Logger::new();
/// use rust_log_router::info;
/// info!(logger, "App", "Processing {} items", 100).unwrap();
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $source:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Info, $source, $($arg)+)
    };
}

/// Log a success-level message.
#[macro_export]
macro_rules! success {
    ($logger:expr, $source:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Success, $source, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use rust_log_router::prelude::*;
/// # let logger = Logger::new();
/// use rust_log_router::warning;
/// warning!(logger, "Disk", "Retry attempt {} of {}", 3, 5).unwrap();
/// ```
#[macro_export]
macro_rules! warning {
    ($logger:expr, $source:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Warning, $source, $($arg)+)
    };
}

/// Alias of [`warning!`].
#[macro_export]
macro_rules! warn {
    ($logger:expr, $source:expr, $($arg:tt)+) => {
        $crate::warning!($logger, $source, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $source:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Error, $source, $($arg)+)
    };
}
