//! # Rust Log Router
//!
//! A structured logging facade: records go through one [`Logger`] and are
//! fanned out to named transports, each with its own settings for
//! enablement, source filtering, colour, timestamps and location.
//!
//! ## Features
//!
//! - **Named Transports**: Console, daily file, and any `io::Write` sink
//! - **Per-Transport Settings**: Whitelist/blacklist filtering, colour, timestamp patterns
//! - **Deterministic Formatting**: Fixed-width columns measured on visible width
//! - **Plugins**: Adapters that turn foreign events (e.g. HTTP exchanges) into records
//! - **`log` Bridge**: Route the `log` crate facade through the same transports
//!
//! ## Example
//!
//! ```
//! use rust_log_router::prelude::*;
//!
//! let logger = Logger::new();
//! logger.configure(Scope::All, SettingsCommand::EnableUtc).unwrap();
//! logger.info("App", "Service started").unwrap();
//! ```

pub mod bridge;
pub mod core;
pub mod macros;
pub mod plugins;
pub mod transports;

pub mod prelude {
    pub use crate::bridge::LogBridge;
    pub use crate::core::{
        Fault, Logger, LoggerBuilder, LoggerError, Message, Record, RecordDraft, Result, Scope,
        Settings, SettingsCommand, SettingsSource, Severity, SourceControl, Transport,
        TransportCore,
    };
    pub use crate::plugins::{HttpExchange, HttpPlugin, Plugin, PluginAdapter};
    #[cfg(feature = "file")]
    pub use crate::transports::FileTransport;
    pub use crate::transports::{ConsoleTransport, SharedBuffer, WriterTransport};
}

pub use bridge::LogBridge;
pub use core::{
    Fault, Formatter, ImportedConfig, Logger, LoggerBuilder, LoggerError, Message, Record,
    RecordDraft, Result, Scope, Settings, SettingsCommand, SettingsSource, Severity,
    SourceControl, Transport, TransportCore, DEFAULT_NAMESPACE,
};
pub use plugins::{HttpExchange, HttpPlugin, Plugin, PluginAdapter};
#[cfg(feature = "file")]
pub use transports::FileTransport;
pub use transports::{ConsoleTransport, SharedBuffer, WriterTransport};
