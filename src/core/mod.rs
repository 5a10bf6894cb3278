//! Core logger types and traits

pub mod command;
pub mod config;
pub mod error;
pub mod error_hub;
pub mod format;
pub mod logger;
pub mod record;
pub mod settings;
pub mod severity;
pub mod timestamp;
pub mod transport;

pub use command::{Scope, SettingsCommand};
pub use config::ImportedConfig;
pub use error::{LoggerError, Result};
pub use error_hub::{ErrorHandler, ErrorHub};
pub use format::{format_record, Formatter};
pub use logger::{Logger, LoggerBuilder, DEFAULT_CONSOLE, LOGGER_SOURCE};
pub use record::{Fault, Message, Record, RecordDraft, DEFAULT_NAMESPACE, UNDEFINED_SOURCE};
pub use settings::{
    ColourSettings, LocationSettings, Settings, SettingsSource, SeverityFlags, SourceControl,
    SourceSettings, TimestampSettings,
};
pub use severity::Severity;
pub use timestamp::{format_timestamp, TimestampPattern, DEFAULT_TIMESTAMP_FORMAT};
pub use transport::{Transport, TransportCore};
