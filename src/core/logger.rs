//! Main logger implementation
//!
//! The [`Logger`] owns an ordered registry of named transports and plugins.
//! Every record is fanned out synchronously to the transports in
//! registration order; nothing is queued.

use super::{
    command::{Scope, SettingsCommand},
    error::{LoggerError, Result},
    error_hub::{ErrorHandler, ErrorHub},
    record::{Fault, Message, Record, RecordDraft},
    settings::{Settings, SettingsSource},
    severity::Severity,
    transport::Transport,
};
use crate::plugins::Plugin;
use crate::transports::ConsoleTransport;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Name under which the default console transport is registered
pub const DEFAULT_CONSOLE: &str = "console";

/// Source of the warnings the logger emits about malformed calls
pub const LOGGER_SOURCE: &str = "Logger";

const STRUCTURED_SEVERITY_WARNING: &str =
    "An object was passed as the severity, support for this is currently unavailable!";

struct TransportEntry {
    name: String,
    transport: Box<dyn Transport>,
}

struct PluginEntry {
    name: String,
    plugin: Plugin,
}

type TransportRegistry = Arc<RwLock<Vec<TransportEntry>>>;

/// Deliver `record` to every transport subscribed to its namespace
///
/// Sink failures are reported once the registry lock is released, so error
/// handlers may log through the same logger.
fn fan_out(transports: &RwLock<Vec<TransportEntry>>, record: &Record) -> Result<()> {
    let mut failures: Vec<(ErrorHub, LoggerError)> = Vec::new();
    {
        let mut entries = transports.write();
        let mut handled = false;

        for entry in entries.iter_mut() {
            if entry.transport.accepts_namespace(&record.namespace) {
                handled = true;
                if let Err(err) = entry.transport.deliver(record) {
                    failures.push((entry.transport.core().errors().clone(), err));
                }
            }
        }

        if !handled {
            return Err(LoggerError::namespace_not_handled(record.namespace.clone()));
        }
    }

    for (errors, err) in failures {
        match err {
            LoggerError::OutputNotOverridden { .. } => return Err(err),
            err => errors.emit(err)?,
        }
    }
    Ok(())
}

/// Host name used as the default location
fn host_name() -> String {
    ["HOSTNAME", "COMPUTERNAME"]
        .iter()
        .find_map(|key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()))
        .or_else(|| {
            std::fs::read_to_string("/etc/hostname")
                .ok()
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
        })
        .unwrap_or_else(|| "localhost".to_string())
}

fn describe(value: Option<String>) -> String {
    value.unwrap_or_else(|| "undefined".to_string())
}

/// Record dispatcher
///
/// Clones share the same registries, location and error handlers.
///
/// Error handlers run synchronously, after the transport registry has been
/// released.
#[derive(Clone)]
pub struct Logger {
    id: Uuid,
    location: Arc<RwLock<String>>,
    transports: TransportRegistry,
    plugins: Arc<RwLock<Vec<PluginEntry>>>,
    errors: ErrorHub,
}

impl Logger {
    /// Create a logger with an enabled console transport named `"console"`
    #[must_use]
    pub fn new() -> Self {
        let logger = Self::bare(host_name());
        logger.transports.write().push(TransportEntry {
            name: DEFAULT_CONSOLE.to_string(),
            transport: Box::new(ConsoleTransport::new()),
        });
        logger.link_transport(DEFAULT_CONSOLE);
        logger
    }

    fn bare(location: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            location: Arc::new(RwLock::new(location)),
            transports: Arc::new(RwLock::new(Vec::new())),
            plugins: Arc::new(RwLock::new(Vec::new())),
            errors: ErrorHub::new(),
        }
    }

    fn link_transport(&self, name: &str) {
        let entries = self.transports.read();
        if let Some(entry) = entries.iter().find(|entry| entry.name == name) {
            entry.transport.core().errors().link(&self.errors);
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn location(&self) -> String {
        self.location.read().clone()
    }

    pub fn set_location(&self, location: impl Into<String>) -> &Self {
        *self.location.write() = location.into();
        self
    }

    // Transport registry

    /// Register a transport under a unique, non-empty name
    ///
    /// The transport's error handlers forward to this logger's.
    pub fn add_transport<T>(&self, name: impl Into<String>, transport: T) -> Result<()>
    where
        T: Transport + 'static,
    {
        self.add_boxed_transport(name, Box::new(transport))
    }

    pub fn add_boxed_transport(
        &self,
        name: impl Into<String>,
        transport: Box<dyn Transport>,
    ) -> Result<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(LoggerError::invalid_argument(
                "add_transport",
                "transport name must not be empty",
            ));
        }

        let mut entries = self.transports.write();
        if entries.iter().any(|entry| entry.name == name) {
            return Err(LoggerError::duplicate_transport(name));
        }
        transport.core().errors().link(&self.errors);
        entries.push(TransportEntry { name, transport });
        Ok(())
    }

    /// Unregister a transport and hand it back
    pub fn remove_transport(&self, name: &str) -> Result<Box<dyn Transport>> {
        let mut entries = self.transports.write();
        let index = entries
            .iter()
            .position(|entry| entry.name == name)
            .ok_or_else(|| LoggerError::transport_not_found(name))?;
        let entry = entries.remove(index);
        entry.transport.core().errors().unlink(&self.errors);
        Ok(entry.transport)
    }

    pub fn has_transport(&self, name: &str) -> bool {
        self.transports.read().iter().any(|entry| entry.name == name)
    }

    /// Names in registration order
    pub fn transport_names(&self) -> Vec<String> {
        self.transports
            .read()
            .iter()
            .map(|entry| entry.name.clone())
            .collect()
    }

    /// Run `f` against one registered transport
    pub fn with_transport<R>(&self, name: &str, f: impl FnOnce(&mut dyn Transport) -> R) -> Result<R> {
        let mut entries = self.transports.write();
        let entry = entries
            .iter_mut()
            .find(|entry| entry.name == name)
            .ok_or_else(|| LoggerError::transport_not_found(name))?;
        Ok(f(entry.transport.as_mut()))
    }

    /// Apply a settings command to one named transport or to all of them
    ///
    /// An all-transport command whose value is rejected leaves every
    /// transport untouched.
    pub fn configure(&self, scope: impl Into<Scope>, command: SettingsCommand) -> Result<()> {
        let mut entries = self.transports.write();
        match scope.into() {
            Scope::Named(name) => {
                let entry = entries
                    .iter_mut()
                    .find(|entry| entry.name == name)
                    .ok_or_else(|| LoggerError::transport_not_found(name.as_str()))?;
                entry.transport.configure(&command)
            }
            Scope::All => {
                if command.is_value_checked() {
                    command.apply(&mut Settings::new())?;
                }
                for entry in entries.iter_mut() {
                    entry.transport.configure(&command)?;
                }
                Ok(())
            }
        }
    }

    /// Read a value from the settings of every transport in scope
    pub fn read_settings<T>(
        &self,
        scope: impl Into<Scope>,
        f: impl Fn(&Settings) -> T,
    ) -> Result<Vec<(String, T)>> {
        let scope = scope.into();
        let entries = self.transports.read();
        if let Scope::Named(name) = &scope {
            if !entries.iter().any(|entry| &entry.name == name) {
                return Err(LoggerError::transport_not_found(name.as_str()));
            }
        }
        Ok(entries
            .iter()
            .filter(|entry| scope.includes(&entry.name))
            .map(|entry| (entry.name.clone(), f(entry.transport.settings())))
            .collect())
    }

    pub fn enable_transport(&self, name: &str) -> Result<()> {
        self.configure(name, SettingsCommand::Enable)
    }

    pub fn disable_transport(&self, name: &str) -> Result<()> {
        self.configure(name, SettingsCommand::Disable)
    }

    /// Whether every transport in scope is enabled
    pub fn transport_enabled(&self, scope: impl Into<Scope>) -> Result<bool> {
        Ok(self
            .read_settings(scope, Settings::is_enabled)?
            .into_iter()
            .all(|(_, enabled)| enabled))
    }

    pub fn import_settings(
        &self,
        scope: impl Into<Scope>,
        source: impl Into<SettingsSource>,
    ) -> Result<()> {
        self.configure(scope, SettingsCommand::Import(source.into()))
    }

    /// Whether every transport in scope has valid settings
    pub fn is_valid(&self, scope: impl Into<Scope>) -> Result<bool> {
        Ok(self
            .read_settings(scope, Settings::is_valid)?
            .into_iter()
            .all(|(_, valid)| valid))
    }

    pub fn clean(&self, scope: impl Into<Scope>) -> Result<()> {
        self.configure(scope, SettingsCommand::Clean)
    }

    /// Restrict a transport to records of the given namespace
    pub fn subscribe_namespace(&self, name: &str, namespace: &str) -> Result<()> {
        self.with_transport(name, |transport| transport.subscribe(namespace))
    }

    pub fn flush(&self) -> Result<()> {
        let mut entries = self.transports.write();
        for entry in entries.iter_mut() {
            entry.transport.flush()?;
        }
        Ok(())
    }

    // Logging

    /// Log a record stamped with the current time and default namespace
    pub fn log(
        &self,
        severity: impl Into<Severity>,
        source: impl Into<String>,
        message: impl Into<Message>,
    ) -> Result<()> {
        self.dispatch(Record::new(severity, source, message))
    }

    /// Log with an explicit timestamp and/or namespace
    pub fn log_at(
        &self,
        severity: impl Into<Severity>,
        source: impl Into<String>,
        message: impl Into<Message>,
        timestamp: Option<DateTime<Utc>>,
        namespace: Option<&str>,
    ) -> Result<()> {
        let mut record = Record::new(severity, source, message);
        if let Some(timestamp) = timestamp {
            record.timestamp = timestamp;
        }
        if let Some(namespace) = namespace {
            record.namespace = namespace.to_string();
        }
        self.dispatch(record)
    }

    /// Log a loosely typed draft
    ///
    /// A structured severity or a missing required field is not an error:
    /// a single warning describing the problem is logged instead.
    pub fn submit(&self, draft: RecordDraft) -> Result<()> {
        if draft.has_structured_severity() {
            return self.warning(LOGGER_SOURCE, STRUCTURED_SEVERITY_WARNING);
        }

        if !draft.missing_fields().is_empty() {
            let severity = draft.severity.as_ref().and_then(|value| match value {
                Value::Null => None,
                Value::String(label) => Some(label.clone()),
                other => Some(other.to_string()),
            });
            let message = format!(
                "Check syntax, something was undefined - Severity: {} Source: {} Message: {}",
                describe(severity),
                describe(draft.source),
                describe(draft.message.map(|message| message.render()))
            );
            return self.warning(LOGGER_SOURCE, message);
        }

        self.dispatch(draft.build()?)
    }

    /// Log only the severity, source, message and timestamp of a draft
    pub fn direct(&self, draft: RecordDraft) -> Result<()> {
        self.submit(RecordDraft {
            severity: draft.severity,
            source: draft.source,
            message: draft.message,
            timestamp: draft.timestamp,
            ..RecordDraft::default()
        })
    }

    /// Fan a finished record out to the transports
    ///
    /// Fails with [`LoggerError::NamespaceNotHandled`] when no transport
    /// subscribes to the record's namespace.
    /// The record's location is always this logger's location.
    pub fn dispatch(&self, mut record: Record) -> Result<()> {
        record.location = Some(self.location());
        fan_out(&self.transports, &record)
    }

    pub fn info(&self, source: impl Into<String>, message: impl Into<Message>) -> Result<()> {
        self.log(Severity::Info, source, message)
    }

    pub fn transport(&self, source: impl Into<String>, message: impl Into<Message>) -> Result<()> {
        self.log(Severity::Transport, source, message)
    }

    pub fn debug(&self, source: impl Into<String>, message: impl Into<Message>) -> Result<()> {
        self.log(Severity::Debug, source, message)
    }

    pub fn success(&self, source: impl Into<String>, message: impl Into<Message>) -> Result<()> {
        self.log(Severity::Success, source, message)
    }

    pub fn warning(&self, source: impl Into<String>, message: impl Into<Message>) -> Result<()> {
        self.log(Severity::Warning, source, message)
    }

    pub fn warn(&self, source: impl Into<String>, message: impl Into<Message>) -> Result<()> {
        self.warning(source, message)
    }

    pub fn error(&self, source: impl Into<String>, message: impl Into<Message>) -> Result<()> {
        self.log(Severity::Error, source, message)
    }

    /// Log an error at error severity with its message as the text
    pub fn trace(&self, source: impl Into<String>, fault: &Fault) -> Result<()> {
        self.dispatch(Record::new(Severity::Error, source, fault.message()).with_error(fault.clone()))
    }

    pub fn trace_error<E>(&self, source: impl Into<String>, error: E) -> Result<()>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.trace(source, &Fault::from_error(error))
    }

    /// Trace a loosely typed value; anything but an error object is rejected
    pub fn trace_value(&self, source: impl Into<String>, value: &Value) -> Result<()> {
        let fault = Fault::from_value(value)?;
        self.trace(source, &fault)
    }

    /// Hand an error straight to the error handlers
    ///
    /// With no handler registered the error comes back to the caller.
    pub fn fatal(&self, fault: Fault) -> Result<()> {
        self.errors.emit(LoggerError::Escalated(fault))
    }

    pub fn fatal_error<E>(&self, error: E) -> Result<()>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.fatal(Fault::from_error(error))
    }

    /// Escalate a loosely typed value; anything but an error object is
    /// rejected before any handler runs
    pub fn fatal_value(&self, value: &Value) -> Result<()> {
        self.fatal(Fault::from_value(value)?)
    }

    // Error handlers

    pub fn on_error<F>(&self, handler: F)
    where
        F: Fn(&LoggerError) + Send + Sync + 'static,
    {
        self.errors.subscribe(handler);
    }

    pub fn errors(&self) -> &ErrorHub {
        &self.errors
    }

    // Plugins

    /// Register a plugin; its records are fanned out like [`Logger::log`]
    /// calls and its errors reach this logger's handlers
    ///
    /// A plugin already registered under `name` is replaced.
    pub fn add_plugin(&self, name: impl Into<String>, plugin: &Plugin) -> Result<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(LoggerError::invalid_argument(
                "add_plugin",
                "plugin name must not be empty",
            ));
        }
        if self.plugins.read().iter().any(|entry| entry.name == name) {
            self.remove_plugin(&name)?;
        }

        let transports = Arc::clone(&self.transports);
        let location = Arc::clone(&self.location);
        plugin.attach(self.id, move |record: &Record| {
            let mut record = record.clone();
            record.location = Some(location.read().clone());
            fan_out(&transports, &record)
        });
        plugin.errors().link(&self.errors);

        self.plugins.write().push(PluginEntry {
            name,
            plugin: plugin.clone(),
        });
        Ok(())
    }

    /// Unregister a plugin and detach this logger from it
    pub fn remove_plugin(&self, name: &str) -> Result<Plugin> {
        let mut plugins = self.plugins.write();
        let index = plugins
            .iter()
            .position(|entry| entry.name == name)
            .ok_or_else(|| LoggerError::plugin_not_found(name))?;
        let entry = plugins.remove(index);
        entry.plugin.detach(self.id);
        entry.plugin.errors().unlink(&self.errors);
        Ok(entry.plugin)
    }

    pub fn plugin(&self, name: &str) -> Result<Plugin> {
        self.plugins
            .read()
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.plugin.clone())
            .ok_or_else(|| LoggerError::plugin_not_found(name))
    }

    pub fn plugin_names(&self) -> Vec<String> {
        self.plugins
            .read()
            .iter()
            .map(|entry| entry.name.clone())
            .collect()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("id", &self.id)
            .field("location", &self.location())
            .field("transports", &self.transport_names())
            .field("plugins", &self.plugin_names())
            .finish()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_log_router::prelude::*;
///
/// let logger = Logger::builder()
///     .location("build-agent")
///     .without_default_console()
///     .transport("memory", WriterTransport::new(SharedBuffer::new()))
///     .on_error(|err| eprintln!("logging failed: {}", err))
///     .build()
///     .unwrap();
///
/// assert_eq!(logger.transport_names(), vec!["memory"]);
/// ```
pub struct LoggerBuilder {
    location: Option<String>,
    default_console: bool,
    transports: Vec<(String, Box<dyn Transport>)>,
    plugins: Vec<(String, Plugin)>,
    error_handlers: Vec<ErrorHandler>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            location: None,
            default_console: true,
            transports: Vec::new(),
            plugins: Vec::new(),
            error_handlers: Vec::new(),
        }
    }

    /// Override the host-derived location
    #[must_use = "builder methods return a new value"]
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Skip the default console transport
    #[must_use = "builder methods return a new value"]
    pub fn without_default_console(mut self) -> Self {
        self.default_console = false;
        self
    }

    /// Add a named transport
    #[must_use = "builder methods return a new value"]
    pub fn transport<T: Transport + 'static>(mut self, name: impl Into<String>, transport: T) -> Self {
        self.transports.push((name.into(), Box::new(transport)));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn plugin(mut self, name: impl Into<String>, plugin: &Plugin) -> Self {
        self.plugins.push((name.into(), plugin.clone()));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn on_error<F>(mut self, handler: F) -> Self
    where
        F: Fn(&LoggerError) + Send + Sync + 'static,
    {
        self.error_handlers.push(Arc::new(handler));
        self
    }

    /// Build the Logger
    ///
    /// Fails on duplicate or empty transport names.
    pub fn build(self) -> Result<Logger> {
        let logger = if self.default_console {
            Logger::new()
        } else {
            Logger::bare(host_name())
        };
        if let Some(location) = self.location {
            logger.set_location(location);
        }

        for handler in self.error_handlers {
            logger.on_error(move |err| handler(err));
        }
        for (name, transport) in self.transports {
            logger.add_boxed_transport(name, transport)?;
        }
        for (name, plugin) in self.plugins {
            logger.add_plugin(name, &plugin)?;
        }

        Ok(logger)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}
