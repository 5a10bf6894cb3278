//! Plugin capability: foreign event sources feeding the dispatch path

use crate::core::{
    ErrorHub, LoggerError, Message, Record, RecordDraft, Result, Severity, DEFAULT_NAMESPACE,
};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Receives every record a plugin produces
pub type Listener = Arc<dyn Fn(&Record) -> Result<()> + Send + Sync>;

struct PluginState {
    namespace: String,
    listeners: Vec<(Uuid, Listener)>,
}

/// Shared plugin handle
///
/// Clones refer to the same namespace, listeners and error handlers. Records
/// produced through [`Plugin::log`] or [`Plugin::submit`] are stamped with the
/// plugin's namespace and handed to every attached listener; a logger attaches
/// itself as a listener in [`crate::Logger::add_plugin`].
#[derive(Clone)]
pub struct Plugin {
    state: Arc<RwLock<PluginState>>,
    errors: ErrorHub,
}

impl Plugin {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(PluginState {
                namespace: DEFAULT_NAMESPACE.to_string(),
                listeners: Vec::new(),
            })),
            errors: ErrorHub::new(),
        }
    }

    pub fn namespace(&self) -> String {
        self.state.read().namespace.clone()
    }

    pub fn set_namespace(&self, namespace: impl Into<String>) -> &Self {
        self.state.write().namespace = namespace.into();
        self
    }

    /// Attach a listener under `key`, replacing any listener with the same key
    pub fn attach<F>(&self, key: Uuid, listener: F)
    where
        F: Fn(&Record) -> Result<()> + Send + Sync + 'static,
    {
        let mut state = self.state.write();
        state.listeners.retain(|(id, _)| *id != key);
        state.listeners.push((key, Arc::new(listener)));
    }

    pub fn detach(&self, key: Uuid) -> bool {
        let mut state = self.state.write();
        let before = state.listeners.len();
        state.listeners.retain(|(id, _)| *id != key);
        state.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.state.read().listeners.len()
    }

    /// Log a record in this plugin's namespace
    pub fn log(
        &self,
        severity: impl Into<Severity>,
        source: impl Into<String>,
        message: impl Into<Message>,
    ) -> Result<()> {
        self.submit(
            RecordDraft::new()
                .severity(severity)
                .source(source)
                .message(message),
        )
    }

    /// Complete a draft, stamp the namespace and hand it to the listeners
    ///
    /// Fails with [`LoggerError::MissingParameters`] before any listener
    /// runs if a required field is absent.
    pub fn submit(&self, draft: RecordDraft) -> Result<()> {
        let record = draft.namespace(self.namespace()).build()?;
        self.emit(&record)
    }

    /// Hand a finished record to every listener in attach order
    pub fn emit(&self, record: &Record) -> Result<()> {
        let listeners: Vec<Listener> = self
            .state
            .read()
            .listeners
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(record)?;
        }
        Ok(())
    }

    pub fn on_error<F>(&self, handler: F)
    where
        F: Fn(&LoggerError) + Send + Sync + 'static,
    {
        self.errors.subscribe(handler);
    }

    /// Escalate an error through this plugin's handlers and any linked logger
    pub fn report_error(&self, error: LoggerError) -> Result<()> {
        self.errors.emit(error)
    }

    pub fn errors(&self) -> &ErrorHub {
        &self.errors
    }
}

impl Default for Plugin {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("Plugin")
            .field("namespace", &state.namespace)
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

/// An adapter that turns events of one kind into plugin records
pub trait PluginAdapter: Send + Sync {
    type Event;

    fn plugin(&self) -> &Plugin;

    /// Convert and log one event
    fn input(&self, _event: Self::Event) -> Result<()> {
        Err(LoggerError::invalid_argument(
            "input",
            "input function not overridden for plugin",
        ))
    }
}
