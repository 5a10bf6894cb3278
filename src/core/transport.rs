//! Transport trait for log output destinations

use super::command::SettingsCommand;
use super::error::{LoggerError, Result};
use super::error_hub::ErrorHub;
use super::format::Formatter;
use super::record::{Fault, Record};
use super::settings::{Settings, SettingsSource};
use super::severity::Severity;
use uuid::Uuid;

/// State shared by every transport: settings, namespace subscriptions and
/// the error-handler list
#[derive(Debug, Clone)]
pub struct TransportCore {
    id: Uuid,
    settings: Settings,
    namespaces: Vec<String>,
    errors: ErrorHub,
}

impl TransportCore {
    pub fn new() -> Self {
        Self::with_settings(Settings::new())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            id: Uuid::new_v4(),
            settings,
            namespaces: Vec::new(),
            errors: ErrorHub::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn namespaces(&self) -> &[String] {
        &self.namespaces
    }

    pub fn subscribe(&mut self, namespace: &str) {
        if !self.namespaces.iter().any(|ns| ns == namespace) {
            self.namespaces.push(namespace.to_string());
        }
    }

    pub fn unsubscribe(&mut self, namespace: &str) {
        self.namespaces.retain(|ns| ns != namespace);
    }

    pub fn errors(&self) -> &ErrorHub {
        &self.errors
    }
}

impl Default for TransportCore {
    fn default() -> Self {
        Self::new()
    }
}

/// A named, independently configured sink for records
///
/// Implementors provide access to their [`TransportCore`] and specialise
/// [`Transport::output`]; gating and formatting come from the provided
/// methods.
pub trait Transport: Send + Sync {
    fn core(&self) -> &TransportCore;
    fn core_mut(&mut self) -> &mut TransportCore;

    /// Short description of the sink, e.g. `"console"`
    fn kind(&self) -> &'static str;

    /// Write one formatted line; the only place a transport performs I/O
    fn output(&mut self, _record: &Record, _line: &str) -> Result<()> {
        Err(LoggerError::output_not_overridden(self.kind()))
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    /// Whether the sink renders colour escape codes
    fn colour_supported(&self) -> bool {
        false
    }

    fn id(&self) -> Uuid {
        self.core().id()
    }

    fn settings(&self) -> &Settings {
        self.core().settings()
    }

    fn settings_mut(&mut self) -> &mut Settings {
        self.core_mut().settings_mut()
    }

    fn namespaces(&self) -> &[String] {
        self.core().namespaces()
    }

    fn subscribe(&mut self, namespace: &str) {
        self.core_mut().subscribe(namespace);
    }

    fn unsubscribe(&mut self, namespace: &str) {
        self.core_mut().unsubscribe(namespace);
    }

    /// An empty subscription list accepts every namespace
    fn accepts_namespace(&self, namespace: &str) -> bool {
        let namespaces = self.namespaces();
        namespaces.is_empty() || namespaces.iter().any(|ns| ns == namespace)
    }

    fn passes_source_filter(&self, source: &str) -> bool {
        self.settings().source.allows(source)
    }

    fn format(&self, record: &Record) -> String {
        Formatter::new(self.settings(), self.colour_supported()).format(record)
    }

    /// Gated delivery that leaves sink failures to the caller
    ///
    /// Disabled transports, foreign namespaces and filtered sources are
    /// skipped silently.
    fn deliver(&mut self, record: &Record) -> Result<()> {
        if self.settings().is_disabled()
            || !self.accepts_namespace(&record.namespace)
            || !self.passes_source_filter(&record.source)
        {
            return Ok(());
        }

        let line = self.format(record);
        self.output(record, &line)
    }

    /// Gated delivery
    ///
    /// Sink failures go to the error handlers and are returned when none is
    /// subscribed.
    fn input(&mut self, record: &Record) -> Result<()> {
        match self.deliver(record) {
            Ok(()) => Ok(()),
            Err(err @ LoggerError::OutputNotOverridden { .. }) => Err(err),
            Err(err) => self.report_error(err),
        }
    }

    /// Format and write an error record for `fault`, bypassing the gates
    fn trace(&mut self, source: &str, fault: &Fault) -> Result<()> {
        let record =
            Record::new(Severity::Error, source, fault.message()).with_error(fault.clone());
        let line = self.format(&record);
        self.output(&record, &line)
    }

    fn on_error(&self, handler: Box<dyn Fn(&LoggerError) + Send + Sync>) {
        self.core().errors().subscribe(handler);
    }

    fn report_error(&self, error: LoggerError) -> Result<()> {
        self.core().errors().emit(error)
    }

    fn configure(&mut self, command: &SettingsCommand) -> Result<()> {
        command.apply(self.settings_mut())
    }

    fn import_settings(&mut self, source: SettingsSource) -> Result<()> {
        self.settings_mut().import_settings(source).map(|_| ())
    }

    fn is_valid(&self) -> bool {
        self.settings().is_valid()
    }

    fn clean(&mut self) {
        self.settings_mut().clean();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settings::SourceControl;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct Capture {
        core: TransportCore,
        lines: Vec<String>,
        fail: bool,
    }

    impl Transport for Capture {
        fn core(&self) -> &TransportCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut TransportCore {
            &mut self.core
        }

        fn kind(&self) -> &'static str {
            "capture"
        }

        fn output(&mut self, _record: &Record, line: &str) -> Result<()> {
            if self.fail {
                return Err(LoggerError::Escalated(Fault::new("Error", "sink broke")));
            }
            self.lines.push(line.to_string());
            Ok(())
        }
    }

    struct Bare {
        core: TransportCore,
    }

    impl Transport for Bare {
        fn core(&self) -> &TransportCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut TransportCore {
            &mut self.core
        }

        fn kind(&self) -> &'static str {
            "bare"
        }
    }

    fn record(source: &str) -> Record {
        Record::new("info", source, "hello")
    }

    #[test]
    fn test_delivers_when_ungated() {
        let mut transport = Capture::default();
        transport.input(&record("Tests")).unwrap();
        assert_eq!(transport.lines.len(), 1);
        assert!(transport.lines[0].ends_with("[Tests]         hello"));
    }

    #[test]
    fn test_disabled_transport_is_silent() {
        let mut transport = Capture::default();
        transport.settings_mut().add_to_source_whitelist("Tests").unwrap();
        transport.settings_mut().set_source_control(Some(SourceControl::Whitelist));
        transport.settings_mut().disable();

        transport.input(&record("Tests")).unwrap();
        assert!(transport.lines.is_empty());
    }

    #[test]
    fn test_namespace_gate() {
        let mut transport = Capture::default();
        transport.subscribe("http");
        transport.subscribe("http");
        assert_eq!(transport.namespaces().len(), 1);

        transport.input(&record("Tests")).unwrap();
        assert!(transport.lines.is_empty());

        transport.input(&record("Tests").with_namespace("http")).unwrap();
        assert_eq!(transport.lines.len(), 1);

        transport.unsubscribe("http");
        assert!(transport.accepts_namespace("anything"));
    }

    #[test]
    fn test_source_gates() {
        let mut transport = Capture::default();
        transport.settings_mut().add_to_source_blacklist("Noisy").unwrap();
        transport.settings_mut().set_source_control(Some(SourceControl::Blacklist));

        transport.input(&record("Noisy")).unwrap();
        transport.input(&record("Quiet")).unwrap();
        assert_eq!(transport.lines.len(), 1);
    }

    #[test]
    fn test_output_not_overridden() {
        let mut transport = Bare {
            core: TransportCore::new(),
        };
        let err = transport.input(&record("Tests")).unwrap_err();
        assert!(matches!(err, LoggerError::OutputNotOverridden { .. }));
    }

    #[test]
    fn test_sink_failure_goes_to_handlers() {
        let mut transport = Capture {
            fail: true,
            ..Capture::default()
        };
        assert!(transport.input(&record("Tests")).is_err());

        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = Arc::clone(&seen);
        transport.on_error(Box::new(move |_| {
            seen_clone.fetch_add(1, Ordering::SeqCst);
        }));
        transport.input(&record("Tests")).unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_trace_bypasses_gates() {
        let mut transport = Capture::default();
        transport.settings_mut().disable();
        transport
            .trace("Tests", &Fault::new("TypeError", "Test is undefined"))
            .unwrap();
        assert_eq!(transport.lines.len(), 1);
        assert!(transport.lines[0].contains("[Error]"));
        assert!(transport.lines[0].ends_with("Test is undefined"));
    }

    #[test]
    fn test_configure_and_validity() {
        let mut transport = Capture::default();
        transport.configure(&SettingsCommand::EnableBrackets).unwrap();
        assert!(transport.settings().timestamp.brackets);

        transport.settings_mut().timestamp.format = "[broken".into();
        assert!(!transport.is_valid());
        transport.clean();
        assert!(transport.is_valid());
    }
}
