//! Log record structure

use super::error::{LoggerError, Result};
use super::severity::Severity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Namespace assigned to records that do not name one
pub const DEFAULT_NAMESPACE: &str = "logger";

/// Source rendered for records without a usable source
pub const UNDEFINED_SOURCE: &str = "undefined";

/// Message payload of a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Message {
    Text(String),
    Structured(Value),
}

impl Message {
    /// Text shown in the message column
    ///
    /// Structured values render as compact JSON.
    pub fn render(&self) -> String {
        match self {
            Message::Text(text) => text.clone(),
            Message::Structured(value) => value.to_string(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Message::Text(text) => Some(text),
            Message::Structured(_) => None,
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Text(text) => f.write_str(text),
            Message::Structured(value) => write!(f, "{}", value),
        }
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Message::Text(text.to_string())
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Message::Text(text)
    }
}

impl From<Value> for Message {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => Message::Text(text),
            other => Message::Structured(other),
        }
    }
}

/// Error-like value carried by records and escalations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "FaultRepr", into = "FaultRepr")]
pub struct Fault {
    name: String,
    message: String,
    source: Option<Arc<dyn std::error::Error + Send + Sync>>,
}

#[derive(Serialize, Deserialize)]
struct FaultRepr {
    #[serde(default = "FaultRepr::default_name")]
    name: String,
    message: String,
}

impl FaultRepr {
    fn default_name() -> String {
        "Error".to_string()
    }
}

impl From<FaultRepr> for Fault {
    fn from(repr: FaultRepr) -> Self {
        Fault::new(repr.name, repr.message)
    }
}

impl From<Fault> for FaultRepr {
    fn from(fault: Fault) -> Self {
        FaultRepr {
            name: fault.name,
            message: fault.message,
        }
    }
}

impl Fault {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Wrap a concrete error, keeping it reachable through `source()`
    pub fn from_error<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let type_name = std::any::type_name::<E>();
        let name = type_name.rsplit("::").next().unwrap_or(type_name);
        Self {
            name: name.to_string(),
            message: error.to_string(),
            source: Some(Arc::new(error)),
        }
    }

    /// Interpret a loosely typed value as an error
    ///
    /// Only a JSON object with a string `message` qualifies; `name`
    /// defaults to `Error`.
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            LoggerError::invalid_argument("error", format!("not an error value: {}", value))
        })?;
        let message = object
            .get("message")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                LoggerError::invalid_argument("error", "error value has no string message")
            })?;
        let name = object
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("Error");
        Ok(Fault::new(name, message))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.message)
    }
}

impl std::error::Error for Fault {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|error| error as &(dyn std::error::Error + 'static))
    }
}

/// One fully described log event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub severity: Severity,
    pub source: String,
    pub message: Message,
    pub timestamp: DateTime<Utc>,
    pub namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Fault>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<Value>,
}

impl Record {
    /// Create a record stamped with the current time and default namespace
    pub fn new(
        severity: impl Into<Severity>,
        source: impl Into<String>,
        message: impl Into<Message>,
    ) -> Self {
        Self {
            severity: severity.into(),
            source: source.into(),
            message: message.into(),
            timestamp: Utc::now(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            location: None,
            error: None,
            extra: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_error(mut self, error: Fault) -> Self {
        self.error = Some(error);
        self
    }

    pub fn with_extra(mut self, extra: Value) -> Self {
        self.extra = Some(extra);
        self
    }
}

/// Loosely typed producer input
///
/// Every field may be absent. `severity` is kept as a raw value so that
/// unsupported shapes (objects, arrays) can be reported instead of rejected
/// during deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RecordDraft {
    pub severity: Option<Value>,
    pub source: Option<String>,
    pub message: Option<Message>,
    pub timestamp: Option<DateTime<Utc>>,
    pub namespace: Option<String>,
    pub error: Option<Fault>,
    pub extra: Option<Value>,
}

impl RecordDraft {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn severity(mut self, severity: impl Into<Severity>) -> Self {
        self.severity = Some(Value::String(severity.into().as_str().to_string()));
        self
    }

    #[must_use]
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    #[must_use]
    pub fn error(mut self, error: Fault) -> Self {
        self.error = Some(error);
        self
    }

    #[must_use]
    pub fn extra(mut self, extra: Value) -> Self {
        self.extra = Some(extra);
        self
    }

    /// Whether the severity was given as an object or array
    pub fn has_structured_severity(&self) -> bool {
        matches!(self.severity, Some(Value::Object(_)) | Some(Value::Array(_)))
    }

    /// Names of the absent caller-supplied fields
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if matches!(self.severity, None | Some(Value::Null)) {
            missing.push("severity");
        }
        if self.source.is_none() {
            missing.push("source");
        }
        if self.message.is_none() {
            missing.push("message");
        }
        missing
    }

    /// Severity rendered from the raw value, if usable
    fn resolved_severity(&self) -> Option<Severity> {
        match self.severity.as_ref()? {
            Value::String(label) => Some(Severity::from(label.as_str())),
            Value::Null | Value::Object(_) | Value::Array(_) => None,
            other => Some(Severity::from(other.to_string())),
        }
    }

    /// Complete the draft, defaulting timestamp to now and namespace to
    /// [`DEFAULT_NAMESPACE`]
    pub fn build(self) -> Result<Record> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(LoggerError::missing_parameters(missing));
        }
        let severity = self
            .resolved_severity()
            .ok_or_else(|| LoggerError::invalid_argument("severity", "severity must be a string"))?;

        match (self.source, self.message) {
            (Some(source), Some(message)) => Ok(Record {
                severity,
                source,
                message,
                timestamp: self.timestamp.unwrap_or_else(Utc::now),
                namespace: self
                    .namespace
                    .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
                location: None,
                error: self.error,
                extra: self.extra,
            }),
            (source, message) => {
                let mut fields = Vec::new();
                if source.is_none() {
                    fields.push("source");
                }
                if message.is_none() {
                    fields.push("message");
                }
                Err(LoggerError::missing_parameters(fields))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_record_defaults() {
        let record = Record::new("info", "Tests", "Testing Output");
        assert_eq!(record.severity, Severity::Info);
        assert_eq!(record.namespace, DEFAULT_NAMESPACE);
        assert!(record.location.is_none());
        assert!(record.error.is_none());
    }

    #[test]
    fn test_message_render() {
        assert_eq!(Message::from("plain").render(), "plain");
        let structured = Message::from(json!({"foo": "bar"}));
        assert_eq!(structured.render(), r#"{"foo":"bar"}"#);
        assert!(structured.as_text().is_none());
        assert_eq!(Message::from(json!("text")), Message::Text("text".to_string()));
    }

    #[test]
    fn test_draft_missing_fields() {
        let draft = RecordDraft::new().source("Tests").message("X");
        assert_eq!(draft.missing_fields(), vec!["severity"]);

        let err = draft.build().unwrap_err();
        assert!(matches!(err, LoggerError::MissingParameters { ref fields } if fields == &["severity"]));
    }

    #[test]
    fn test_draft_build_defaults() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let record = RecordDraft::new()
            .severity("warning")
            .source("Tests")
            .message("Y")
            .timestamp(ts)
            .build()
            .unwrap();
        assert_eq!(record.severity, Severity::Warning);
        assert_eq!(record.timestamp, ts);
        assert_eq!(record.namespace, DEFAULT_NAMESPACE);
    }

    #[test]
    fn test_draft_from_json() {
        let draft: RecordDraft = serde_json::from_value(json!({
            "severity": {"level": "info"},
            "source": "Tests",
            "message": {"nested": true}
        }))
        .unwrap();
        assert!(draft.has_structured_severity());
        assert!(draft.missing_fields().is_empty());
        assert!(draft.build().is_err());
    }

    #[test]
    fn test_fault_from_value() {
        let fault = Fault::from_value(&json!({"name": "TypeError", "message": "boom"})).unwrap();
        assert_eq!(fault.name(), "TypeError");
        assert_eq!(fault.message(), "boom");

        assert!(Fault::from_value(&json!("boom")).is_err());
        assert!(Fault::from_value(&json!({"message": 3})).is_err());
    }

    #[test]
    fn test_fault_from_error_keeps_source() {
        use std::error::Error;

        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let fault = Fault::from_error(io);
        assert_eq!(fault.name(), "Error");
        assert_eq!(fault.message(), "disk full");
        assert!(fault.source().is_some());
    }
}
