//! Error types for the logger system

use super::record::Fault;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Invalid argument passed to a settings or registry mutator
    #[error("Invalid argument for {operation}: {message}")]
    InvalidArgument { operation: String, message: String },

    /// Record is missing one or more required fields
    #[error("Missing parameters: {}", fields.join(", "))]
    MissingParameters { fields: Vec<String> },

    /// No registered transport subscribes to the record's namespace
    #[error("Namespace: {namespace} not handled")]
    NamespaceNotHandled { namespace: String },

    /// Targeted lookup of a transport that is not registered
    #[error("Transport not found by name: '{name}'")]
    TransportNotFound { name: String },

    /// A transport with the same name is already registered
    #[error("Transport '{name}' is already registered")]
    DuplicateTransport { name: String },

    /// Plugin lookup or removal by an unknown name
    #[error("Plugin not found by name: '{name}'")]
    PluginNotFound { name: String },

    /// Imported settings value failed its validity check
    #[error("Settings failed validity check")]
    InvalidSettings,

    /// Transport never specialised its output primitive
    #[error("Output function not overridden for transport '{transport}'")]
    OutputNotOverridden { transport: String },

    /// Error escalated through `fatal`, `trace` or a failing sink
    #[error("{0}")]
    Escalated(Fault),

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl LoggerError {
    /// Create an invalid argument error
    pub fn invalid_argument(operation: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidArgument {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a missing parameters error from the absent field names
    pub fn missing_parameters<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        LoggerError::MissingParameters {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a namespace coverage error
    pub fn namespace_not_handled(namespace: impl Into<String>) -> Self {
        LoggerError::NamespaceNotHandled {
            namespace: namespace.into(),
        }
    }

    pub fn transport_not_found(name: impl Into<String>) -> Self {
        LoggerError::TransportNotFound { name: name.into() }
    }

    pub fn duplicate_transport(name: impl Into<String>) -> Self {
        LoggerError::DuplicateTransport { name: name.into() }
    }

    pub fn plugin_not_found(name: impl Into<String>) -> Self {
        LoggerError::PluginNotFound { name: name.into() }
    }

    pub fn output_not_overridden(transport: impl Into<String>) -> Self {
        LoggerError::OutputNotOverridden {
            transport: transport.into(),
        }
    }

    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Whether this error belongs to the configuration category
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            LoggerError::InvalidArgument { .. }
                | LoggerError::TransportNotFound { .. }
                | LoggerError::DuplicateTransport { .. }
                | LoggerError::PluginNotFound { .. }
                | LoggerError::InvalidSettings
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::invalid_argument("set_source_control", "unknown mode");
        assert!(matches!(err, LoggerError::InvalidArgument { .. }));
        assert!(err.is_configuration());

        let err = LoggerError::missing_parameters(["severity", "message"]);
        assert!(matches!(err, LoggerError::MissingParameters { ref fields } if fields.len() == 2));
        assert!(!err.is_configuration());

        let err = LoggerError::transport_not_found("file");
        assert!(matches!(err, LoggerError::TransportNotFound { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::namespace_not_handled("testing");
        assert_eq!(err.to_string(), "Namespace: testing not handled");

        let err = LoggerError::missing_parameters(["severity"]);
        assert_eq!(err.to_string(), "Missing parameters: severity");

        let err = LoggerError::output_not_overridden("bare");
        assert_eq!(
            err.to_string(),
            "Output function not overridden for transport 'bare'"
        );

        let err = LoggerError::Escalated(Fault::new("TypeError", "Test is undefined"));
        assert_eq!(err.to_string(), "TypeError: Test is undefined");
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::io_operation("appending log line", "cannot write to file", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("appending log line"));
        assert!(err.to_string().contains("cannot write to file"));
    }
}
