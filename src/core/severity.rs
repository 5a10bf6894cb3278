//! Severity definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a record.
///
/// Only the exact lower-case names of the six known severities map to the
/// named variants. Any other label, including `"INFO"` or `"warn"`, is
/// carried verbatim in [`Severity::Other`] so the caller's spelling reaches
/// the output. Colour is looked up case-insensitively on the six names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    Debug,
    Transport,
    #[default]
    Info,
    Success,
    Warning,
    Error,
    Other(String),
}

impl Severity {
    /// The six severities with a dedicated allow-flag and colour
    pub const KNOWN: [Severity; 6] = [
        Severity::Debug,
        Severity::Transport,
        Severity::Info,
        Severity::Success,
        Severity::Warning,
        Severity::Error,
    ];

    /// Lower-case label, as used in configuration objects
    pub fn as_str(&self) -> &str {
        match self {
            Severity::Debug => "debug",
            Severity::Transport => "transport",
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Other(label) => label,
        }
    }

    /// Label with its first character upper-cased, e.g. `Info`
    pub fn capitalised(&self) -> String {
        let label = self.as_str();
        let mut chars = label.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Severity::Other(_))
    }

    /// The known severity this label names, ignoring case
    pub fn known(&self) -> Option<Severity> {
        match self {
            Severity::Other(label) => Severity::KNOWN
                .into_iter()
                .find(|known| known.as_str().eq_ignore_ascii_case(label)),
            known => Some(known.clone()),
        }
    }

    /// Base style for the severity column, or `None` for unrecognised labels
    pub fn style(&self) -> Option<console::Style> {
        let style = console::Style::new();
        match self.known()? {
            Severity::Success => Some(style.green()),
            Severity::Transport => Some(style.cyan()),
            Severity::Debug => Some(style.blue()),
            Severity::Info => Some(style.magenta()),
            Severity::Warning => Some(style.yellow()),
            Severity::Error => Some(style.red()),
            Severity::Other(_) => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "debug" => Severity::Debug,
            "transport" => Severity::Transport,
            "info" => Severity::Info,
            "success" => Severity::Success,
            "warning" => Severity::Warning,
            "error" => Severity::Error,
            _ => Severity::Other(s.to_string()),
        })
    }
}

impl From<&str> for Severity {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(severity) => severity,
            Err(never) => match never {},
        }
    }
}

impl From<String> for Severity {
    fn from(s: String) -> Self {
        Severity::from(s.as_str())
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        severity.as_str().to_string()
    }
}

impl From<log::Level> for Severity {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Severity::Error,
            log::Level::Warn => Severity::Warning,
            log::Level::Info => Severity::Info,
            log::Level::Debug | log::Level::Trace => Severity::Debug,
        }
    }
}
