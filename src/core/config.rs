//! Lenient configuration import
//!
//! Configuration objects arrive as loosely typed JSON. Each field is read
//! independently: a missing, null or wrongly typed value falls back to its
//! default without affecting its siblings. Two shapes are understood; an
//! object whose `output` member is itself an object uses the legacy shape.

use super::error::{LoggerError, Result};
use super::settings::{
    ColourSettings, LocationSettings, Settings, SeverityFlags, SourceControl, SourceSettings,
    TimestampSettings,
};
use serde::Deserialize;
use serde_json::Value;
use serde_with::{serde_as, DefaultOnError};

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColourConfig {
    #[serde_as(as = "DefaultOnError")]
    pub bold: Option<bool>,
    #[serde_as(as = "DefaultOnError")]
    pub enabled: Option<bool>,
    #[serde_as(as = "DefaultOnError")]
    pub force: Option<bool>,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SeverityConfig {
    #[serde_as(as = "DefaultOnError")]
    pub debug: Option<bool>,
    #[serde_as(as = "DefaultOnError")]
    pub transport: Option<bool>,
    #[serde_as(as = "DefaultOnError")]
    pub info: Option<bool>,
    #[serde_as(as = "DefaultOnError")]
    pub success: Option<bool>,
    #[serde_as(as = "DefaultOnError")]
    pub warning: Option<bool>,
    #[serde_as(as = "DefaultOnError")]
    pub error: Option<bool>,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    #[serde_as(as = "DefaultOnError")]
    pub enabled: Option<SourceControl>,
    #[serde_as(as = "DefaultOnError")]
    pub whitelist: Option<Vec<String>>,
    #[serde_as(as = "DefaultOnError")]
    pub blacklist: Option<Vec<String>>,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TimestampConfig {
    #[serde_as(as = "DefaultOnError")]
    pub enabled: Option<bool>,
    #[serde_as(as = "DefaultOnError")]
    pub format: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    pub utc: Option<bool>,
    #[serde_as(as = "DefaultOnError")]
    pub brackets: Option<bool>,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    #[serde_as(as = "DefaultOnError")]
    pub enabled: Option<bool>,
}

/// Current configuration shape, mirroring [`Settings::export`]
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CurrentConfig {
    #[serde_as(as = "DefaultOnError")]
    pub enabled: Option<bool>,
    #[serde_as(as = "DefaultOnError")]
    pub colour: Option<ColourConfig>,
    #[serde_as(as = "DefaultOnError")]
    pub severity: Option<SeverityConfig>,
    #[serde_as(as = "DefaultOnError")]
    pub source: Option<SourceConfig>,
    #[serde_as(as = "DefaultOnError")]
    pub timestamp: Option<TimestampConfig>,
    #[serde_as(as = "DefaultOnError")]
    pub location: Option<LocationConfig>,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LegacyTimestampOptions {
    #[serde_as(as = "DefaultOnError")]
    pub utc: Option<bool>,
    #[serde_as(as = "DefaultOnError")]
    pub brackets: Option<bool>,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LegacySourceLists {
    #[serde_as(as = "DefaultOnError")]
    pub whitelist: Option<Vec<String>>,
    #[serde_as(as = "DefaultOnError")]
    pub blacklist: Option<Vec<String>>,
}

/// Contents of the legacy `output` member
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LegacyConfig {
    #[serde_as(as = "DefaultOnError")]
    pub colour: Option<bool>,
    #[serde_as(as = "DefaultOnError")]
    pub timestamp: Option<bool>,
    #[serde_as(as = "DefaultOnError")]
    pub timeformat: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(rename = "timestampOpts")]
    pub timestamp_opts: Option<LegacyTimestampOptions>,
    #[serde_as(as = "DefaultOnError")]
    pub source: Option<LegacySourceLists>,
}

/// A parsed configuration object in either shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportedConfig {
    Legacy(LegacyConfig),
    Current(CurrentConfig),
}

impl ImportedConfig {
    /// Parse a configuration object. Only non-objects are rejected.
    pub fn from_value(value: &Value) -> Result<Self> {
        if !value.is_object() {
            return Err(LoggerError::invalid_argument(
                "import_settings",
                format!("expected a configuration object, got {}", value),
            ));
        }
        match value.get("output") {
            Some(output) if output.is_object() => Ok(ImportedConfig::Legacy(
                serde_json::from_value(output.clone())?,
            )),
            _ => Ok(ImportedConfig::Current(serde_json::from_value(
                value.clone(),
            )?)),
        }
    }

    /// Build a complete, valid settings value; absent fields take defaults
    pub fn resolve(&self) -> Settings {
        let mut settings = match self {
            ImportedConfig::Legacy(legacy) => legacy.resolve(),
            ImportedConfig::Current(current) => current.resolve(),
        };
        settings.clean();
        settings
    }
}

impl LegacyConfig {
    fn resolve(&self) -> Settings {
        let opts = self.timestamp_opts.clone().unwrap_or_default();
        let lists = self.source.clone().unwrap_or_default();
        let timestamp_defaults = TimestampSettings::default();

        Settings {
            enabled: true,
            colour: ColourSettings {
                enabled: self.colour.unwrap_or(true),
                ..ColourSettings::default()
            },
            severity: SeverityFlags::default(),
            source: SourceSettings {
                mode: None,
                whitelist: lists.whitelist.unwrap_or_default(),
                blacklist: lists.blacklist.unwrap_or_default(),
            },
            timestamp: TimestampSettings {
                enabled: self.timestamp.unwrap_or(timestamp_defaults.enabled),
                format: self.timeformat.clone().unwrap_or(timestamp_defaults.format),
                utc: opts.utc.unwrap_or(timestamp_defaults.utc),
                brackets: opts.brackets.unwrap_or(timestamp_defaults.brackets),
            },
            location: LocationSettings::default(),
        }
    }
}

impl CurrentConfig {
    fn resolve(&self) -> Settings {
        let colour = self.colour.clone().unwrap_or_default();
        let severity = self.severity.clone().unwrap_or_default();
        let source = self.source.clone().unwrap_or_default();
        let timestamp = self.timestamp.clone().unwrap_or_default();
        let location = self.location.clone().unwrap_or_default();

        let colour_defaults = ColourSettings::default();
        let severity_defaults = SeverityFlags::default();
        let timestamp_defaults = TimestampSettings::default();

        Settings {
            enabled: self.enabled.unwrap_or(true),
            colour: ColourSettings {
                bold: colour.bold.unwrap_or(colour_defaults.bold),
                enabled: colour.enabled.unwrap_or(colour_defaults.enabled),
                force: colour.force.unwrap_or(colour_defaults.force),
            },
            severity: SeverityFlags {
                debug: severity.debug.unwrap_or(severity_defaults.debug),
                transport: severity.transport.unwrap_or(severity_defaults.transport),
                info: severity.info.unwrap_or(severity_defaults.info),
                success: severity.success.unwrap_or(severity_defaults.success),
                warning: severity.warning.unwrap_or(severity_defaults.warning),
                error: severity.error.unwrap_or(severity_defaults.error),
            },
            source: SourceSettings {
                mode: source.enabled,
                whitelist: source.whitelist.unwrap_or_default(),
                blacklist: source.blacklist.unwrap_or_default(),
            },
            timestamp: TimestampSettings {
                enabled: timestamp.enabled.unwrap_or(timestamp_defaults.enabled),
                format: timestamp.format.unwrap_or(timestamp_defaults.format),
                utc: timestamp.utc.unwrap_or(timestamp_defaults.utc),
                brackets: timestamp.brackets.unwrap_or(timestamp_defaults.brackets),
            },
            location: LocationSettings {
                enabled: location.enabled.unwrap_or(false),
            },
        }
    }
}
