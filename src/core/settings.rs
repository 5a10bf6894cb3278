//! Per-transport settings
//!
//! A [`Settings`] value is owned by exactly one transport. Every mutator keeps
//! [`Settings::is_valid`] true; fields are public, so values assigned directly
//! can drift and are repaired by [`Settings::clean`].

use super::config::ImportedConfig;
use super::error::{LoggerError, Result};
use super::severity::Severity;
use super::timestamp::{TimestampPattern, DEFAULT_TIMESTAMP_FORMAT};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColourSettings {
    pub bold: bool,
    pub enabled: bool,
    /// Emit colour codes even when the sink does not advertise support
    pub force: bool,
}

impl Default for ColourSettings {
    fn default() -> Self {
        Self {
            bold: true,
            enabled: true,
            force: false,
        }
    }
}

/// Per-severity allow flags
///
/// Stored, imported and exported, but not consulted when routing records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeverityFlags {
    pub debug: bool,
    pub transport: bool,
    pub info: bool,
    pub success: bool,
    pub warning: bool,
    pub error: bool,
}

impl Default for SeverityFlags {
    fn default() -> Self {
        Self {
            debug: true,
            transport: true,
            info: true,
            success: true,
            warning: true,
            error: true,
        }
    }
}

impl SeverityFlags {
    fn slot(&mut self, name: &str) -> Option<&mut bool> {
        match name {
            "debug" => Some(&mut self.debug),
            "transport" => Some(&mut self.transport),
            "info" => Some(&mut self.info),
            "success" => Some(&mut self.success),
            "warning" => Some(&mut self.warning),
            "error" => Some(&mut self.error),
            _ => None,
        }
    }

    /// Flag for a known severity, `None` for unknown labels
    pub fn get(&self, severity: &Severity) -> Option<bool> {
        match severity.known()? {
            Severity::Debug => Some(self.debug),
            Severity::Transport => Some(self.transport),
            Severity::Info => Some(self.info),
            Severity::Success => Some(self.success),
            Severity::Warning => Some(self.warning),
            Severity::Error => Some(self.error),
            Severity::Other(_) => None,
        }
    }

    pub fn set(&mut self, name: &str, value: bool) -> Result<()> {
        let slot = self.slot(name).ok_or_else(|| {
            LoggerError::invalid_argument(
                "set_severity_flag",
                format!("Severity '{}' not found in settings", name),
            )
        })?;
        *slot = value;
        Ok(())
    }
}

/// Which source list is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceControl {
    Whitelist,
    Blacklist,
}

impl SourceControl {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceControl::Whitelist => "whitelist",
            SourceControl::Blacklist => "blacklist",
        }
    }
}

impl fmt::Display for SourceControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceControl {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "whitelist" => Ok(SourceControl::Whitelist),
            "blacklist" => Ok(SourceControl::Blacklist),
            other => Err(LoggerError::invalid_argument(
                "set_source_control",
                format!("Unrecognised source control setting '{}'", other),
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceSettings {
    #[serde(rename = "enabled")]
    pub mode: Option<SourceControl>,
    pub whitelist: Vec<String>,
    pub blacklist: Vec<String>,
}

impl SourceSettings {
    /// Whether a record from `source` passes the active list
    pub fn allows(&self, source: &str) -> bool {
        match self.mode {
            None => true,
            Some(SourceControl::Whitelist) => self.whitelist.iter().any(|s| s == source),
            Some(SourceControl::Blacklist) => !self.blacklist.iter().any(|s| s == source),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimestampSettings {
    pub enabled: bool,
    pub format: String,
    pub utc: bool,
    pub brackets: bool,
}

impl Default for TimestampSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            utc: false,
            brackets: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocationSettings {
    pub enabled: bool,
}

/// Input accepted by [`Settings::import_settings`]
#[derive(Debug, Clone)]
pub enum SettingsSource {
    /// A typed settings value, rejected unless valid
    Settings(Settings),
    /// A loosely typed configuration object, parsed leniently
    Config(Value),
}

impl From<Settings> for SettingsSource {
    fn from(settings: Settings) -> Self {
        SettingsSource::Settings(settings)
    }
}

impl From<Value> for SettingsSource {
    fn from(value: Value) -> Self {
        SettingsSource::Config(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub enabled: bool,
    pub colour: ColourSettings,
    pub severity: SeverityFlags,
    pub source: SourceSettings,
    pub timestamp: TimestampSettings,
    pub location: LocationSettings,
}

fn list_is_valid(list: &[String]) -> bool {
    let mut seen = HashSet::with_capacity(list.len());
    list.iter().all(|entry| !entry.is_empty() && seen.insert(entry.as_str()))
}

/// Drop empty and repeated entries, keeping the first occurrence
fn dedup_list(list: &mut Vec<String>) {
    let mut seen = HashSet::with_capacity(list.len());
    list.retain(|entry| !entry.is_empty() && seen.insert(entry.clone()));
}

fn require_entry(operation: &str, entry: &str) -> Result<()> {
    if entry.is_empty() {
        return Err(LoggerError::invalid_argument(
            operation,
            "source name must not be empty",
        ));
    }
    Ok(())
}

impl Default for Settings {
    /// Enabled, bold uncoloured-unforced colour, all severities, no source
    /// control, local timestamps without brackets, no location
    fn default() -> Self {
        Self {
            enabled: true,
            colour: ColourSettings::default(),
            severity: SeverityFlags::default(),
            source: SourceSettings::default(),
            timestamp: TimestampSettings::default(),
            location: LocationSettings::default(),
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    // Validity

    /// Full structural check across every field
    pub fn is_valid(&self) -> bool {
        list_is_valid(&self.source.whitelist)
            && list_is_valid(&self.source.blacklist)
            && TimestampPattern::is_well_formed(&self.timestamp.format)
    }

    /// Repair every drifted field, leaving valid ones alone
    ///
    /// Source lists lose their empty and repeated entries; a malformed
    /// timestamp format is reset to the default.
    pub fn clean(&mut self) -> &mut Self {
        dedup_list(&mut self.source.whitelist);
        dedup_list(&mut self.source.blacklist);
        if !TimestampPattern::is_well_formed(&self.timestamp.format) {
            self.reset_timestamp_format();
        }
        self
    }

    /// Replace these settings with a validated value or an imported configuration
    pub fn import_settings(&mut self, source: impl Into<SettingsSource>) -> Result<&mut Self> {
        match source.into() {
            SettingsSource::Settings(settings) => {
                if !settings.is_valid() {
                    return Err(LoggerError::InvalidSettings);
                }
                *self = settings;
            }
            SettingsSource::Config(value) => {
                *self = ImportedConfig::from_value(&value)?.resolve();
            }
        }
        Ok(self)
    }

    /// Current-shape configuration object for these settings
    pub fn export(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }

    // Master switch

    pub fn enable(&mut self) -> &mut Self {
        self.enabled = true;
        self
    }

    pub fn disable(&mut self) -> &mut Self {
        self.enabled = false;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_disabled(&self) -> bool {
        !self.enabled
    }

    // Colour

    pub fn enable_colour(&mut self) -> &mut Self {
        self.colour.enabled = true;
        self
    }

    pub fn disable_colour(&mut self) -> &mut Self {
        self.colour.enabled = false;
        self
    }

    pub fn colour_settings(&self) -> &ColourSettings {
        &self.colour
    }

    pub fn enable_force_colour(&mut self) -> &mut Self {
        self.colour.force = true;
        self
    }

    pub fn disable_force_colour(&mut self) -> &mut Self {
        self.colour.force = false;
        self
    }

    pub fn enable_bold_colour(&mut self) -> &mut Self {
        self.colour.bold = true;
        self
    }

    pub fn disable_bold_colour(&mut self) -> &mut Self {
        self.colour.bold = false;
        self
    }

    // Whitelist

    /// Add a source to the whitelist; duplicates are ignored
    pub fn add_to_source_whitelist(&mut self, source: &str) -> Result<&mut Self> {
        require_entry("add_to_source_whitelist", source)?;
        if !self.source.whitelist.iter().any(|s| s == source) {
            self.source.whitelist.push(source.to_string());
        }
        Ok(self)
    }

    pub fn remove_from_source_whitelist(&mut self, source: &str) -> &mut Self {
        self.source.whitelist.retain(|s| s != source);
        self
    }

    pub fn source_whitelist(&self) -> &[String] {
        &self.source.whitelist
    }

    pub fn clear_source_whitelist(&mut self) -> &mut Self {
        self.source.whitelist.clear();
        self
    }

    // Blacklist

    /// Add a source to the blacklist; duplicates are ignored
    pub fn add_to_source_blacklist(&mut self, source: &str) -> Result<&mut Self> {
        require_entry("add_to_source_blacklist", source)?;
        if !self.source.blacklist.iter().any(|s| s == source) {
            self.source.blacklist.push(source.to_string());
        }
        Ok(self)
    }

    pub fn remove_from_source_blacklist(&mut self, source: &str) -> &mut Self {
        self.source.blacklist.retain(|s| s != source);
        self
    }

    pub fn source_blacklist(&self) -> &[String] {
        &self.source.blacklist
    }

    pub fn clear_source_blacklist(&mut self) -> &mut Self {
        self.source.blacklist.clear();
        self
    }

    // Source control

    /// Select the active list; the other list keeps its contents
    pub fn set_source_control(&mut self, mode: Option<SourceControl>) -> &mut Self {
        self.source.mode = mode;
        self
    }

    /// String form: accepts `"whitelist"`, `"blacklist"` or `None`
    pub fn set_source_control_setting(&mut self, mode: Option<&str>) -> Result<&mut Self> {
        let mode = mode.map(str::parse).transpose()?;
        Ok(self.set_source_control(mode))
    }

    pub fn source_control(&self) -> Option<SourceControl> {
        self.source.mode
    }

    /// Clear both lists and the active mode
    pub fn reset_source_control(&mut self) -> &mut Self {
        self.source = SourceSettings::default();
        self
    }

    pub fn disable_source_control(&mut self) -> &mut Self {
        self.source.mode = None;
        self
    }

    // Severity flags

    pub fn set_severity_flag(&mut self, name: &str, value: bool) -> Result<&mut Self> {
        self.severity.set(name, value)?;
        Ok(self)
    }

    pub fn severity_flag(&self, severity: &Severity) -> Option<bool> {
        self.severity.get(severity)
    }

    // Timestamp

    pub fn enable_timestamp(&mut self) -> &mut Self {
        self.timestamp.enabled = true;
        self
    }

    pub fn disable_timestamp(&mut self) -> &mut Self {
        self.timestamp.enabled = false;
        self
    }

    pub fn enable_brackets(&mut self) -> &mut Self {
        self.timestamp.brackets = true;
        self
    }

    pub fn disable_brackets(&mut self) -> &mut Self {
        self.timestamp.brackets = false;
        self
    }

    /// Set the timestamp pattern; rejects unterminated `[` escapes
    pub fn set_timestamp_format(&mut self, format: impl Into<String>) -> Result<&mut Self> {
        let format = format.into();
        if !TimestampPattern::is_well_formed(&format) {
            return Err(LoggerError::invalid_argument(
                "set_timestamp_format",
                format!("unterminated escape in pattern '{}'", format),
            ));
        }
        self.timestamp.format = format;
        Ok(self)
    }

    pub fn reset_timestamp_format(&mut self) -> &mut Self {
        self.timestamp.format = DEFAULT_TIMESTAMP_FORMAT.to_string();
        self
    }

    pub fn timestamp_format(&self) -> &str {
        &self.timestamp.format
    }

    pub fn enable_utc(&mut self) -> &mut Self {
        self.timestamp.utc = true;
        self
    }

    pub fn disable_utc(&mut self) -> &mut Self {
        self.timestamp.utc = false;
        self
    }

    // Location

    pub fn enable_location(&mut self) -> &mut Self {
        self.location.enabled = true;
        self
    }

    pub fn disable_location(&mut self) -> &mut Self {
        self.location.enabled = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let settings = Settings::new();
        assert!(settings.is_enabled());
        assert!(settings.colour.enabled);
        assert!(settings.colour.bold);
        assert!(!settings.colour.force);
        assert_eq!(settings.source_control(), None);
        assert_eq!(settings.timestamp_format(), "HH:mm:ss[s] SSS[ms]");
        assert!(!settings.timestamp.utc);
        assert!(!settings.timestamp.brackets);
        assert!(!settings.location.enabled);
        assert!(settings.is_valid());
    }

    #[test]
    fn test_whitelist_add_and_remove() {
        let mut settings = Settings::new();
        settings.add_to_source_whitelist("Tests").unwrap();
        settings.add_to_source_whitelist("Tests").unwrap();
        assert_eq!(settings.source_whitelist(), ["Tests".to_string()]);

        settings.remove_from_source_whitelist("Missing");
        assert_eq!(settings.source_whitelist().len(), 1);

        settings.remove_from_source_whitelist("Tests");
        assert!(settings.source_whitelist().is_empty());

        assert!(settings.add_to_source_whitelist("").is_err());
        assert!(settings.is_valid());
    }

    #[test]
    fn test_source_control_modes_are_exclusive() {
        let mut settings = Settings::new();
        settings.add_to_source_whitelist("A").unwrap();
        settings.add_to_source_blacklist("B").unwrap();

        settings.set_source_control(Some(SourceControl::Whitelist));
        assert!(settings.source.allows("A"));
        assert!(!settings.source.allows("B"));

        settings.set_source_control(Some(SourceControl::Blacklist));
        assert!(settings.source.allows("A"));
        assert!(!settings.source.allows("B"));
        // Switching modes keeps both lists
        assert_eq!(settings.source_whitelist().len(), 1);

        settings.disable_source_control();
        assert!(settings.source.allows("B"));
    }

    #[test]
    fn test_source_control_setting_strings() {
        let mut settings = Settings::new();
        settings.set_source_control_setting(Some("whitelist")).unwrap();
        assert_eq!(settings.source_control(), Some(SourceControl::Whitelist));
        settings.set_source_control_setting(None).unwrap();
        assert_eq!(settings.source_control(), None);

        let err = settings.set_source_control_setting(Some("greylist")).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidArgument { .. }));
    }

    #[test]
    fn test_reset_source_control() {
        let mut settings = Settings::new();
        settings.add_to_source_blacklist("X").unwrap();
        settings.set_source_control(Some(SourceControl::Blacklist));
        settings.reset_source_control();
        assert_eq!(settings.source, SourceSettings::default());
    }

    #[test]
    fn test_severity_flags() {
        let mut settings = Settings::new();
        settings.set_severity_flag("debug", false).unwrap();
        assert_eq!(settings.severity_flag(&Severity::Debug), Some(false));
        assert_eq!(settings.severity_flag(&Severity::from("custom")), None);

        let err = settings.set_severity_flag("verbose", true).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_timestamp_format() {
        let mut settings = Settings::new();
        settings.set_timestamp_format("H:mm").unwrap();
        assert_eq!(settings.timestamp_format(), "H:mm");
        assert!(settings.set_timestamp_format("HH [oops").is_err());
        assert_eq!(settings.timestamp_format(), "H:mm");
        settings.reset_timestamp_format();
        assert_eq!(settings.timestamp_format(), DEFAULT_TIMESTAMP_FORMAT);
    }

    #[test]
    fn test_clean_repairs_only_drifted_fields() {
        let mut settings = Settings::new();
        settings.add_to_source_blacklist("Keep").unwrap();
        settings.enable_utc();
        settings.source.whitelist = vec!["dup".into(), "dup".into()];
        settings.timestamp.format = "[broken".into();
        assert!(!settings.is_valid());

        settings.clean();
        assert!(settings.is_valid());
        assert_eq!(settings.source_whitelist(), ["dup".to_string()]);
        assert_eq!(settings.source_blacklist(), ["Keep".to_string()]);
        assert_eq!(settings.timestamp_format(), DEFAULT_TIMESTAMP_FORMAT);
        assert!(settings.timestamp.utc);
    }

    #[test]
    fn test_clean_keeps_valid_list_entries() {
        let mut settings = Settings::new();
        settings.source.blacklist = vec![
            "Auth".into(),
            String::new(),
            "Cache".into(),
            "Auth".into(),
        ];
        settings.clean();
        assert_eq!(
            settings.source_blacklist(),
            ["Auth".to_string(), "Cache".to_string()]
        );
    }

    #[test]
    fn test_default_matches_new() {
        assert_eq!(Settings::default(), Settings::new());
        assert!(Settings::default().is_enabled());

        let mut settings = Settings::new();
        settings.import_settings(Settings::default()).unwrap();
        assert!(settings.is_enabled());
    }

    #[test]
    fn test_clean_is_idempotent() {
        let mut settings = Settings::new();
        settings.source.blacklist = vec![String::new()];
        settings.clean();
        let once = settings.clone();
        settings.clean();
        assert_eq!(settings, once);

        let mut valid = Settings::new();
        valid.disable_colour().enable_location();
        let before = valid.clone();
        valid.clean();
        assert_eq!(valid, before);
    }

    #[test]
    fn test_import_typed_settings() {
        let mut settings = Settings::new();
        let mut other = Settings::new();
        other.disable().enable_brackets();
        settings.import_settings(other.clone()).unwrap();
        assert_eq!(settings, other);

        let mut invalid = Settings::new();
        invalid.source.whitelist = vec!["a".into(), "a".into()];
        let err = settings.import_settings(invalid).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidSettings));
        assert_eq!(settings, other);
    }

    #[test]
    fn test_import_rejects_non_object() {
        let mut settings = Settings::new();
        assert!(settings.import_settings(json!("nope")).is_err());
        assert!(settings.import_settings(Value::Null).is_err());
    }

    #[test]
    fn test_export_uses_current_shape() {
        let mut settings = Settings::new();
        settings.set_source_control(Some(SourceControl::Whitelist));
        let exported = settings.export();
        assert_eq!(exported["source"]["enabled"], "whitelist");
        assert_eq!(exported["timestamp"]["format"], DEFAULT_TIMESTAMP_FORMAT);
        assert_eq!(exported["enabled"], true);

        let mut reimported = Settings::new();
        reimported.disable();
        reimported.import_settings(exported).unwrap();
        assert_eq!(reimported, settings);
    }
}
