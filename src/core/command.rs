//! Settings operations addressed to one or all transports
//!
//! A [`SettingsCommand`] names one settings mutation; the logger applies it
//! to the transports selected by a [`Scope`], in registration order.

use super::error::Result;
use super::settings::{Settings, SettingsSource, SourceControl};

/// Which registered transports an operation targets
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Scope {
    #[default]
    All,
    Named(String),
}

impl Scope {
    pub fn named(name: impl Into<String>) -> Self {
        Scope::Named(name.into())
    }

    pub fn includes(&self, name: &str) -> bool {
        match self {
            Scope::All => true,
            Scope::Named(target) => target == name,
        }
    }
}

impl From<&str> for Scope {
    fn from(name: &str) -> Self {
        Scope::Named(name.to_string())
    }
}

impl From<String> for Scope {
    fn from(name: String) -> Self {
        Scope::Named(name)
    }
}

impl From<Option<&str>> for Scope {
    fn from(name: Option<&str>) -> Self {
        name.map_or(Scope::All, Scope::from)
    }
}

/// One settings mutation
#[derive(Debug, Clone)]
pub enum SettingsCommand {
    Enable,
    Disable,
    EnableColour,
    DisableColour,
    EnableForceColour,
    DisableForceColour,
    EnableBoldColour,
    DisableBoldColour,
    AddToSourceWhitelist(String),
    RemoveFromSourceWhitelist(String),
    ClearSourceWhitelist,
    AddToSourceBlacklist(String),
    RemoveFromSourceBlacklist(String),
    ClearSourceBlacklist,
    SetSourceControl(Option<SourceControl>),
    ResetSourceControl,
    DisableSourceControl,
    SetSeverityFlag(String, bool),
    EnableTimestamp,
    DisableTimestamp,
    SetTimestampFormat(String),
    ResetTimestampFormat,
    EnableUtc,
    DisableUtc,
    EnableBrackets,
    DisableBrackets,
    EnableLocation,
    DisableLocation,
    Import(SettingsSource),
    Clean,
}

impl SettingsCommand {
    /// Apply to one settings value
    pub fn apply(&self, settings: &mut Settings) -> Result<()> {
        use SettingsCommand::*;

        match self {
            Enable => {
                settings.enable();
            }
            Disable => {
                settings.disable();
            }
            EnableColour => {
                settings.enable_colour();
            }
            DisableColour => {
                settings.disable_colour();
            }
            EnableForceColour => {
                settings.enable_force_colour();
            }
            DisableForceColour => {
                settings.disable_force_colour();
            }
            EnableBoldColour => {
                settings.enable_bold_colour();
            }
            DisableBoldColour => {
                settings.disable_bold_colour();
            }
            AddToSourceWhitelist(source) => {
                settings.add_to_source_whitelist(source)?;
            }
            RemoveFromSourceWhitelist(source) => {
                settings.remove_from_source_whitelist(source);
            }
            ClearSourceWhitelist => {
                settings.clear_source_whitelist();
            }
            AddToSourceBlacklist(source) => {
                settings.add_to_source_blacklist(source)?;
            }
            RemoveFromSourceBlacklist(source) => {
                settings.remove_from_source_blacklist(source);
            }
            ClearSourceBlacklist => {
                settings.clear_source_blacklist();
            }
            SetSourceControl(mode) => {
                settings.set_source_control(*mode);
            }
            ResetSourceControl => {
                settings.reset_source_control();
            }
            DisableSourceControl => {
                settings.disable_source_control();
            }
            SetSeverityFlag(name, value) => {
                settings.set_severity_flag(name, *value)?;
            }
            EnableTimestamp => {
                settings.enable_timestamp();
            }
            DisableTimestamp => {
                settings.disable_timestamp();
            }
            SetTimestampFormat(format) => {
                settings.set_timestamp_format(format.as_str())?;
            }
            ResetTimestampFormat => {
                settings.reset_timestamp_format();
            }
            EnableUtc => {
                settings.enable_utc();
            }
            DisableUtc => {
                settings.disable_utc();
            }
            EnableBrackets => {
                settings.enable_brackets();
            }
            DisableBrackets => {
                settings.disable_brackets();
            }
            EnableLocation => {
                settings.enable_location();
            }
            DisableLocation => {
                settings.disable_location();
            }
            Import(source) => {
                settings.import_settings(source.clone())?;
            }
            Clean => {
                settings.clean();
            }
        }
        Ok(())
    }

    /// Whether the command fails the same way for every settings value
    ///
    /// Such commands are checked against a scratch copy before an
    /// all-transport update so that a rejected value changes nothing.
    pub fn is_value_checked(&self) -> bool {
        matches!(
            self,
            SettingsCommand::AddToSourceWhitelist(_)
                | SettingsCommand::AddToSourceBlacklist(_)
                | SettingsCommand::SetSeverityFlag(..)
                | SettingsCommand::SetTimestampFormat(_)
                | SettingsCommand::Import(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scope_conversions() {
        assert_eq!(Scope::from("console"), Scope::named("console"));
        assert_eq!(Scope::from(None::<&str>), Scope::All);
        assert!(Scope::All.includes("anything"));
        assert!(!Scope::named("file").includes("console"));
    }

    #[test]
    fn test_apply_simple_commands() {
        let mut settings = Settings::new();
        SettingsCommand::Disable.apply(&mut settings).unwrap();
        SettingsCommand::EnableLocation.apply(&mut settings).unwrap();
        SettingsCommand::SetSourceControl(Some(SourceControl::Blacklist))
            .apply(&mut settings)
            .unwrap();
        SettingsCommand::AddToSourceBlacklist("Noise".into())
            .apply(&mut settings)
            .unwrap();

        assert!(settings.is_disabled());
        assert!(settings.location.enabled);
        assert!(!settings.source.allows("Noise"));
    }

    #[test]
    fn test_apply_reports_invalid_values() {
        let mut settings = Settings::new();
        assert!(SettingsCommand::SetSeverityFlag("loud".into(), true)
            .apply(&mut settings)
            .is_err());
        assert!(SettingsCommand::SetTimestampFormat("[open".into())
            .apply(&mut settings)
            .is_err());
        assert!(SettingsCommand::AddToSourceWhitelist(String::new())
            .apply(&mut settings)
            .is_err());
        assert!(settings.is_valid());
    }

    #[test]
    fn test_import_command() {
        let mut settings = Settings::new();
        let command = SettingsCommand::Import(json!({ "timestamp": { "utc": true } }).into());
        assert!(command.is_value_checked());
        command.apply(&mut settings).unwrap();
        assert!(settings.timestamp.utc);
    }
}
