//! Line formatting for records
//!
//! Produces `"{timestamp} {severity}{location} {source} {message}"` with the
//! severity, location and source columns padded on their visible width.

use super::record::{Record, UNDEFINED_SOURCE};
use super::settings::Settings;
use super::timestamp::format_timestamp;
use std::borrow::Cow;

/// Visible width of the severity column, brackets included
pub const SEVERITY_WIDTH: usize = 11;

/// Visible width of the location column, brackets included
pub const LOCATION_WIDTH: usize = 20;

/// Visible width of the source column, brackets included
pub const SOURCE_WIDTH: usize = 15;

/// Remove every ANSI escape sequence
pub fn strip_colour(text: &str) -> Cow<'_, str> {
    console::strip_ansi_codes(text)
}

/// Number of characters left once escape sequences are removed
pub fn visible_len(text: &str) -> usize {
    strip_colour(text).chars().count()
}

/// Append spaces until the visible width reaches `width`; never truncates
pub fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(visible_len(text));
    let mut padded = String::with_capacity(text.len() + fill);
    padded.push_str(text);
    padded.extend(std::iter::repeat(' ').take(fill));
    padded
}

/// Renders records under one transport's settings
#[derive(Debug, Clone, Copy)]
pub struct Formatter<'a> {
    settings: &'a Settings,
    colour_supported: bool,
}

impl<'a> Formatter<'a> {
    /// `colour_supported` is the sink's capability flag; forced colour ignores it
    pub fn new(settings: &'a Settings, colour_supported: bool) -> Self {
        Self {
            settings,
            colour_supported,
        }
    }

    pub fn format(&self, record: &Record) -> String {
        let location = if self.settings.location.enabled {
            pad(&self.location(record), LOCATION_WIDTH)
        } else {
            String::new()
        };

        let line = format!(
            "{} {}{} {} {}",
            self.timestamp(record),
            pad(&self.severity(record), SEVERITY_WIDTH),
            location,
            pad(&self.source(record), SOURCE_WIDTH),
            self.message(record)
        );

        if self.settings.colour.enabled {
            line
        } else {
            strip_colour(&line).into_owned()
        }
    }

    /// Rendered timestamp, or empty when timestamps are disabled
    pub fn timestamp(&self, record: &Record) -> String {
        let ts = &self.settings.timestamp;
        if !ts.enabled {
            return String::new();
        }
        let rendered = format_timestamp(&record.timestamp, &ts.format, ts.utc);
        if ts.brackets {
            format!("[{}]", rendered)
        } else {
            rendered
        }
    }

    /// Capitalised severity in brackets, coloured for known severities
    pub fn severity(&self, record: &Record) -> String {
        let label = record.severity.capitalised();
        let colour = &self.settings.colour;
        match record.severity.style() {
            Some(style) if colour.enabled => {
                let style = if colour.bold { style.bold() } else { style };
                let style = style.force_styling(colour.force || self.colour_supported);
                format!("[{}]", style.apply_to(label))
            }
            _ => format!("[{}]", label),
        }
    }

    pub fn location(&self, record: &Record) -> String {
        format!("[{}]", record.location.as_deref().unwrap_or(UNDEFINED_SOURCE))
    }

    pub fn source(&self, record: &Record) -> String {
        format!("[{}]", record.source)
    }

    pub fn message(&self, record: &Record) -> String {
        record.message.render()
    }
}

/// Format `record` under `settings` for a sink with the given colour capability
pub fn format_record(record: &Record, settings: &Settings, colour_supported: bool) -> String {
    Formatter::new(settings, colour_supported).format(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::severity::Severity;
    use chrono::{TimeZone, Utc};
    use console::Style;
    use serde_json::json;

    fn record(severity: &str) -> Record {
        Record::new(severity, "Tests", "Testing Output")
            .with_timestamp(Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap())
    }

    fn plain_settings() -> Settings {
        let mut settings = Settings::new();
        settings.set_timestamp_format("H:mm").unwrap();
        settings.enable_utc();
        settings
    }

    #[test]
    fn test_forced_colour_line() {
        let mut settings = plain_settings();
        settings.enable_force_colour();

        let line = format_record(&record("info"), &settings, false);
        let info = Style::new()
            .magenta()
            .bold()
            .force_styling(true)
            .apply_to("Info");
        assert_eq!(
            line,
            format!("10:30 [{}]      [Tests]         Testing Output", info)
        );
        assert_eq!(
            strip_colour(&line),
            "10:30 [Info]      [Tests]         Testing Output"
        );
    }

    #[test]
    fn test_upper_case_label_keeps_spelling_and_colour() {
        let mut settings = plain_settings();
        settings.enable_force_colour();

        let line = format_record(&record("INFO"), &settings, false);
        let info = Style::new()
            .magenta()
            .bold()
            .force_styling(true)
            .apply_to("INFO");
        assert_eq!(
            line,
            format!("10:30 [{}]      [Tests]         Testing Output", info)
        );
    }

    #[test]
    fn test_warn_label_is_uncoloured() {
        let mut settings = plain_settings();
        settings.enable_force_colour();

        let line = format_record(&record("warn"), &settings, false);
        assert_eq!(line, "10:30 [Warn]      [Tests]         Testing Output");
    }

    #[test]
    fn test_unsupported_sink_without_force_is_plain() {
        let settings = plain_settings();
        let line = format_record(&record("info"), &settings, false);
        assert_eq!(line, "10:30 [Info]      [Tests]         Testing Output");
    }

    #[test]
    fn test_colour_disabled_strips_everything() {
        let mut settings = plain_settings();
        settings.enable_force_colour().disable_colour();

        let mut rec = record("error");
        rec.message = format!("{}", Style::new().red().force_styling(true).apply_to("boom")).into();
        let line = format_record(&rec, &settings, true);
        assert_eq!(line, "10:30 [Error]     [Tests]         boom");
    }

    #[test]
    fn test_bold_can_be_disabled() {
        let mut settings = plain_settings();
        settings.enable_force_colour().disable_bold_colour();
        let formatter = Formatter::new(&settings, false);
        let expected = Style::new().green().force_styling(true).apply_to("Success");
        assert_eq!(
            formatter.severity(&record("success")),
            format!("[{}]", expected)
        );
    }

    #[test]
    fn test_unknown_severity_is_uncoloured() {
        let mut settings = plain_settings();
        settings.enable_force_colour();
        let formatter = Formatter::new(&settings, true);
        assert_eq!(formatter.severity(&record("notice")), "[Notice]");
    }

    #[test]
    fn test_timestamp_disabled_and_brackets() {
        let mut settings = plain_settings();
        settings.disable_timestamp();
        let line = format_record(&record("debug"), &settings, false);
        assert_eq!(line, " [Debug]     [Tests]         Testing Output");

        settings.enable_timestamp().enable_brackets();
        let line = format_record(&record("debug"), &settings, false);
        assert!(line.starts_with("[10:30] [Debug]"));
    }

    #[test]
    fn test_location_column() {
        let mut settings = plain_settings();
        settings.enable_location();
        let rec = record("info").with_location("build-host");
        let line = format_record(&rec, &settings, false);
        assert_eq!(
            line,
            "10:30 [Info]     [build-host]         [Tests]         Testing Output"
        );

        let line = format_record(&record("info"), &settings, false);
        assert!(line.contains("[undefined]"));
    }

    #[test]
    fn test_long_columns_are_not_truncated() {
        let settings = plain_settings();
        let mut rec = record("transport");
        rec.source = "AVeryLongSourceName".into();
        let line = format_record(&rec, &settings, false);
        assert_eq!(
            line,
            "10:30 [Transport] [AVeryLongSourceName] Testing Output"
        );
    }

    #[test]
    fn test_structured_message() {
        let settings = plain_settings();
        let mut rec = record("info");
        rec.message = json!({"user": "ada", "id": 7}).into();
        let line = format_record(&rec, &settings, false);
        assert!(line.ends_with(r#"{"id":7,"user":"ada"}"#));
    }

    #[test]
    fn test_pad_measures_visible_width() {
        let coloured = format!("{}", Style::new().cyan().force_styling(true).apply_to("[Hi]"));
        let padded = pad(&coloured, 8);
        assert_eq!(visible_len(&padded), 8);
        assert!(padded.ends_with("    "));

        assert_eq!(pad("abcdef", 3), "abcdef");
        assert_eq!(pad("", 2), "  ");
    }

    #[test]
    fn test_severity_capitalisation_in_column() {
        let settings = plain_settings();
        let mut rec = record("info");
        rec.severity = Severity::Warning;
        let line = format_record(&rec, &settings, false);
        assert!(line.starts_with("10:30 [Warning]   [Tests]"));
    }
}
