//! Property-based tests for rust_log_router using proptest

use proptest::prelude::*;
use rust_log_router::core::format::{pad, strip_colour, visible_len};
use rust_log_router::prelude::*;

fn known_severity() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Debug),
        Just(Severity::Transport),
        Just(Severity::Info),
        Just(Severity::Success),
        Just(Severity::Warning),
        Just(Severity::Error),
    ]
}

// ============================================================================
// Padding Tests
// ============================================================================

proptest! {
    /// Padding reaches the width exactly, or leaves longer text untouched
    #[test]
    fn test_pad_width(text in "[a-zA-Z0-9 ]{0,30}", width in 0usize..40) {
        let padded = pad(&text, width);
        prop_assert!(padded.starts_with(&text));
        prop_assert_eq!(visible_len(&padded), visible_len(&text).max(width));
    }

    /// Escape codes do not count towards the width
    #[test]
    fn test_pad_ignores_colour(text in "[a-z]{1,10}", width in 0usize..20) {
        let coloured = console::Style::new()
            .red()
            .force_styling(true)
            .apply_to(&text)
            .to_string();
        let padded = pad(&coloured, width);
        prop_assert_eq!(strip_colour(&padded).into_owned(), pad(&text, width));
    }
}

// ============================================================================
// Severity Tests
// ============================================================================

proptest! {
    /// Lower-case names parse to the known variant
    #[test]
    fn test_severity_label_roundtrip(severity in known_severity()) {
        prop_assert_eq!(Severity::from(severity.as_str()), severity);
    }

    /// Other spellings keep their label but still resolve a colour
    #[test]
    fn test_upper_case_label_is_kept(severity in known_severity()) {
        let label = severity.as_str().to_uppercase();
        let parsed = Severity::from(label.as_str());
        prop_assert_eq!(parsed.as_str(), label.as_str());
        prop_assert_eq!(parsed.known(), Some(severity));
        prop_assert!(parsed.style().is_some());
    }

    /// Unknown labels are carried, not rejected
    #[test]
    fn test_unknown_severity_is_kept(label in "x[a-z]{2,8}") {
        let severity = Severity::from(label.as_str());
        prop_assert!(!severity.is_known());
        prop_assert_eq!(severity.as_str(), label.as_str());
    }
}

// ============================================================================
// Settings Tests
// ============================================================================

proptest! {
    /// Cleaning twice changes nothing the first pass did not
    #[test]
    fn test_clean_is_idempotent(
        whitelist in prop::collection::vec("[a-c]{0,2}", 0..5),
        blacklist in prop::collection::vec("[a-c]{0,2}", 0..5),
        format in "[A-Za-z:\\[\\] ]{0,12}",
    ) {
        let mut settings = Settings::new();
        settings.source.whitelist = whitelist;
        settings.source.blacklist = blacklist;
        settings.timestamp.format = format;

        settings.clean();
        prop_assert!(settings.is_valid());
        let once = settings.clone();
        settings.clean();
        prop_assert_eq!(settings, once);
    }

    /// Valid settings are left alone by clean
    #[test]
    fn test_clean_keeps_valid_settings(sources in prop::collection::hash_set("[a-z]{1,6}", 0..6)) {
        let mut settings = Settings::new();
        for source in &sources {
            settings.add_to_source_whitelist(source).unwrap();
        }
        let before = settings.clone();
        settings.clean();
        prop_assert_eq!(settings, before);
    }

    /// The whitelist admits exactly its members; the blacklist admits the rest
    #[test]
    fn test_source_filters_are_complementary(
        listed in prop::collection::hash_set("[a-z]{1,4}", 1..5),
        probe in "[a-z]{1,4}",
    ) {
        let mut white = Settings::new();
        let mut black = Settings::new();
        for source in &listed {
            white.add_to_source_whitelist(source).unwrap();
            black.add_to_source_blacklist(source).unwrap();
        }
        white.set_source_control(Some(SourceControl::Whitelist));
        black.set_source_control(Some(SourceControl::Blacklist));

        let member = listed.contains(&probe);
        prop_assert_eq!(white.source.allows(&probe), member);
        prop_assert_eq!(black.source.allows(&probe), !member);
    }
}

// ============================================================================
// Formatting Tests
// ============================================================================

proptest! {
    /// Disabled colour never leaks escape codes, whatever the message holds
    #[test]
    fn test_disabled_colour_is_plain(severity in known_severity(), message in "[ -~]{0,40}") {
        let buffer = SharedBuffer::new();
        let mut transport = WriterTransport::new(buffer.clone()).with_colour_support(true);
        transport.settings_mut().enable_force_colour().disable_colour();

        let styled = console::Style::new().blue().force_styling(true).apply_to(&message);
        transport
            .input(&Record::new(severity, "Props", styled.to_string()))
            .unwrap();

        let contents = buffer.contents();
        prop_assert_eq!(strip_colour(&contents).into_owned(), contents.clone());
        prop_assert!(contents.trim_end_matches('\n').ends_with(&message));
    }
}
