//! Timestamp formatting utilities
//!
//! Renders Moment-style date patterns (`HH:mm:ss`, `YYYY-MM-DD`, `[literal]`)
//! with `chrono`. This is the only place that knows the pattern syntax; the
//! formatter and the file transport both go through [`TimestampPattern`].

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike, Utc};
use std::fmt;

/// Pattern applied when a transport has not configured one
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "HH:mm:ss[s] SSS[ms]";

/// Pattern used when an empty pattern is configured
const ISO_FALLBACK_FORMAT: &str = "YYYY-MM-DDTHH:mm:ssZ";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Year4,
    Year2,
    Quarter,
    MonthName,
    MonthShort,
    Month2,
    Month,
    DayOrdinal,
    Day2,
    Day,
    WeekdayName,
    WeekdayShort,
    WeekdayMin,
    Weekday,
    IsoWeekday,
    Hour2,
    Hour,
    Hour12Padded,
    Hour12,
    HourFromOne2,
    HourFromOne,
    Minute2,
    Minute,
    Second2,
    Second,
    Fraction(usize),
    MeridiemUpper,
    MeridiemLower,
    OffsetCompact,
    Offset,
    UnixSeconds,
    UnixMillis,
}

// Longest spelling first for every letter so that `MMMM` wins over `MM`.
const TOKENS: &[(&str, Token)] = &[
    ("YYYY", Token::Year4),
    ("YY", Token::Year2),
    ("Q", Token::Quarter),
    ("MMMM", Token::MonthName),
    ("MMM", Token::MonthShort),
    ("MM", Token::Month2),
    ("M", Token::Month),
    ("Do", Token::DayOrdinal),
    ("DD", Token::Day2),
    ("D", Token::Day),
    ("dddd", Token::WeekdayName),
    ("ddd", Token::WeekdayShort),
    ("dd", Token::WeekdayMin),
    ("d", Token::Weekday),
    ("E", Token::IsoWeekday),
    ("HH", Token::Hour2),
    ("H", Token::Hour),
    ("hh", Token::Hour12Padded),
    ("h", Token::Hour12),
    ("kk", Token::HourFromOne2),
    ("k", Token::HourFromOne),
    ("mm", Token::Minute2),
    ("m", Token::Minute),
    ("ss", Token::Second2),
    ("s", Token::Second),
    ("A", Token::MeridiemUpper),
    ("a", Token::MeridiemLower),
    ("ZZ", Token::OffsetCompact),
    ("Z", Token::Offset),
    ("X", Token::UnixSeconds),
    ("x", Token::UnixMillis),
];

/// A parsed date pattern
///
/// # Examples
///
/// ```
/// use rust_log_router::core::TimestampPattern;
/// use chrono::{TimeZone, Utc};
///
/// let ts = Utc.with_ymd_and_hms(2024, 3, 1, 9, 5, 7).unwrap();
/// let pattern = TimestampPattern::parse("YYYY-MM-DD H:mm:ss");
/// assert_eq!(pattern.format(&ts, true), "2024-03-01 9:05:07");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampPattern {
    source: String,
    tokens: Vec<Token>,
}

impl TimestampPattern {
    /// Parse a pattern; never fails, unknown characters are literal
    pub fn parse(pattern: &str) -> Self {
        let effective = if pattern.is_empty() {
            ISO_FALLBACK_FORMAT
        } else {
            pattern
        };
        Self {
            source: pattern.to_string(),
            tokens: tokenize(effective),
        }
    }

    /// Whether every `[` escape in the pattern is closed
    pub fn is_well_formed(pattern: &str) -> bool {
        let mut open = false;
        for c in pattern.chars() {
            match (open, c) {
                (false, '[') => open = true,
                (true, ']') => open = false,
                (true, '[') => return false,
                _ => {}
            }
        }
        !open
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Render in UTC or in the local time zone
    pub fn format(&self, timestamp: &DateTime<Utc>, utc: bool) -> String {
        if utc {
            self.render(timestamp)
        } else {
            self.render(&timestamp.with_timezone(&Local))
        }
    }

    /// Render a timestamp in whatever zone it carries
    pub fn render<Tz>(&self, datetime: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let mut out = String::with_capacity(self.source.len() + 16);
        for token in &self.tokens {
            render_token(&mut out, token, datetime);
        }
        out
    }
}

impl Default for TimestampPattern {
    fn default() -> Self {
        Self::parse(DEFAULT_TIMESTAMP_FORMAT)
    }
}

impl fmt::Display for TimestampPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Render `timestamp` with `pattern` in one call
pub fn format_timestamp(timestamp: &DateTime<Utc>, pattern: &str, utc: bool) -> String {
    TimestampPattern::parse(pattern).format(timestamp, utc)
}

fn push_literal(tokens: &mut Vec<Token>, text: &str) {
    if let Some(Token::Literal(last)) = tokens.last_mut() {
        last.push_str(text);
    } else {
        tokens.push(Token::Literal(text.to_string()));
    }
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut rest = pattern;

    while let Some(c) = rest.chars().next() {
        if c == '[' {
            // An unterminated escape leaves the bracket as a plain character
            if let Some(end) = rest[1..].find(['[', ']']) {
                if rest.as_bytes()[1 + end] == b']' {
                    push_literal(&mut tokens, &rest[1..1 + end]);
                    rest = &rest[end + 2..];
                    continue;
                }
            }
            push_literal(&mut tokens, "[");
            rest = &rest[1..];
            continue;
        }

        if c == 'S' {
            let run = rest.chars().take_while(|&ch| ch == 'S').count().min(9);
            tokens.push(Token::Fraction(run));
            rest = &rest[run..];
            continue;
        }

        if let Some((spelling, token)) = TOKENS.iter().find(|(s, _)| rest.starts_with(s)) {
            tokens.push(token.clone());
            rest = &rest[spelling.len()..];
            continue;
        }

        let width = c.len_utf8();
        push_literal(&mut tokens, &rest[..width]);
        rest = &rest[width..];
    }

    tokens
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

fn render_token<Tz>(out: &mut String, token: &Token, dt: &DateTime<Tz>)
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    use std::fmt::Write;

    // Writing into a String cannot fail
    let _ = match token {
        Token::Literal(text) => out.write_str(text),
        Token::Year4 => write!(out, "{:04}", dt.year()),
        Token::Year2 => write!(out, "{:02}", dt.year().rem_euclid(100)),
        Token::Quarter => write!(out, "{}", dt.month0() / 3 + 1),
        Token::MonthName => write!(out, "{}", dt.format("%B")),
        Token::MonthShort => write!(out, "{}", dt.format("%b")),
        Token::Month2 => write!(out, "{:02}", dt.month()),
        Token::Month => write!(out, "{}", dt.month()),
        Token::DayOrdinal => write!(out, "{}{}", dt.day(), ordinal_suffix(dt.day())),
        Token::Day2 => write!(out, "{:02}", dt.day()),
        Token::Day => write!(out, "{}", dt.day()),
        Token::WeekdayName => write!(out, "{}", dt.format("%A")),
        Token::WeekdayShort => write!(out, "{}", dt.format("%a")),
        Token::WeekdayMin => {
            let short = dt.format("%a").to_string();
            out.write_str(&short[..2.min(short.len())])
        }
        Token::Weekday => write!(out, "{}", dt.weekday().num_days_from_sunday()),
        Token::IsoWeekday => write!(out, "{}", dt.weekday().number_from_monday()),
        Token::Hour2 => write!(out, "{:02}", dt.hour()),
        Token::Hour => write!(out, "{}", dt.hour()),
        Token::Hour12Padded => write!(out, "{:02}", dt.hour12().1),
        Token::Hour12 => write!(out, "{}", dt.hour12().1),
        Token::HourFromOne2 => write!(out, "{:02}", if dt.hour() == 0 { 24 } else { dt.hour() }),
        Token::HourFromOne => write!(out, "{}", if dt.hour() == 0 { 24 } else { dt.hour() }),
        Token::Minute2 => write!(out, "{:02}", dt.minute()),
        Token::Minute => write!(out, "{}", dt.minute()),
        Token::Second2 => write!(out, "{:02}", dt.second()),
        Token::Second => write!(out, "{}", dt.second()),
        Token::Fraction(digits) => {
            let nanos = format!("{:09}", dt.nanosecond() % 1_000_000_000);
            out.write_str(&nanos[..*digits])
        }
        Token::MeridiemUpper => out.write_str(if dt.hour12().0 { "PM" } else { "AM" }),
        Token::MeridiemLower => out.write_str(if dt.hour12().0 { "pm" } else { "am" }),
        Token::OffsetCompact => write!(out, "{}", dt.format("%z")),
        Token::Offset => write!(out, "{}", dt.format("%:z")),
        Token::UnixSeconds => write!(out, "{}", dt.timestamp()),
        Token::UnixMillis => write!(out, "{}", dt.timestamp_millis()),
    };
}
