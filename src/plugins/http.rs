//! HTTP exchange adapter
//!
//! Turns one completed request/response pair into one record: the status
//! code picks the severity and the message lays out client address, status,
//! method, route and response time in fixed columns.

use super::plugin::{Plugin, PluginAdapter};
use crate::core::format::pad;
use crate::core::{Fault, LoggerError, RecordDraft, Result, Severity};
use console::Style;
use serde::{Deserialize, Serialize};

/// Source used for HTTP records unless overridden
pub const HTTP_SOURCE: &str = "Http";

const IP_WIDTH: usize = 18;
const STATUS_WIDTH: usize = 6;
const METHOD_WIDTH: usize = 8;
const ROUTE_WIDTH: usize = 50;

/// One completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpExchange {
    pub ip: String,
    pub host: String,
    pub route: String,
    pub method: String,
    pub status_code: u16,
    pub response_time_ms: u64,
}

impl HttpExchange {
    /// Client address from proxy headers, falling back to the peer address
    pub fn client_ip(
        forwarded_for: Option<&str>,
        real_ip: Option<&str>,
        remote_addr: Option<&str>,
    ) -> String {
        forwarded_for
            .or(real_ip)
            .or(remote_addr)
            .unwrap_or("0.0.0.0")
            .to_string()
    }
}

/// Severity for a status code; codes below 100 have none
pub fn classify(status_code: u16) -> Option<Severity> {
    match status_code {
        500.. => Some(Severity::Error),
        400..=499 => Some(Severity::Warning),
        100..=399 => Some(Severity::Info),
        _ => None,
    }
}

/// Map IPv6 loopback and IPv4-mapped addresses to plain IPv4
pub fn normalise_ip(ip: &str) -> &str {
    if ip == "::1" {
        "127.0.0.1"
    } else {
        ip.strip_prefix("::ffff:").unwrap_or(ip)
    }
}

fn bold(style: Style) -> Style {
    style.bold().force_styling(true)
}

fn status_style(status_code: u16) -> Style {
    let style = Style::new();
    match status_code {
        500.. => bold(style.red()),
        400..=499 => bold(style.yellow()),
        300..=399 => bold(style.cyan()),
        _ => bold(style.green()),
    }
}

fn method_style(method: &str) -> Option<Style> {
    let style = Style::new();
    match method {
        "DELETE" => Some(bold(style.red())),
        "GET" => Some(bold(style.green())),
        "OPTIONS" => Some(bold(style.cyan())),
        "PATCH" | "PUT" => Some(bold(style.magenta())),
        "POST" => Some(bold(style.yellow())),
        _ => None,
    }
}

fn response_time_style(millis: u64) -> Style {
    let style = Style::new();
    match millis {
        0..=49 => bold(style.green()),
        50..=249 => bold(style.yellow()),
        _ => bold(style.red()),
    }
}

/// Plugin adapter for HTTP servers
#[derive(Debug, Clone)]
pub struct HttpPlugin {
    plugin: Plugin,
    source: String,
}

impl HttpPlugin {
    pub fn new() -> Self {
        Self::with_source(HTTP_SOURCE)
    }

    /// Use a framework-specific source label, e.g. `"Express"`
    pub fn with_source(source: impl Into<String>) -> Self {
        Self {
            plugin: Plugin::new(),
            source: source.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Render the message columns for an exchange
    pub fn format(&self, exchange: &HttpExchange) -> String {
        let ip = pad(normalise_ip(&exchange.ip), IP_WIDTH);
        let status = status_style(exchange.status_code).apply_to(exchange.status_code);
        let method = match method_style(&exchange.method) {
            Some(style) => style.apply_to(&exchange.method).to_string(),
            None => exchange.method.clone(),
        };
        let route = format!("{}{}", exchange.host, exchange.route);
        let elapsed = response_time_style(exchange.response_time_ms)
            .apply_to(format!("{} ms", exchange.response_time_ms));

        format!(
            "{}{}{}{} {}",
            ip,
            pad(&status.to_string(), STATUS_WIDTH),
            pad(&method, METHOD_WIDTH),
            pad(&route, ROUTE_WIDTH),
            elapsed
        )
    }

    /// Build the record draft for an exchange; the severity is absent for
    /// status codes below 100
    pub fn draft(&self, exchange: &HttpExchange) -> Result<RecordDraft> {
        let mut draft = RecordDraft::new()
            .source(self.source.as_str())
            .message(self.format(exchange))
            .extra(serde_json::to_value(exchange)?);
        if let Some(severity) = classify(exchange.status_code) {
            draft = draft.severity(severity);
        }
        Ok(draft)
    }

    /// Escalate a failure observed while serving a request
    pub fn report_failure(&self, fault: Fault) -> Result<()> {
        self.plugin.report_error(LoggerError::Escalated(fault))
    }
}

impl Default for HttpPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginAdapter for HttpPlugin {
    type Event = HttpExchange;

    fn plugin(&self) -> &Plugin {
        &self.plugin
    }

    fn input(&self, exchange: HttpExchange) -> Result<()> {
        self.plugin.submit(self.draft(&exchange)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::format::strip_colour;
    use crate::core::Record;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use uuid::Uuid;

    fn exchange(status_code: u16, method: &str, response_time_ms: u64) -> HttpExchange {
        HttpExchange {
            ip: "::1".to_string(),
            host: "localhost:3000".to_string(),
            route: "/".to_string(),
            method: method.to_string(),
            status_code,
            response_time_ms,
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(503), Some(Severity::Error));
        assert_eq!(classify(404), Some(Severity::Warning));
        assert_eq!(classify(302), Some(Severity::Info));
        assert_eq!(classify(101), Some(Severity::Info));
        assert_eq!(classify(200), Some(Severity::Info));
        assert_eq!(classify(99), None);
    }

    #[test]
    fn test_normalise_ip() {
        assert_eq!(normalise_ip("::1"), "127.0.0.1");
        assert_eq!(normalise_ip("::ffff:127.0.0.2"), "127.0.0.2");
        assert_eq!(normalise_ip("10.1.2.3"), "10.1.2.3");
    }

    #[test]
    fn test_client_ip_fallbacks() {
        assert_eq!(
            HttpExchange::client_ip(Some("1.2.3.4"), Some("5.6.7.8"), None),
            "1.2.3.4"
        );
        assert_eq!(HttpExchange::client_ip(None, None, Some("::1")), "::1");
        assert_eq!(HttpExchange::client_ip(None, None, None), "0.0.0.0");
    }

    #[test]
    fn test_format_columns() {
        let plugin = HttpPlugin::new();
        let message = plugin.format(&exchange(200, "GET", 12));
        assert_eq!(
            strip_colour(&message),
            format!(
                "{:<18}{:<6}{:<8}{:<50} 12 ms",
                "127.0.0.1", "200", "GET", "localhost:3000/"
            )
        );

        let get = Style::new().green().bold().force_styling(true).apply_to("GET");
        assert!(message.contains(&get.to_string()));
    }

    #[test]
    fn test_status_and_method_colours() {
        let plugin = HttpPlugin::new();
        let message = plugin.format(&exchange(500, "DELETE", 300));
        let status = Style::new().red().bold().force_styling(true).apply_to(500);
        let method = Style::new().red().bold().force_styling(true).apply_to("DELETE");
        let elapsed = Style::new()
            .red()
            .bold()
            .force_styling(true)
            .apply_to("300 ms");
        assert!(message.contains(&status.to_string()));
        assert!(message.contains(&method.to_string()));
        assert!(message.ends_with(&elapsed.to_string()));

        let message = plugin.format(&exchange(200, "HEAD", 100));
        assert!(strip_colour(&message).contains("HEAD    "));
        let elapsed = Style::new()
            .yellow()
            .bold()
            .force_styling(true)
            .apply_to("100 ms");
        assert!(message.ends_with(&elapsed.to_string()));
    }

    #[test]
    fn test_input_emits_one_record() {
        let plugin = HttpPlugin::with_source("Express");
        plugin.plugin().set_namespace("http");

        let seen: Arc<Mutex<Vec<Record>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        plugin.plugin().attach(Uuid::new_v4(), move |record| {
            sink.lock().push(record.clone());
            Ok(())
        });

        plugin.input(exchange(404, "POST", 5)).unwrap();
        let records = seen.lock();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].severity, Severity::Warning);
        assert_eq!(records[0].source, "Express");
        assert_eq!(records[0].namespace, "http");
        let extra = records[0].extra.as_ref().unwrap();
        assert_eq!(extra["status_code"], 404);
    }

    #[test]
    fn test_input_without_severity_fails() {
        let plugin = HttpPlugin::new();
        let err = plugin.input(exchange(42, "GET", 1)).unwrap_err();
        assert!(matches!(err, LoggerError::MissingParameters { .. }));
    }
}
