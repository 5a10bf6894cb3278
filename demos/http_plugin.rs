//! HTTP plugin example
//!
//! Feeds a few request/response pairs through the HTTP plugin into a
//! dedicated access-log transport.
//!
//! Run with: cargo run --example http_plugin

use rust_log_router::prelude::*;

fn exchange(method: &str, route: &str, status_code: u16, response_time_ms: u64) -> HttpExchange {
    HttpExchange {
        ip: HttpExchange::client_ip(None, None, Some("::1")),
        host: "localhost:3000".to_string(),
        route: route.to_string(),
        method: method.to_string(),
        status_code,
        response_time_ms,
    }
}

fn main() -> Result<()> {
    println!("=== Rust Log Router - HTTP Plugin Example ===\n");

    let access_log = SharedBuffer::new();
    let logger = Logger::builder()
        .transport("access", WriterTransport::new(access_log.clone()))
        .build()?;

    // The console keeps application records, the access log keeps requests
    logger.subscribe_namespace("console", "logger")?;
    logger.subscribe_namespace("access", "http")?;

    let http = HttpPlugin::with_source("Express");
    http.plugin().set_namespace("http");
    logger.add_plugin("express", http.plugin())?;

    logger.info("App", "Listening on :3000")?;

    http.input(exchange("GET", "/", 200, 12))?;
    http.input(exchange("POST", "/users", 201, 87))?;
    http.input(exchange("DELETE", "/users/7", 404, 5))?;
    http.input(exchange("PUT", "/users/8", 500, 310))?;

    println!("\nAccess log:");
    for line in access_log.lines() {
        println!("{}", line);
    }

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
