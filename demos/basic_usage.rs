//! Basic logger usage example
//!
//! Demonstrates the default console transport, every built-in severity and
//! a few per-transport settings.
//!
//! Run with: cargo run --example basic_usage

use rust_log_router::prelude::*;

fn main() -> Result<()> {
    println!("=== Rust Log Router - Basic Usage Example ===\n");

    // The default logger writes to a console transport named "console"
    let logger = Logger::new();

    println!("1. Logging at every built-in severity:");
    logger.debug("Example", "This is a debug message")?;
    logger.transport("Example", "This is a transport message")?;
    logger.info("Example", "This is an info message")?;
    logger.success("Example", "This is a success message")?;
    logger.warning("Example", "This is a warning message")?;
    logger.error("Example", "This is an error message")?;

    println!("\n2. Changing console settings:");
    logger.configure("console", SettingsCommand::EnableBrackets)?;
    logger.configure("console", SettingsCommand::SetTimestampFormat("YYYY-MM-DD HH:mm".into()))?;
    logger.configure("console", SettingsCommand::EnableLocation)?;
    logger.info("Example", "Bracketed timestamp with location")?;

    println!("\n3. Source whitelist - only 'Database' gets through:");
    logger.configure(Scope::All, SettingsCommand::AddToSourceWhitelist("Database".into()))?;
    logger.configure(
        Scope::All,
        SettingsCommand::SetSourceControl(Some(SourceControl::Whitelist)),
    )?;
    logger.info("Cache", "Cache message (hidden)")?;
    logger.info("Database", "Database message (visible)")?;

    println!("\n4. Errors:");
    logger.configure(Scope::All, SettingsCommand::DisableSourceControl)?;
    let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "config.json missing");
    logger.trace_error("Loader", missing)?;

    logger.on_error(|err| eprintln!("Escalated: {}", err));
    logger.fatal(Fault::new("Error", "Unrecoverable state"))?;

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
