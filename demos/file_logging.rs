//! File logging example
//!
//! Demonstrates logging to both the console and a daily file.
//!
//! Run with: cargo run --example file_logging

use rust_log_router::prelude::*;

fn main() -> Result<()> {
    println!("=== Rust Log Router - File Logging Example ===\n");

    let logger = Logger::builder()
        .transport(
            "file",
            FileTransport::new()
                .with_directory("logs")
                .with_file_extension(".log"),
        )
        .build()?;

    println!("1. Logging to both console and file:");

    logger.info("App", "Application started")?;
    logger.debug("Config", "Loading configuration...")?;
    logger.success("Config", "Configuration loaded successfully")?;
    logger.warning("Config", "Using default settings for some options")?;
    logger.info("Database", "Connecting to database...")?;
    logger.success("Database", "Database connection established")?;
    logger.error("Plugins", "Failed to load optional plugin")?;

    println!("\n2. Silencing the console, keeping the file:");
    logger.disable_transport("console")?;

    for i in 1..=5 {
        logger.info("Worker", format!("Processing item {}/5", i))?;
        if i == 3 {
            logger.warning("Worker", "Item 3 took longer than expected")?;
        }
    }

    logger.enable_transport("console")?;
    logger.info("App", "All operations completed")?;

    // Flush to ensure all lines are on disk
    logger.flush()?;

    println!("\n=== Example completed successfully! ===");
    println!("Check the 'logs' directory for today's log file");

    Ok(())
}
