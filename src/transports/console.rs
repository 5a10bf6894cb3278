//! Console transport implementation

use crate::core::{Record, Result, Settings, Transport, TransportCore};
use console::Term;
use std::io::Write;

/// Writes each line to stdout
#[derive(Debug, Clone)]
pub struct ConsoleTransport {
    core: TransportCore,
    colour_supported: bool,
}

impl ConsoleTransport {
    /// Colour capability is detected from the attached terminal
    pub fn new() -> Self {
        Self::with_settings(Settings::new())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            core: TransportCore::with_settings(settings),
            colour_supported: Term::stdout().features().colors_supported(),
        }
    }

    /// Override the detected colour capability
    ///
    /// # Example
    ///
    /// ```
    /// use rust_log_router::transports::ConsoleTransport;
    /// use rust_log_router::Transport;
    ///
    /// let transport = ConsoleTransport::new().with_colour_support(false);
    /// assert!(!transport.colour_supported());
    /// ```
    #[must_use]
    pub fn with_colour_support(mut self, supported: bool) -> Self {
        self.colour_supported = supported;
        self
    }
}

impl Default for ConsoleTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for ConsoleTransport {
    fn core(&self) -> &TransportCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut TransportCore {
        &mut self.core
    }

    fn kind(&self) -> &'static str {
        "console"
    }

    fn output(&mut self, _record: &Record, line: &str) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", line)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        std::io::stdout().flush()?;
        Ok(())
    }

    fn colour_supported(&self) -> bool {
        self.colour_supported
    }
}
