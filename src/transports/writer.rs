//! Transport over any `io::Write` sink

use crate::core::{Record, Result, Transport, TransportCore};
use parking_lot::Mutex;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

/// Writes each line, newline terminated, to an injected writer
pub struct WriterTransport<W: Write + Send + Sync> {
    core: TransportCore,
    writer: W,
    colour_supported: bool,
}

impl<W: Write + Send + Sync> WriterTransport<W> {
    /// The writer is treated as colour-incapable until told otherwise
    pub fn new(writer: W) -> Self {
        Self {
            core: TransportCore::new(),
            writer,
            colour_supported: false,
        }
    }

    #[must_use]
    pub fn with_colour_support(mut self, supported: bool) -> Self {
        self.colour_supported = supported;
        self
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send + Sync> fmt::Debug for WriterTransport<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterTransport")
            .field("core", &self.core)
            .field("colour_supported", &self.colour_supported)
            .finish()
    }
}

impl<W: Write + Send + Sync> Transport for WriterTransport<W> {
    fn core(&self) -> &TransportCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut TransportCore {
        &mut self.core
    }

    fn kind(&self) -> &'static str {
        "writer"
    }

    fn output(&mut self, _record: &Record, line: &str) -> Result<()> {
        writeln!(self.writer, "{}", line)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn colour_supported(&self) -> bool {
        self.colour_supported
    }
}

/// In-memory sink whose clones share one buffer
///
/// Handy for capturing output in tests and demos.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn clear(&self) {
        self.bytes.lock().clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
