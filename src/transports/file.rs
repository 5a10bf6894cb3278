//! File transport implementation
//!
//! One file per calendar day: the file name is the record's timestamp
//! rendered with the file-name pattern, so records always land in the file
//! for the day they were created.

use crate::core::format::strip_colour;
use crate::core::timestamp::format_timestamp;
use crate::core::{LoggerError, Record, Result, Settings, Transport, TransportCore};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const DEFAULT_FILE_NAME_FORMAT: &str = "YYYY-MM-DD";
pub const DEFAULT_FILE_EXTENSION: &str = ".txt";

/// Line terminator written after every record
pub const LINE_ENDING: &str = "\r\n";

pub struct FileTransport {
    core: TransportCore,
    directory: PathBuf,
    file_name_format: String,
    file_extension: String,
    writer: Option<(PathBuf, BufWriter<File>)>,
}

impl FileTransport {
    /// Write into the current directory
    pub fn new() -> Self {
        Self::with_settings(Settings::new())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            core: TransportCore::with_settings(settings),
            directory: PathBuf::from("."),
            file_name_format: DEFAULT_FILE_NAME_FORMAT.to_string(),
            file_extension: DEFAULT_FILE_EXTENSION.to_string(),
            writer: None,
        }
    }

    /// Create a transport writing into `directory`
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rust_log_router::transports::FileTransport;
    ///
    /// let transport = FileTransport::new()
    ///     .with_directory("/var/log/app")
    ///     .with_file_extension(".log");
    /// ```
    #[must_use]
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.set_file_path(directory);
        self
    }

    #[must_use]
    pub fn with_file_name_format(mut self, format: impl Into<String>) -> Self {
        self.set_file_name_format(format);
        self
    }

    #[must_use]
    pub fn with_file_extension(mut self, extension: impl Into<String>) -> Self {
        self.set_file_extension(extension);
        self
    }

    /// Directory receiving the log files
    pub fn set_file_path(&mut self, directory: impl Into<PathBuf>) -> &mut Self {
        self.directory = directory.into();
        self
    }

    pub fn file_path(&self) -> &Path {
        &self.directory
    }

    pub fn set_file_name_format(&mut self, format: impl Into<String>) -> &mut Self {
        self.file_name_format = format.into();
        self
    }

    pub fn file_name_format(&self) -> &str {
        &self.file_name_format
    }

    /// Appended verbatim to the rendered name, dot included
    pub fn set_file_extension(&mut self, extension: impl Into<String>) -> &mut Self {
        self.file_extension = extension.into();
        self
    }

    pub fn file_extension(&self) -> &str {
        &self.file_extension
    }

    /// Full path of the file a record is appended to
    pub fn path_for(&self, record: &Record) -> PathBuf {
        let name = format_timestamp(
            &record.timestamp,
            &self.file_name_format,
            self.core.settings().timestamp.utc,
        );
        self.directory
            .join(format!("{}{}", name, self.file_extension))
    }

    fn writer_for(&mut self, path: PathBuf) -> Result<&mut BufWriter<File>> {
        let stale = !matches!(&self.writer, Some((current, _)) if *current == path);
        if stale {
            if let Some((_, mut previous)) = self.writer.take() {
                previous.flush()?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| {
                    LoggerError::io_operation(
                        "opening log file",
                        path.display().to_string(),
                        e,
                    )
                })?;
            self.writer = Some((path, BufWriter::new(file)));
        }

        match self.writer.as_mut() {
            Some((_, writer)) => Ok(writer),
            None => Err(LoggerError::invalid_argument(
                "output",
                "file writer not initialized",
            )),
        }
    }
}

impl Default for FileTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FileTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileTransport")
            .field("core", &self.core)
            .field("directory", &self.directory)
            .field("file_name_format", &self.file_name_format)
            .field("file_extension", &self.file_extension)
            .finish()
    }
}

impl Transport for FileTransport {
    fn core(&self) -> &TransportCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut TransportCore {
        &mut self.core
    }

    fn kind(&self) -> &'static str {
        "file"
    }

    /// Files never carry colour: the setting is switched off on every write
    /// and any escape codes already in the line are removed
    fn output(&mut self, record: &Record, line: &str) -> Result<()> {
        self.core.settings_mut().disable_colour();

        if !self.directory.as_os_str().is_empty() && !self.directory.exists() {
            fs::create_dir_all(&self.directory).map_err(|e| {
                LoggerError::io_operation(
                    "creating log directory",
                    self.directory.display().to_string(),
                    e,
                )
            })?;
        }

        let path = self.path_for(record);
        let writer = self.writer_for(path)?;
        writer.write_all(strip_colour(line).as_bytes())?;
        writer.write_all(LINE_ENDING.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some((_, writer)) = self.writer.as_mut() {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for FileTransport {
    fn drop(&mut self) {
        if let Err(e) = Transport::flush(self) {
            eprintln!("[LOGGER ERROR] Failed to flush file transport: {}", e);
        }
    }
}
