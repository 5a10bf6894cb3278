//! Transport implementations

pub mod console;
#[cfg(feature = "file")]
pub mod file;
pub mod writer;

pub use console::ConsoleTransport;
#[cfg(feature = "file")]
pub use file::FileTransport;
pub use writer::{SharedBuffer, WriterTransport};
