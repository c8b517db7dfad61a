//! # Byte Link Module
//!
//! Abstracts over the byte stream pointing commands arrive on. On the real
//! tracker this is a serial port fed by the ground station's tracking
//! software, in tests it is an in-memory buffer.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// In-memory [`ByteLink`] implementation.
mod buffer;

/// Serial port [`ByteLink`] implementation.
mod serial;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use buffer::BufferLink;
pub use serial::SerialLink;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A bidirectional byte stream.
///
/// Reads are non-blocking with respect to whole frames: `peek_byte` and `read_byte` wait at most
/// the link's read timeout and return `None` if nothing arrived.
pub trait ByteLink {
    /// Number of bytes which can be read without waiting.
    fn bytes_available(&mut self) -> Result<usize, LinkError>;

    /// Look at the next byte without consuming it.
    fn peek_byte(&mut self) -> Result<Option<u8>, LinkError>;

    /// Consume the next byte.
    fn read_byte(&mut self) -> Result<Option<u8>, LinkError>;

    /// Send a line of text back over the link.
    fn write_line(&mut self, line: &str) -> Result<(), LinkError>;
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors which can occur on a [`ByteLink`].
#[derive(thiserror::Error, Debug)]
pub enum LinkError {
    #[error("Could not open serial port {0}: {1}")]
    OpenError(String, serialport::Error),

    #[error("Serial port error: {0}")]
    PortError(#[from] serialport::Error),

    #[error("I/O error on the link: {0}")]
    Io(#[from] std::io::Error),
}
