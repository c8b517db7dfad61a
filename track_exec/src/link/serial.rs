//! [`ByteLink`] implementation for a serial port.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::debug;
use serialport::SerialPort;
use std::{
    collections::VecDeque,
    io::{ErrorKind, Read, Write},
    time::Duration,
};

use super::{ByteLink, LinkError};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Largest number of bytes pulled from the port in one read.
const READ_CHUNK_LEN: usize = 256;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A serial port link.
///
/// Bytes are read from the port in chunks into an internal buffer so that the next byte can be
/// peeked at without being consumed.
pub struct SerialLink {
    port: Box<dyn SerialPort>,
    rx: VecDeque<u8>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SerialLink {
    /// Open the serial port at `path`.
    ///
    /// `read_timeout` bounds how long a single peek or read will wait for data.
    pub fn open(path: &str, baud_rate: u32, read_timeout: Duration) -> Result<Self, LinkError> {
        let port = serialport::new(path, baud_rate)
            .timeout(read_timeout)
            .open()
            .map_err(|e| LinkError::OpenError(path.to_string(), e))?;

        debug!("Opened serial port {} at {} baud", path, baud_rate);

        Ok(Self {
            port,
            rx: VecDeque::with_capacity(READ_CHUNK_LEN),
        })
    }

    /// Make sure at least one byte is buffered, waiting up to the read timeout.
    ///
    /// Returns `false` if nothing arrived.
    fn fill(&mut self) -> Result<bool, LinkError> {
        if !self.rx.is_empty() {
            return Ok(true);
        }

        let mut chunk = [0u8; READ_CHUNK_LEN];

        match self.port.read(&mut chunk) {
            Ok(n) => {
                self.rx.extend(&chunk[..n]);
                Ok(n > 0)
            }
            Err(ref e) if e.kind() == ErrorKind::TimedOut => Ok(false),
            Err(e) => Err(LinkError::Io(e)),
        }
    }
}

impl ByteLink for SerialLink {
    fn bytes_available(&mut self) -> Result<usize, LinkError> {
        Ok(self.rx.len() + self.port.bytes_to_read()? as usize)
    }

    fn peek_byte(&mut self) -> Result<Option<u8>, LinkError> {
        self.fill()?;
        Ok(self.rx.front().copied())
    }

    fn read_byte(&mut self) -> Result<Option<u8>, LinkError> {
        self.fill()?;
        Ok(self.rx.pop_front())
    }

    fn write_line(&mut self, line: &str) -> Result<(), LinkError> {
        self.port.write_all(line.as_bytes())?;
        self.port.write_all(b"\r\n")?;
        Ok(())
    }
}
