//! [`ByteLink`] backed by memory, used for replaying captured input and for tests.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::collections::VecDeque;

use super::{ByteLink, LinkError};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// An in-memory byte link.
///
/// Bytes pushed in are read back out in order, and lines written to the link are kept so they
/// can be inspected.
#[derive(Debug, Default)]
pub struct BufferLink {
    rx: VecDeque<u8>,
    tx_lines: Vec<String>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl BufferLink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes to be read from the link.
    pub fn push<B: AsRef<[u8]>>(&mut self, bytes: B) {
        self.rx.extend(bytes.as_ref())
    }

    /// Number of bytes still waiting to be read.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Lines written to the link so far.
    pub fn written_lines(&self) -> &[String] {
        &self.tx_lines
    }
}

impl From<&str> for BufferLink {
    fn from(s: &str) -> Self {
        let mut link = Self::new();
        link.push(s);
        link
    }
}

impl ByteLink for BufferLink {
    fn bytes_available(&mut self) -> Result<usize, LinkError> {
        Ok(self.rx.len())
    }

    fn peek_byte(&mut self) -> Result<Option<u8>, LinkError> {
        Ok(self.rx.front().copied())
    }

    fn read_byte(&mut self) -> Result<Option<u8>, LinkError> {
        Ok(self.rx.pop_front())
    }

    fn write_line(&mut self, line: &str) -> Result<(), LinkError> {
        self.tx_lines.push(line.to_string());
        Ok(())
    }
}
