//! # Command Parser Module
//!
//! Pointing commands arrive as loosely formatted text, for example `AZ123.4 EL45.6`. A frame starts
//! with the marker character, followed by two decimal numbers. Anything that isn't part of a number
//! (labels, whitespace, separators) is skipped. There is no terminator or checksum, the next marker
//! simply starts the next frame.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::trace;

use crate::link::{ByteLink, LinkError};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A raw pointing command, as recieved.
///
/// The values have had their fractional part discarded but are not normalised.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointingCmd {
    /// Units: degrees
    pub az_deg: i32,

    /// Units: degrees
    pub el_deg: i32,
}

/// Extracts pointing commands from a [`ByteLink`].
#[derive(Clone, Copy, Debug)]
pub struct CommandParser {
    marker: u8,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl CommandParser {
    pub fn new(marker: u8) -> Self {
        Self { marker }
    }

    pub fn marker(&self) -> u8 {
        self.marker
    }

    /// Read all commands currently available on the link.
    ///
    /// Draining stops at the first byte that doesn't start a frame. That byte is consumed, anything
    /// after it is left on the link for the next call.
    pub fn drain<L>(&self, link: &mut L) -> Result<Vec<PointingCmd>, LinkError>
    where
        L: ByteLink + ?Sized,
    {
        let mut cmds = Vec::new();

        while link.bytes_available()? > 0 {
            match link.read_byte()? {
                Some(b) if b == self.marker => (),
                Some(b) => {
                    trace!("Stopping drain on non-marker byte {:#04x}", b);
                    break;
                }
                None => break,
            }

            let az = scan_number(link)?;
            let el = scan_number(link)?;

            let cmd = PointingCmd {
                az_deg: truncate(az),
                el_deg: truncate(el),
            };
            trace!("Parsed {:?} (raw {} {})", cmd, az, el);

            cmds.push(cmd);
        }

        Ok(cmds)
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Scan the next decimal number from the link.
///
/// Leading bytes which can't start a number are consumed and ignored. The byte after the number is
/// left on the link. If the link runs dry before a number starts, or the token holds no digits, the
/// value is zero.
///
/// Only bytes already received are looked at. A frame's final token has no terminator, so it ends
/// when the received bytes run out.
fn scan_number<L>(link: &mut L) -> Result<f64, LinkError>
where
    L: ByteLink + ?Sized,
{
    // Skip up to the start of the token
    loop {
        match peek_available(link)? {
            None => return Ok(0.0),
            Some(b) if starts_number(b) => break,
            Some(_) => {
                link.read_byte()?;
            }
        }
    }

    let mut token = String::new();
    let mut seen_point = false;

    while let Some(b) = peek_available(link)? {
        let accept = match b {
            b'0'..=b'9' => true,
            b'.' if !seen_point => {
                seen_point = true;
                true
            }
            b'-' => token.is_empty(),
            _ => false,
        };

        if !accept {
            break;
        }

        token.push(b as char);
        link.read_byte()?;
    }

    Ok(token.parse().unwrap_or(0.0))
}

/// Peek the next byte, or `None` if nothing has been received yet.
fn peek_available<L>(link: &mut L) -> Result<Option<u8>, LinkError>
where
    L: ByteLink + ?Sized,
{
    if link.bytes_available()? == 0 {
        return Ok(None);
    }

    link.peek_byte()
}

fn starts_number(b: u8) -> bool {
    b.is_ascii_digit() || b == b'-' || b == b'.'
}

/// Discard the fractional part, saturating at the limits of `i32`.
fn truncate(value: f64) -> i32 {
    value.trunc() as i32
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::link::BufferLink;

    fn cmd(az_deg: i32, el_deg: i32) -> PointingCmd {
        PointingCmd { az_deg, el_deg }
    }

    /// A link that fails the test if it is read while empty, standing in for a serial port that
    /// would wait out its read timeout.
    struct NoWaitLink(BufferLink);

    impl ByteLink for NoWaitLink {
        fn bytes_available(&mut self) -> Result<usize, LinkError> {
            self.0.bytes_available()
        }

        fn peek_byte(&mut self) -> Result<Option<u8>, LinkError> {
            assert!(self.0.pending() > 0, "peeked an empty link");
            self.0.peek_byte()
        }

        fn read_byte(&mut self) -> Result<Option<u8>, LinkError> {
            assert!(self.0.pending() > 0, "read an empty link");
            self.0.read_byte()
        }

        fn write_line(&mut self, line: &str) -> Result<(), LinkError> {
            self.0.write_line(line)
        }
    }

    #[test]
    fn test_single_frame() {
        let mut link = BufferLink::from("AZ123.4 EL45.6");
        let cmds = CommandParser::new(b'A').drain(&mut link).unwrap();

        assert_eq!(cmds, vec![cmd(123, 45)]);
        assert_eq!(link.pending(), 0);
    }

    #[test]
    fn test_back_to_back_frames() {
        let mut link = BufferLink::from("AZ10.0 EL5.0AZ20.9 EL6.9AZ30 EL7");
        let cmds = CommandParser::new(b'A').drain(&mut link).unwrap();

        assert_eq!(cmds, vec![cmd(10, 5), cmd(20, 6), cmd(30, 7)]);
    }

    #[test]
    fn test_stops_on_non_marker() {
        // The newline after the first frame ends the drain, the second frame waits
        let mut link = BufferLink::from("AZ1 EL2\nAZ3 EL4\n");
        let parser = CommandParser::new(b'A');

        assert_eq!(parser.drain(&mut link).unwrap(), vec![cmd(1, 2)]);
        assert_eq!(link.pending(), "AZ3 EL4\n".len());

        assert_eq!(parser.drain(&mut link).unwrap(), vec![cmd(3, 4)]);
        assert_eq!(link.pending(), 0);

        assert!(parser.drain(&mut link).unwrap().is_empty());
    }

    #[test]
    fn test_garbage_only_consumes_one_byte() {
        let mut link = BufferLink::from("xyzAZ1 EL2");
        let parser = CommandParser::new(b'A');

        assert!(parser.drain(&mut link).unwrap().is_empty());
        assert_eq!(link.pending(), "yzAZ1 EL2".len());
    }

    #[test]
    fn test_labels_and_separators_skipped() {
        let mut link = BufferLink::from("A azimuth=200.25, elevation=   80.99");
        let cmds = CommandParser::new(b'A').drain(&mut link).unwrap();

        assert_eq!(cmds, vec![cmd(200, 80)]);
    }

    #[test]
    fn test_negative_and_fractional_values() {
        let mut link = BufferLink::from("AZ-10.7 EL-0.5");
        let cmds = CommandParser::new(b'A').drain(&mut link).unwrap();

        // Truncation is towards zero
        assert_eq!(cmds, vec![cmd(-10, 0)]);

        let mut link = BufferLink::from("AZ.5 EL7.");
        let cmds = CommandParser::new(b'A').drain(&mut link).unwrap();
        assert_eq!(cmds, vec![cmd(0, 7)]);
    }

    #[test]
    fn test_unterminated_frame_does_not_wait() {
        let mut link = NoWaitLink(BufferLink::from("AZ123.4 EL45.6"));
        let parser = CommandParser::new(b'A');

        assert_eq!(parser.drain(&mut link).unwrap(), vec![cmd(123, 45)]);

        // A frame cut short mid-way ends at the last received byte
        link.0.push("AZ7");
        assert_eq!(parser.drain(&mut link).unwrap(), vec![cmd(7, 0)]);

        assert!(parser.drain(&mut link).unwrap().is_empty());
    }

    #[test]
    fn test_truncated_frame_defaults_to_zero() {
        let mut link = BufferLink::from("AZ123");
        let cmds = CommandParser::new(b'A').drain(&mut link).unwrap();

        assert_eq!(cmds, vec![cmd(123, 0)]);
    }

    #[test]
    fn test_token_without_digits() {
        // A lone minus sign is zero, and the second point ends the number. That point then ends the
        // drain, leaving the final digit.
        let mut link = BufferLink::from("A- 1.2.3");
        let cmds = CommandParser::new(b'A').drain(&mut link).unwrap();

        assert_eq!(cmds, vec![cmd(0, 1)]);
        assert_eq!(link.pending(), 1);
    }

    #[test]
    fn test_other_marker() {
        let mut link = BufferLink::from("!12 34AZ5 EL6");
        let parser = CommandParser::new(b'!');

        assert_eq!(parser.marker(), b'!');
        assert_eq!(parser.drain(&mut link).unwrap(), vec![cmd(12, 34)]);
    }

    #[test]
    fn test_huge_values_saturate() {
        let mut link = BufferLink::from("A99999999999 EL1");
        let cmds = CommandParser::new(b'A').drain(&mut link).unwrap();

        assert_eq!(cmds, vec![cmd(i32::MAX, 1)]);
    }
}
