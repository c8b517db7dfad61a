//! # Tracker Executable Parameters

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Clone, Debug, Deserialize)]
pub struct TrackExecParams {
    /// Serial port the pointing commands arrive on
    pub port_name: String,

    /// Baud rate of the serial port
    pub baud_rate: u32,

    /// Longest time to wait for the rest of a partially recieved frame.
    ///
    /// Units: milliseconds
    pub read_timeout_ms: u64,

    /// If `true` status lines are written back over the serial port as well as being logged.
    pub echo_status: bool,
}
