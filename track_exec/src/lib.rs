//! # Antenna tracker library.
//!
//! Everything needed to turn azimuth/elevation pointing commands into demands for the two servos
//! of the antenna mount. The `track_exec` binary wires these together against real hardware.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Cycle clocks - paces the control loop
pub mod clock;

/// Command parser - extracts pointing commands from the incoming byte stream
pub mod cmd_parser;

/// Byte link - serial port the commands arrive on
pub mod link;

/// Executable parameters
pub mod params;

/// Servo control - drives the servos by logical angle
pub mod servo_ctrl;

/// Tracking control module - maps pointing commands to slew limited servo angles
pub mod track_ctrl;

/// Tracker - the complete per-cycle control loop
pub mod tracker;
