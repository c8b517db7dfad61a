//! Simulated [`ServoDriver`]

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::trace;
use std::collections::HashMap;

use super::{ServoDriver, ServoError};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A servo driver with no hardware behind it.
///
/// Every demand is logged and the last pulse width on each channel is kept so it can be checked.
#[derive(Debug, Default)]
pub struct SimServoDriver {
    pulses_us: HashMap<u8, u32>,
    num_writes: usize,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimServoDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last pulse width written to `channel`, if any.
    pub fn pulse_width_us(&self, channel: u8) -> Option<u32> {
        self.pulses_us.get(&channel).copied()
    }

    /// Total number of pulse widths written.
    pub fn num_writes(&self) -> usize {
        self.num_writes
    }
}

impl ServoDriver for SimServoDriver {
    fn set_pulse_width_us(&mut self, channel: u8, pulse_width_us: u32) -> Result<(), ServoError> {
        trace!("Sim servo channel {} -> {} us", channel, pulse_width_us);

        self.pulses_us.insert(channel, pulse_width_us);
        self.num_writes += 1;

        Ok(())
    }
}
