//! Calibrated servo output

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::trace;
use util::maths::{clamp, lin_map};

use super::{Axis, CalibrationError, ServoCalib, ServoDriver, ServoError, ServoParams};
use crate::track_ctrl::{ServoAngles, SERVO_TRAVEL_DEG};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Drives the azimuth and elevation servos by logical angle.
///
/// Each servo is calibrated separately, as the two are mounted with their zero ends facing
/// different ways.
pub struct ServoOutput<D: ServoDriver> {
    driver: D,
    az_calib: ServoCalib,
    el_calib: ServoCalib,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ServoCalib {
    /// Pulse width which puts the servo at `angle_deg`.
    ///
    /// Angles outside [0, 180] are clamped.
    pub fn pulse_width_us(&self, angle_deg: i32) -> u32 {
        let angle_deg = clamp(angle_deg, 0, SERVO_TRAVEL_DEG);

        let angle_deg = if self.zero_is_min_end {
            angle_deg
        } else {
            SERVO_TRAVEL_DEG - angle_deg
        };

        lin_map(
            (0f64, SERVO_TRAVEL_DEG as f64),
            (self.min_pulse_us as f64, self.max_pulse_us as f64),
            angle_deg as f64,
        )
        .round() as u32
    }
}

impl<D: ServoDriver> ServoOutput<D> {
    /// Create the output from validated servo parameters.
    pub fn new(driver: D, params: &ServoParams) -> Result<Self, CalibrationError> {
        params.validate()?;

        Ok(Self {
            driver,
            az_calib: params.az_servo,
            el_calib: params.el_servo,
        })
    }

    pub fn calib(&self, axis: Axis) -> &ServoCalib {
        match axis {
            Axis::Az => &self.az_calib,
            Axis::El => &self.el_calib,
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Drive one servo to a logical angle, returning the pulse width sent.
    pub fn drive(&mut self, axis: Axis, angle_deg: i32) -> Result<u32, ServoError> {
        let calib = *self.calib(axis);
        let pulse_width_us = calib.pulse_width_us(angle_deg);

        trace!("{:?} servo {} deg -> {} us", axis, angle_deg, pulse_width_us);

        self.driver.set_pulse_width_us(calib.channel, pulse_width_us)?;

        Ok(pulse_width_us)
    }

    /// Drive both servos.
    pub fn drive_angles(&mut self, angles: &ServoAngles) -> Result<(), ServoError> {
        self.drive(Axis::Az, angles.az_servo_deg)?;
        self.drive(Axis::El, angles.el_servo_deg)?;
        Ok(())
    }

    /// Move both servos to the home pose.
    pub fn home(&mut self) -> Result<(), ServoError> {
        self.drive_angles(&ServoAngles::home())
    }
}
