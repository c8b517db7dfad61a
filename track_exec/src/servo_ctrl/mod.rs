//! # Servo Controller Module
//!
//! This module provides a unified servo control interface which can abstract over different types
//! of servo driver boards, and the calibrated output stage which turns logical servo angles into
//! pulse widths.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Calibrated angle to pulse width output for the two tracker servos.
mod output;

/// [`ServoDriver`] implementation for the Adafruit PCA9685 16 channel servo driver board.
pub mod pca9685;

/// Simulated [`ServoDriver`] which only records demands.
mod sim;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use output::*;
pub use sim::SimServoDriver;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Trait to provide a unified API for accessing servo driver boards.
pub trait ServoDriver {
    /// Set the pulse width output on a channel.
    ///
    /// ## Arguments
    /// - `channel` - The index of the channel on the board
    /// - `pulse_width_us` - The width of the pulse in microseconds. Must be shorter than the PWM
    ///   period of the board.
    fn set_pulse_width_us(&mut self, channel: u8, pulse_width_us: u32) -> Result<(), ServoError>;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters for the servo output, loaded from `servo_ctrl.toml`.
#[derive(Clone, Debug, Deserialize)]
pub struct ServoParams {
    /// Which driver to use for the servos.
    pub driver: DriverKind,

    /// I2C address of the PCA9685 board.
    pub i2c_address: u8,

    /// PWM period of the servo signal, 20000 us for standard hobby servos.
    ///
    /// Units: microseconds
    pub pwm_period_us: u32,

    /// Calibration of the azimuth servo.
    pub az_servo: ServoCalib,

    /// Calibration of the elevation servo.
    pub el_servo: ServoCalib,
}

/// Calibration of a single servo.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct ServoCalib {
    /// Driver channel the servo is connected to.
    pub channel: u8,

    /// Pulse width at one end of the servo's travel.
    ///
    /// Units: microseconds
    pub min_pulse_us: u32,

    /// Pulse width at the other end of the servo's travel.
    ///
    /// Units: microseconds
    pub max_pulse_us: u32,

    /// If `true` a servo angle of zero is at the minimum pulse width, otherwise the angle is
    /// reflected so that zero is at the maximum pulse width.
    pub zero_is_min_end: bool,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The kind of servo driver to output to.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DriverKind {
    /// Adafruit PCA9685 board over I2C
    Pca9685,

    /// No hardware, demands are only logged
    Sim,
}

/// The two servo axes of the tracker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Az,
    El,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ServoError {
    #[error("An I2C error occured")]
    I2c,

    #[error("Channel {0} does not exist on the driver")]
    InvalidChannel(u8),

    #[error("Pulse width of {0} us cannot be output")]
    InvalidPulseWidth(u32),
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum CalibrationError {
    #[error("The {0:?} servo minimum pulse width ({1} us) must be less than the maximum ({2} us)")]
    InvalidPulseRange(Axis, u32, u32),

    #[error("The {0:?} servo maximum pulse width ({1} us) does not fit in the PWM period ({2} us)")]
    PulseExceedsPeriod(Axis, u32, u32),

    #[error("Both servos are configured on channel {0}")]
    SharedChannel(u8),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ServoParams {
    /// Check the calibration of both servos.
    pub fn validate(&self) -> Result<(), CalibrationError> {
        for &(axis, calib) in &[(Axis::Az, self.az_servo), (Axis::El, self.el_servo)] {
            if calib.min_pulse_us >= calib.max_pulse_us {
                return Err(CalibrationError::InvalidPulseRange(
                    axis,
                    calib.min_pulse_us,
                    calib.max_pulse_us,
                ));
            }

            if calib.max_pulse_us >= self.pwm_period_us {
                return Err(CalibrationError::PulseExceedsPeriod(
                    axis,
                    calib.max_pulse_us,
                    self.pwm_period_us,
                ));
            }
        }

        if self.az_servo.channel == self.el_servo.channel {
            return Err(CalibrationError::SharedChannel(self.az_servo.channel));
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn params() -> ServoParams {
        util::params::from_str(
            r#"
            driver = "sim"
            i2c_address = 64
            pwm_period_us = 20000

            [az_servo]
            channel = 0
            min_pulse_us = 544
            max_pulse_us = 2400
            zero_is_min_end = true

            [el_servo]
            channel = 1
            min_pulse_us = 544
            max_pulse_us = 2400
            zero_is_min_end = false
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_parse_params() {
        let p = params();
        assert_eq!(p.driver, DriverKind::Sim);
        assert_eq!(p.i2c_address, 0x40);
        assert!(!p.el_servo.zero_is_min_end);
        assert_eq!(p.validate(), Ok(()));
    }

    #[test]
    fn test_validate() {
        let mut p = params();
        p.az_servo.min_pulse_us = 2400;
        assert_eq!(
            p.validate(),
            Err(CalibrationError::InvalidPulseRange(Axis::Az, 2400, 2400))
        );

        let mut p = params();
        p.el_servo.max_pulse_us = 25000;
        assert_eq!(
            p.validate(),
            Err(CalibrationError::PulseExceedsPeriod(Axis::El, 25000, 20000))
        );

        let mut p = params();
        p.el_servo.channel = 0;
        assert_eq!(p.validate(), Err(CalibrationError::SharedChannel(0)));
    }
}
