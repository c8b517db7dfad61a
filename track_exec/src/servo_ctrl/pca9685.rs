//! [`ServoDriver`] implementation for the PCA9685 driver

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use embedded_hal::blocking::i2c::{Write, WriteRead};
use pwm_pca9685::{Channel, Pca9685};

use super::{ServoDriver, ServoError};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

const MAX_PWM: u16 = 4096;

/// Frequency of the board's internal oscillator.
///
/// Units: hertz
const OSC_FREQ_HZ: u64 = 25_000_000;

const MIN_PRESCALE: u8 = 3;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A PCA9685 board outputting servo pulses.
///
/// The board must already be enabled with its prescale set to match `pwm_period_us`, see
/// [`prescale_for_period`].
pub struct Pca9685Driver<I2C> {
    dev: Pca9685<I2C>,
    pwm_period_us: u32,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<I2C> Pca9685Driver<I2C> {
    pub fn new(dev: Pca9685<I2C>, pwm_period_us: u32) -> Self {
        Self { dev, pwm_period_us }
    }
}

impl<I2C, E> ServoDriver for Pca9685Driver<I2C>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
{
    fn set_pulse_width_us(&mut self, channel: u8, pulse_width_us: u32) -> Result<(), ServoError> {
        let channel = channel_from_index(channel)?;
        let off_count = pulse_to_count(pulse_width_us, self.pwm_period_us)?;

        match self.dev.set_channel_on_off(channel, 0, off_count) {
            Ok(_) => Ok(()),
            Err(pwm_pca9685::Error::I2C(_)) => Err(ServoError::I2c),
            Err(pwm_pca9685::Error::InvalidInputData) => {
                Err(ServoError::InvalidPulseWidth(pulse_width_us))
            }
        }
    }
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Get the prescale register value which gives the closest PWM period to `pwm_period_us`.
pub fn prescale_for_period(pwm_period_us: u32) -> u8 {
    let counts_per_period = OSC_FREQ_HZ * pwm_period_us as u64;
    let divisor = MAX_PWM as u64 * 1_000_000;

    // Rounded division, less one as the board adds one to the register value
    let prescale = (counts_per_period + divisor / 2) / divisor;
    let prescale = prescale.saturating_sub(1);

    if prescale > u8::MAX as u64 {
        u8::MAX
    } else {
        (prescale as u8).max(MIN_PRESCALE)
    }
}

/// Convert a pulse width into the PWM off count for the board.
pub fn pulse_to_count(pulse_width_us: u32, pwm_period_us: u32) -> Result<u16, ServoError> {
    if pwm_period_us == 0 || pulse_width_us >= pwm_period_us {
        return Err(ServoError::InvalidPulseWidth(pulse_width_us));
    }

    Ok((pulse_width_us as u64 * MAX_PWM as u64 / pwm_period_us as u64) as u16)
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn channel_from_index(index: u8) -> Result<Channel, ServoError> {
    Ok(match index {
        0 => Channel::C0,
        1 => Channel::C1,
        2 => Channel::C2,
        3 => Channel::C3,
        4 => Channel::C4,
        5 => Channel::C5,
        6 => Channel::C6,
        7 => Channel::C7,
        8 => Channel::C8,
        9 => Channel::C9,
        10 => Channel::C10,
        11 => Channel::C11,
        12 => Channel::C12,
        13 => Channel::C13,
        14 => Channel::C14,
        15 => Channel::C15,
        i => return Err(ServoError::InvalidChannel(i)),
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_prescale_for_period() {
        // 50 Hz hobby servos
        assert_eq!(prescale_for_period(20_000), 121);
        // Fastest and slowest the board can do
        assert_eq!(prescale_for_period(100), MIN_PRESCALE);
        assert_eq!(prescale_for_period(1_000_000), u8::MAX);
    }

    #[test]
    fn test_pulse_to_count() {
        assert_eq!(pulse_to_count(1500, 20_000), Ok(307));
        assert_eq!(pulse_to_count(0, 20_000), Ok(0));
        assert_eq!(
            pulse_to_count(20_000, 20_000),
            Err(ServoError::InvalidPulseWidth(20_000))
        );
    }

    #[test]
    fn test_channel_from_index() {
        assert!(channel_from_index(0).is_ok());
        assert!(channel_from_index(15).is_ok());
        assert_eq!(channel_from_index(16).err(), Some(ServoError::InvalidChannel(16)));
    }
}
