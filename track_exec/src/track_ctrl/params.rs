//! Parameters structure for TrackCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use super::SlewLimits;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Smallest usable minimum slew step.
///
/// Below this a 1 degree move upwards halves back onto the last angle and the
/// servo never reaches its target.
pub const MIN_SLEW_STEP_DEG: i32 = 2;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for tracking control.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Params {
    // ---- TIMING ----

    /// Period of one control cycle.
    ///
    /// Units: milliseconds
    pub cycle_period_ms: u64,

    /// Time without a recognised command after which the tracker returns
    /// home.
    ///
    /// Units: milliseconds
    pub watchdog_limit_ms: u64,

    // ---- PROTOCOL ----

    /// Character that starts a pointing command frame.
    pub frame_marker: char,

    // ---- CAPABILITIES ----

    /// Slew limits of the azimuth servo.
    pub az_slew: SlewLimits,

    /// Slew limits of the elevation servo.
    pub el_slew: SlewLimits,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Reasons a set of TrackCtrl parameters can be rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParamsError {
    #[error("The cycle period must be greater than zero")]
    ZeroCyclePeriod,

    #[error("The frame marker must be a single ASCII character, found {0:?}")]
    InvalidFrameMarker(char),

    #[error(
        "The {axis} slew limits are invalid (min step {min}, max step {max}), the min step must be \
         at least {} and no larger than the max step",
        MIN_SLEW_STEP_DEG
    )]
    InvalidSlewLimits {
        axis: &'static str,
        min: i32,
        max: i32,
    },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    /// Check the parameters are usable.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.cycle_period_ms == 0 {
            return Err(ParamsError::ZeroCyclePeriod);
        }

        // The marker can't be something the number scanner would consume
        if !self.frame_marker.is_ascii()
            || self.frame_marker.is_ascii_digit()
            || self.frame_marker == '-'
            || self.frame_marker == '.'
        {
            return Err(ParamsError::InvalidFrameMarker(self.frame_marker));
        }

        for &(axis, limits) in &[("azimuth", self.az_slew), ("elevation", self.el_slew)] {
            if limits.min_step_deg < MIN_SLEW_STEP_DEG
                || limits.min_step_deg > limits.max_step_deg
            {
                return Err(ParamsError::InvalidSlewLimits {
                    axis,
                    min: limits.min_step_deg,
                    max: limits.max_step_deg,
                });
            }
        }

        Ok(())
    }

    /// The frame marker as a byte, only meaningful once validated.
    pub fn frame_marker_byte(&self) -> u8 {
        self.frame_marker as u8
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn valid() -> Params {
        util::params::from_str(
            r#"
            cycle_period_ms = 100
            watchdog_limit_ms = 30000
            frame_marker = "A"

            [az_slew]
            min_step_deg = 3
            max_step_deg = 15

            [el_slew]
            min_step_deg = 2
            max_step_deg = 10
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_parse_and_validate() {
        let p = valid();
        assert_eq!(p.cycle_period_ms, 100);
        assert_eq!(p.frame_marker_byte(), b'A');
        assert_eq!(p.el_slew.max_step_deg, 10);
        assert_eq!(p.validate(), Ok(()));
    }

    #[test]
    fn test_rejects_bad_params() {
        let mut p = valid();
        p.cycle_period_ms = 0;
        assert_eq!(p.validate(), Err(ParamsError::ZeroCyclePeriod));

        let mut p = valid();
        p.frame_marker = '°';
        assert_eq!(p.validate(), Err(ParamsError::InvalidFrameMarker('°')));

        let mut p = valid();
        p.frame_marker = '7';
        assert!(p.validate().is_err());

        let mut p = valid();
        p.az_slew.min_step_deg = 1;
        assert_eq!(
            p.validate(),
            Err(ParamsError::InvalidSlewLimits {
                axis: "azimuth",
                min: 1,
                max: 15
            })
        );

        let mut p = valid();
        p.el_slew.min_step_deg = 0;
        assert!(p.validate().is_err());

        let mut p = valid();
        p.el_slew.min_step_deg = 20;
        assert_eq!(
            p.validate(),
            Err(ParamsError::InvalidSlewLimits {
                axis: "elevation",
                min: 20,
                max: 10
            })
        );
    }
}
