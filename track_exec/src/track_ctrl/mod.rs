//! Tracking control module
//!
//! Converts a requested azimuth/elevation pointing direction into rate
//! limited demands for the two 180 degree servos of the antenna mount.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod mapping;
mod params;
mod slew;
mod state;
mod watchdog;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use mapping::*;
pub use params::*;
pub use slew::*;
pub use state::*;
pub use watchdog::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Servo angle of the azimuth servo in the home pose.
///
/// Units: degrees
pub const HOME_AZ_SERVO_DEG: i32 = 90;

/// Servo angle of the elevation servo in the home pose.
///
/// Units: degrees
pub const HOME_EL_SERVO_DEG: i32 = 0;

/// Upper end of a servo's travel, the lower end being zero.
///
/// Units: degrees
pub const SERVO_TRAVEL_DEG: i32 = 180;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The logical pointing direction the tracker is trying to achieve.
///
/// Always normalised, azimuth in [0, 359] and elevation in [0, 90].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RequestedPosition {
    /// Units: degrees
    pub az_deg: i32,

    /// Units: degrees
    pub el_deg: i32,
}

/// A pair of servo angles, each in [0, 180].
///
/// Used both for the per-cycle mapping target and for the rate limited angles
/// actually sent to the servos.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ServoAngles {
    /// Units: degrees
    pub az_servo_deg: i32,

    /// Units: degrees
    pub el_servo_deg: i32,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during TrackCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum TrackCtrlError {
    #[error("Could not load the parameters: {0}")]
    ParamLoadError(#[from] util::params::LoadError),

    #[error("Invalid parameters: {0}")]
    InvalidParams(#[from] ParamsError),

    #[error("Could not open the archive: {0}")]
    ArchiveError(String),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl RequestedPosition {
    /// Build a requested position from raw command values, normalising both
    /// axes.
    pub fn new(az_deg: i32, el_deg: i32) -> Self {
        Self {
            az_deg: normalise_az(az_deg),
            el_deg: normalise_el(el_deg),
        }
    }

    /// The home pointing direction, due north on the horizon.
    pub fn home() -> Self {
        Self::default()
    }
}

impl ServoAngles {
    /// The servo angles of the home pose.
    pub fn home() -> Self {
        Self {
            az_servo_deg: HOME_AZ_SERVO_DEG,
            el_servo_deg: HOME_EL_SERVO_DEG,
        }
    }
}

impl Default for ServoAngles {
    fn default() -> Self {
        Self::home()
    }
}

impl std::fmt::Display for RequestedPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AZ {:3} EL {:2}", self.az_deg, self.el_deg)
    }
}

impl std::fmt::Display for ServoAngles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "az servo {:3} el servo {:3}", self.az_servo_deg, self.el_servo_deg)
    }
}
