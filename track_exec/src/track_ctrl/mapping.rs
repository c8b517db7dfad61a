//! Mapping from the logical pointing direction to servo angles.
//!
//! Each servo only has 180 degrees of travel. The azimuth servo covers one
//! half of the compass directly, and pointing at the other half is achieved by
//! sweeping the elevation servo over the top into its [90, 180] range, which
//! aims the dish backwards over the azimuth servo's sweep.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::{RequestedPosition, ServoAngles};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Maximum elevation, straight up.
///
/// Units: degrees
pub const MAX_EL_DEG: i32 = 90;

const FULL_TURN_DEG: i32 = 360;

const QUADRANT_DEG: i32 = 90;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Normalise an azimuth into [0, 359].
///
/// Negative values wrap around, so -10 becomes 350.
pub fn normalise_az(az_deg: i32) -> i32 {
    az_deg.rem_euclid(FULL_TURN_DEG)
}

/// Normalise an elevation into [0, 90].
///
/// The value is wrapped into [0, 359] first and then clamped, so anything
/// between 90 and 359 sticks at 90 rather than wrapping back down.
pub fn normalise_el(el_deg: i32) -> i32 {
    el_deg.rem_euclid(FULL_TURN_DEG).min(MAX_EL_DEG)
}

/// Map a requested position onto the two servos.
pub fn map_position(position: &RequestedPosition) -> ServoAngles {
    map(position.az_deg, position.el_deg)
}

/// Map an azimuth/elevation pair onto the two servos.
///
/// Total over all integers, inputs are normalised first.
pub fn map(az_deg: i32, el_deg: i32) -> ServoAngles {
    let az = normalise_az(az_deg);
    let el = normalise_el(el_deg);

    let (az_servo_deg, el_servo_deg) = match az / QUADRANT_DEG {
        // North east, direct
        0 => (90 - az, el),
        // South east and south west, flipped over the top
        1 | 2 => (270 - az, 180 - el),
        // North west, direct
        _ => (450 - az, el),
    };

    ServoAngles {
        az_servo_deg,
        el_servo_deg,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn angles(az_servo_deg: i32, el_servo_deg: i32) -> ServoAngles {
        ServoAngles {
            az_servo_deg,
            el_servo_deg,
        }
    }

    #[test]
    fn test_map_quadrants() {
        assert_eq!(map(0, 0), angles(90, 0));
        assert_eq!(map(45, 30), angles(45, 30));
        assert_eq!(map(90, 45), angles(180, 135));
        assert_eq!(map(135, 0), angles(135, 180));
        assert_eq!(map(180, 90), angles(90, 90));
        assert_eq!(map(269, 10), angles(1, 170));
        assert_eq!(map(270, 10), angles(180, 10));
        assert_eq!(map(359, 10), angles(91, 10));
    }

    #[test]
    fn test_map_wraps() {
        assert_eq!(map(450, 0), map(90, 0));
        // AZ 90 is quadrant 1, the same direction as AZ 89 at (179, 0)
        assert_eq!(map(90, 0), angles(180, 180));
        assert_eq!(map(-90, 20), map(270, 20));
        assert_eq!(map(0, 370), map(0, 10));
    }

    #[test]
    fn test_elevation_clamps_not_wraps() {
        assert_eq!(normalise_el(91), 90);
        assert_eq!(normalise_el(359), 90);
        assert_eq!(normalise_el(360), 0);
        assert_eq!(normalise_el(-1), 90);
        assert_eq!(map(0, 200), angles(90, 90));
    }

    #[test]
    fn test_normalise_az_negative() {
        assert_eq!(normalise_az(-1), 359);
        assert_eq!(normalise_az(-360), 0);
        assert_eq!(normalise_az(-721), 359);
        assert_eq!(normalise_az(i32::MIN), i32::MIN.rem_euclid(360));
    }

    #[test]
    fn test_map_output_in_servo_range() {
        for az in -720..=720 {
            for el in (-400..=400).step_by(7) {
                let a = map(az, el);
                assert!((0..=180).contains(&a.az_servo_deg), "az {} el {} -> {:?}", az, el, a);
                assert!((0..=180).contains(&a.el_servo_deg), "az {} el {} -> {:?}", az, el, a);
            }
        }

        // Extremes
        for &az in &[i32::MIN, i32::MIN + 1, i32::MAX - 1, i32::MAX] {
            for &el in &[i32::MIN, 0, i32::MAX] {
                let a = map(az, el);
                assert!((0..=180).contains(&a.az_servo_deg));
                assert!((0..=180).contains(&a.el_servo_deg));
            }
        }
    }

    #[test]
    fn test_map_periodic() {
        for az in -360..720 {
            for el in (0..=90).step_by(5) {
                assert_eq!(map(az, el), map(az + 360, el), "az {} el {}", az, el);
            }
        }
    }
}
