//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where
    T: Float,
{
    target_range.0
        + ((value - source_range.0) * (target_range.1 - target_range.0)
            / (source_range.1 - source_range.0))
}

/// Clamp a value into the inclusive range `[min, max]`.
pub fn clamp<T>(value: T, min: T, max: T) -> T
where
    T: PartialOrd,
{
    if value > max {
        max
    } else if value < min {
        min
    } else {
        value
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_lin_map() {
        assert_eq!(lin_map((0f64, 180f64), (1000f64, 2000f64), 0f64), 1000f64);
        assert_eq!(lin_map((0f64, 180f64), (1000f64, 2000f64), 90f64), 1500f64);
        assert_eq!(lin_map((0f64, 180f64), (1000f64, 2000f64), 180f64), 2000f64);

        // Inverted target range
        assert_eq!(lin_map((0f64, 180f64), (2000f64, 1000f64), 45f64), 1750f64);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5, 0, 90), 5);
        assert_eq!(clamp(-5, 0, 90), 0);
        assert_eq!(clamp(95, 0, 90), 90);
        assert_eq!(clamp(1.5f64, 0.0, 1.0), 1.0);
    }
}
