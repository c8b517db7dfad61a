//! Per-cycle slew limiting of servo demands.
//!
//! Large moves are approached by halving the remaining distance each cycle,
//! with the halfway step capped at a maximum size, and tiny moves are snapped
//! straight to the target to avoid chatter.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Slew limits for a single servo axis.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct SlewLimits {
    /// Moves smaller than this are made in a single cycle.
    ///
    /// Units: degrees
    pub min_step_deg: i32,

    /// Largest move made in a single cycle when the halfway point is still
    /// further than this from the target.
    ///
    /// Units: degrees
    pub max_step_deg: i32,
}

/// Result of one slew limiting step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlewStep {
    /// The angle to command this cycle.
    pub next_deg: i32,

    /// `true` if the step was clamped to the maximum step size.
    pub limited: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SlewLimits {
    /// Step towards `target_deg` from `last_deg` using these limits.
    pub fn step(&self, last_deg: i32, target_deg: i32) -> SlewStep {
        step_limited(last_deg, target_deg, self.min_step_deg, self.max_step_deg)
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Compute the angle to command this cycle.
pub fn step(last_deg: i32, target_deg: i32, min_step_deg: i32, max_step_deg: i32) -> i32 {
    step_limited(last_deg, target_deg, min_step_deg, max_step_deg).next_deg
}

/// Compute the angle to command this cycle, also reporting whether the
/// maximum step limit was applied.
pub fn step_limited(
    last_deg: i32,
    target_deg: i32,
    min_step_deg: i32,
    max_step_deg: i32,
) -> SlewStep {
    // Close enough, snap
    if (last_deg - target_deg).abs() < min_step_deg {
        return SlewStep {
            next_deg: target_deg,
            limited: false,
        };
    }

    let candidate = (last_deg + target_deg) / 2;

    if (candidate - target_deg).abs() > max_step_deg {
        let next_deg = if target_deg > last_deg {
            last_deg + max_step_deg
        } else {
            last_deg - max_step_deg
        };

        SlewStep {
            next_deg,
            limited: true,
        }
    } else {
        SlewStep {
            next_deg: candidate,
            limited: false,
        }
    }
}
