//! # Cycle Clock Module
//!
//! The control loop runs on a fixed period. The clock is injected into the loop so that tests can
//! run cycles back to back without waiting on the wall clock.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::warn;
use std::{
    thread,
    time::{Duration, Instant},
};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A source of control cycles.
pub trait Clock {
    /// The nominal period of one cycle.
    ///
    /// Units: milliseconds
    fn cycle_period_ms(&self) -> u64;

    /// Block until the next cycle should start.
    fn wait_for_next_cycle(&mut self);
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Wall clock driven cycles.
///
/// Sleeps for whatever is left of the period after the cycle's processing.
pub struct FixedPeriodClock {
    period: Duration,
    cycle_start: Instant,
}

/// Cycles which start immediately, counting how many have passed.
#[derive(Debug)]
pub struct StepClock {
    period_ms: u64,
    num_cycles: u64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl FixedPeriodClock {
    pub fn new(period_ms: u64) -> Self {
        Self {
            period: Duration::from_millis(period_ms),
            cycle_start: Instant::now(),
        }
    }
}

impl Clock for FixedPeriodClock {
    fn cycle_period_ms(&self) -> u64 {
        self.period.as_millis() as u64
    }

    fn wait_for_next_cycle(&mut self) {
        let elapsed = self.cycle_start.elapsed();

        if elapsed < self.period {
            thread::sleep(self.period - elapsed);
        } else {
            warn!(
                "Cycle overran by {:.3} s",
                (elapsed - self.period).as_secs_f64()
            );
        }

        self.cycle_start = Instant::now();
    }
}

impl StepClock {
    pub fn new(period_ms: u64) -> Self {
        Self {
            period_ms,
            num_cycles: 0,
        }
    }

    /// Number of cycles waited for so far.
    pub fn num_cycles(&self) -> u64 {
        self.num_cycles
    }

    /// Simulated time since the clock was created.
    ///
    /// Units: milliseconds
    pub fn elapsed_ms(&self) -> u64 {
        self.num_cycles * self.period_ms
    }
}

impl Clock for StepClock {
    fn cycle_period_ms(&self) -> u64 {
        self.period_ms
    }

    fn wait_for_next_cycle(&mut self) {
        self.num_cycles += 1;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_step_clock() {
        let mut c = StepClock::new(100);
        for _ in 0..5 {
            c.wait_for_next_cycle();
        }
        assert_eq!(c.num_cycles(), 5);
        assert_eq!(c.elapsed_ms(), 500);
        assert_eq!(c.cycle_period_ms(), 100);
    }

    #[test]
    fn test_fixed_period_clock_waits() {
        let start = Instant::now();
        let mut c = FixedPeriodClock::new(20);
        c.wait_for_next_cycle();
        c.wait_for_next_cycle();
        assert!(start.elapsed() >= Duration::from_millis(40));
        assert_eq!(c.cycle_period_ms(), 20);
    }
}
