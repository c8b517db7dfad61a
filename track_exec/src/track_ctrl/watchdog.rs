//! Command inactivity watchdog

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Tracks time since the last recognised command.
///
/// Once the elapsed time exceeds the limit the watchdog fires, the tracker
/// returns to its home position and the count starts again from zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Watchdog {
    elapsed_ms: u64,
    limit_ms: u64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Watchdog {
    pub fn new(limit_ms: u64) -> Self {
        Self {
            elapsed_ms: 0,
            limit_ms,
        }
    }

    /// Time since the last command or the last time the watchdog fired.
    ///
    /// Units: milliseconds
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Units: milliseconds
    pub fn limit_ms(&self) -> u64 {
        self.limit_ms
    }

    /// Notify the watchdog that a command was recognised.
    pub fn reset(&mut self) {
        self.elapsed_ms = 0;
    }

    /// Advance the watchdog by one cycle.
    ///
    /// Returns `true` if the limit was exceeded, in which case the elapsed
    /// time has been reset and the caller must return to home.
    pub fn advance(&mut self, cycle_period_ms: u64) -> bool {
        self.elapsed_ms = self.elapsed_ms.saturating_add(cycle_period_ms);

        if self.elapsed_ms > self.limit_ms {
            self.elapsed_ms = 0;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_fires_once_limit_exceeded() {
        let mut wd = Watchdog::new(30_000);

        // 300 cycles of 100 ms reaches exactly the limit, which is not enough
        for i in 1..=300 {
            assert!(!wd.advance(100), "fired early on cycle {}", i);
            assert_eq!(wd.elapsed_ms(), i * 100);
        }

        assert!(wd.advance(100));
        assert_eq!(wd.elapsed_ms(), 0);

        // And then counts up again from zero
        assert!(!wd.advance(100));
        assert_eq!(wd.elapsed_ms(), 100);
    }

    #[test]
    fn test_reset_postpones_firing() {
        let mut wd = Watchdog::new(1000);

        for _ in 0..10 {
            assert!(!wd.advance(100));
        }
        wd.reset();
        assert_eq!(wd.elapsed_ms(), 0);

        for _ in 0..10 {
            assert!(!wd.advance(100));
        }
        assert!(wd.advance(100));
    }

    #[test]
    fn test_fires_periodically_without_commands() {
        let mut wd = Watchdog::new(250);
        let fired: Vec<bool> = (0..9).map(|_| wd.advance(100)).collect();

        assert_eq!(
            fired,
            vec![false, false, true, false, false, true, false, false, true]
        );
    }
}
