#![allow(dead_code)]
//! Session clock: second-granularity elapsed time
//!
//! The clock only counts; the 1 Hz cadence is driven by the main loop
//! calling `tick` (same arrangement as the event loop's tick timer).

/// Counts whole elapsed seconds while running.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionClock {
    running: bool,
    elapsed: u32,
}

impl SessionClock {
    /// Create a stopped clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting from zero. Calling start while already running
    /// restarts from zero ("new game" semantics).
    pub fn start(&mut self) {
        self.running = true;
        self.elapsed = 0;
    }

    /// Stop counting. Safe to call when not running.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Advance one second. Returns true if the clock was running and
    /// actually advanced.
    pub fn tick(&mut self) -> bool {
        if self.running {
            self.elapsed += 1;
        }
        self.running
    }

    /// Whole seconds elapsed since the last start.
    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed
    }

    /// Whether the clock is currently counting.
    pub fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clock_is_stopped_at_zero() {
        let clock = SessionClock::new();
        assert!(!clock.is_running());
        assert_eq!(clock.elapsed_seconds(), 0);
    }

    #[test]
    fn test_tick_only_counts_while_running() {
        let mut clock = SessionClock::new();
        assert!(!clock.tick());
        assert_eq!(clock.elapsed_seconds(), 0);

        clock.start();
        assert!(clock.tick());
        assert!(clock.tick());
        assert_eq!(clock.elapsed_seconds(), 2);

        clock.stop();
        assert!(!clock.tick());
        assert_eq!(clock.elapsed_seconds(), 2);
    }

    #[test]
    fn test_start_restarts_from_zero() {
        let mut clock = SessionClock::new();
        clock.start();
        clock.tick();
        clock.tick();
        clock.tick();
        assert_eq!(clock.elapsed_seconds(), 3);

        clock.start();
        assert!(clock.is_running());
        assert_eq!(clock.elapsed_seconds(), 0);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut clock = SessionClock::new();
        clock.stop();
        clock.stop();
        assert!(!clock.is_running());

        clock.start();
        clock.tick();
        clock.stop();
        clock.stop();
        assert_eq!(clock.elapsed_seconds(), 1);
    }
}
