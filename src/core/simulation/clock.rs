//=========================================================================
// Clock
//=========================================================================
//
// Supplies the elapsed-time delta consumed by each simulation frame.
//
//   SystemClock     wall-clock delta between consecutive calls
//   FixedStepClock  constant delta (tests, deterministic replays)
//   ManualClock     scripted sequence of deltas
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;
use std::time::Instant;

//=== Clock Trait =========================================================

/// Source of per-frame elapsed time, in seconds.
pub trait Clock: Send {
    /// Returns the time elapsed since the previous call (or since
    /// construction for the first call). Never negative.
    fn delta_seconds(&mut self) -> f64;
}

//=== SystemClock =========================================================

/// Wall-clock delta between two frames.
pub struct SystemClock {
    last: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { last: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn delta_seconds(&mut self) -> f64 {
        let now = Instant::now();
        let delta = now.duration_since(self.last);
        self.last = now;
        delta.as_secs_f64()
    }
}

//=== FixedStepClock ======================================================

/// Returns the same delta on every call.
#[derive(Debug, Clone, Copy)]
pub struct FixedStepClock {
    step: f64,
}

impl FixedStepClock {
    /// # Panics
    ///
    /// Panics if `step` is negative or not finite.
    pub fn new(step: f64) -> Self {
        assert!(step.is_finite() && step >= 0.0, "Clock step must be non-negative, got {}", step);
        Self { step }
    }
}

impl Clock for FixedStepClock {
    fn delta_seconds(&mut self) -> f64 {
        self.step
    }
}

//=== ManualClock =========================================================

/// Plays back queued deltas, then returns zero.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    pending: VecDeque<f64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues one delta; negative values are clamped to zero.
    pub fn push(&mut self, delta: f64) {
        self.pending.push_back(delta.max(0.0));
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl Clock for ManualClock {
    fn delta_seconds(&mut self) -> f64 {
        self.pending.pop_front().unwrap_or(0.0)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn system_clock_is_monotonic() {
        let mut clock = SystemClock::new();
        thread::sleep(Duration::from_millis(2));
        let first = clock.delta_seconds();
        let second = clock.delta_seconds();

        assert!(first >= 0.002);
        assert!(second >= 0.0);
    }

    #[test]
    fn fixed_step_repeats() {
        let mut clock = FixedStepClock::new(0.1);
        assert_eq!(clock.delta_seconds(), 0.1);
        assert_eq!(clock.delta_seconds(), 0.1);
    }

    #[test]
    #[should_panic(expected = "Clock step must be non-negative")]
    fn fixed_step_rejects_negative() {
        FixedStepClock::new(-0.5);
    }

    #[test]
    fn manual_clock_plays_back_then_idles() {
        let mut clock = ManualClock::new();
        clock.push(0.25);
        clock.push(-1.0);

        assert_eq!(clock.remaining(), 2);
        assert_eq!(clock.delta_seconds(), 0.25);
        assert_eq!(clock.delta_seconds(), 0.0);
        assert_eq!(clock.delta_seconds(), 0.0);
    }
}
