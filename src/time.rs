//! Exhaustion deadline.
//!
//! Unbounded producers never finish on their own, so every control operator
//! runs against a wall-clock budget: once `start + budget` has passed, the
//! sequence is treated as practically infinite.
//!
//! The clock is armed on the first step of a run, which is when the run's body
//! starts executing, not when the operator is called. Polling is coarse: expiry
//! is only observed between values, never while a producer is computing one.

use std::time::{Duration, Instant};

/// Per-run deadline derived from the engine's exhaustion budget.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use taote::ExhaustionClock;
///
/// let mut clock = ExhaustionClock::new(Duration::from_secs(60));
/// assert!(clock.deadline().is_none());
/// assert!(!clock.is_expired());
/// assert!(clock.deadline().is_some());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ExhaustionClock {
    budget: Duration,
    started_at: Option<Instant>,
}

impl ExhaustionClock {
    /// Creates an unarmed clock.
    #[must_use]
    pub const fn new(budget: Duration) -> Self {
        Self {
            budget,
            started_at: None,
        }
    }

    /// The configured budget.
    #[must_use]
    pub const fn budget(&self) -> Duration {
        self.budget
    }

    /// Arms the clock if it is not armed yet.
    pub fn start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    /// `start + budget`, once armed.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.started_at
            .map(|start| start.checked_add(self.budget).unwrap_or(start))
    }

    /// True once the deadline has strictly passed. Arms the clock on first use.
    pub fn is_expired(&mut self) -> bool {
        self.start();
        match self.deadline() {
            Some(deadline) => Instant::now() > deadline,
            None => false,
        }
    }

    /// Time left before expiry; zero once expired, the full budget if unarmed.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        match self.deadline() {
            Some(deadline) => deadline.saturating_duration_since(Instant::now()),
            None => self.budget,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unarmed_clock() {
        let clock = ExhaustionClock::new(Duration::from_secs(5));
        assert!(clock.deadline().is_none());
        assert_eq!(clock.remaining(), Duration::from_secs(5));
        assert_eq!(clock.budget(), Duration::from_secs(5));
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut clock = ExhaustionClock::new(Duration::from_secs(5));
        clock.start();
        let first = clock.deadline();
        std::thread::sleep(Duration::from_millis(2));
        clock.start();
        assert_eq!(clock.deadline(), first);
    }

    #[test]
    fn test_expires_after_budget() {
        let mut clock = ExhaustionClock::new(Duration::from_millis(5));
        assert!(!clock.is_expired());
        std::thread::sleep(Duration::from_millis(15));
        assert!(clock.is_expired());
        assert_eq!(clock.remaining(), Duration::ZERO);
    }

    #[test]
    fn test_generous_budget_not_expired() {
        let mut clock = ExhaustionClock::new(Duration::from_secs(3600));
        assert!(!clock.is_expired());
        assert!(clock.remaining() > Duration::from_secs(3500));
    }
}
