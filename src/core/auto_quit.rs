//! One-shot deferred quit used when the match is over

use std::time::{Duration, Instant};

/// Delay used when the configured wait is zero or negative
pub const MIN_QUIT_DELAY: Duration = Duration::from_millis(100);

/// Delay before quitting for a configured wait in milliseconds
pub fn quit_delay(wait_ms: i64) -> Duration {
    if wait_ms > 0 {
        Duration::from_millis(wait_ms as u64)
    } else {
        MIN_QUIT_DELAY
    }
}

/// A single pending quit. Scheduling again never postpones an earlier deadline.
#[derive(Debug, Clone, Default)]
pub struct QuitTimer {
    deadline: Option<Instant>,
}

impl QuitTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: Instant, delay: Duration) {
        let deadline = now + delay;
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    #[cfg(test)]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// True once the deadline has passed
    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|d| now >= d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_delay_defaults() {
        assert_eq!(quit_delay(0), Duration::from_millis(100));
        assert_eq!(quit_delay(-5), Duration::from_millis(100));
        assert_eq!(quit_delay(5000), Duration::from_millis(5000));
    }

    #[test]
    fn test_timer_fires_after_deadline() {
        let now = Instant::now();
        let mut timer = QuitTimer::new();
        assert!(!timer.is_due(now));

        timer.schedule(now, Duration::from_millis(100));
        assert!(timer.is_pending());
        assert!(!timer.is_due(now + Duration::from_millis(99)));
        assert!(timer.is_due(now + Duration::from_secs(1)));
    }

    #[test]
    fn test_reschedule_keeps_earliest() {
        let now = Instant::now();
        let mut timer = QuitTimer::new();
        timer.schedule(now, Duration::from_millis(100));
        timer.schedule(now + Duration::from_millis(50), Duration::from_millis(100));

        assert_eq!(timer.deadline(), Some(now + Duration::from_millis(100)));
    }
}
