//! One-shot display timers (success banner, confetti, inactivity dimming).

use std::time::Duration;
use tokio::time::Instant;

/// A deadline that is replaced whenever it is re-armed and fires at most once.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisplayTimer {
    deadline: Option<Instant>,
}

impl DisplayTimer {
    /// Start (or restart) the timer; any earlier deadline is superseded.
    pub fn arm(&mut self, after: Duration) {
        self.deadline = Some(Instant::now() + after);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// True exactly once, on the first poll at or after the deadline.
    pub fn fire_if_due(&mut self) -> bool {
        match self.deadline {
            Some(d) if Instant::now() >= d => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn fires_once_at_deadline() {
        let mut t = DisplayTimer::default();
        t.arm(Duration::from_millis(100));
        tokio::time::advance(Duration::from_millis(99)).await;
        assert!(!t.fire_if_due());
        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(t.fire_if_due());
        assert!(!t.fire_if_due());
        assert!(!t.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn rearming_supersedes_previous_deadline() {
        let mut t = DisplayTimer::default();
        t.arm(Duration::from_millis(100));
        tokio::time::advance(Duration::from_millis(80)).await;
        t.arm(Duration::from_millis(100));
        tokio::time::advance(Duration::from_millis(80)).await;
        assert!(!t.fire_if_due());
        assert_eq!(t.remaining(), Some(Duration::from_millis(20)));
        t.cancel();
        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(!t.fire_if_due());
    }
}
