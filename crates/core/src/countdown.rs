//! One-second countdown bound to a session's lifetime.
//!
//! Pure state; the services layer drives `tick` from a repeating timer.

use crate::time::format_mm_ss;

/// Seconds below which the remaining time is shown as urgent.
pub const URGENT_BELOW_SECS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownPhase {
    Idle,
    Running,
    Expired,
    Cancelled,
}

/// Outcome of feeding the countdown one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Running { remaining: u32 },
    /// Emitted exactly once, on the transition to `Expired`.
    Expired,
    /// The countdown is not running; the event had no effect.
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    budget: u32,
    remaining: u32,
    phase: CountdownPhase,
}

impl Countdown {
    #[must_use]
    pub fn new(budget_secs: u32) -> Self {
        Self {
            budget: budget_secs,
            remaining: budget_secs,
            phase: CountdownPhase::Idle,
        }
    }

    #[must_use]
    pub fn budget(&self) -> u32 {
        self.budget
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn phase(&self) -> CountdownPhase {
        self.phase
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.phase == CountdownPhase::Running
    }

    #[must_use]
    pub fn is_urgent(&self) -> bool {
        self.is_running() && self.remaining < URGENT_BELOW_SECS
    }

    #[must_use]
    pub fn label(&self) -> String {
        format_mm_ss(self.remaining)
    }

    /// `idle → running`. A zero budget expires on the spot.
    pub fn start(&mut self) -> Tick {
        if self.phase != CountdownPhase::Idle {
            return Tick::Stopped;
        }
        if self.remaining == 0 {
            self.phase = CountdownPhase::Expired;
            return Tick::Expired;
        }
        self.phase = CountdownPhase::Running;
        Tick::Running {
            remaining: self.remaining,
        }
    }

    /// One elapsed second. Floors at zero.
    pub fn tick(&mut self) -> Tick {
        if self.phase != CountdownPhase::Running {
            return Tick::Stopped;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.phase = CountdownPhase::Expired;
            return Tick::Expired;
        }
        Tick::Running {
            remaining: self.remaining,
        }
    }

    /// `running → cancelled` (or `idle → cancelled`). Returns whether anything changed.
    pub fn cancel(&mut self) -> bool {
        match self.phase {
            CountdownPhase::Idle | CountdownPhase::Running => {
                self.phase = CountdownPhase::Cancelled;
                true
            }
            CountdownPhase::Expired | CountdownPhase::Cancelled => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_ticks_reach_zero_and_expire_once() {
        let budget = 1200;
        let mut countdown = Countdown::new(budget);
        countdown.start();

        let mut expirations = 0;
        for _ in 0..budget {
            if countdown.tick() == Tick::Expired {
                expirations += 1;
            }
        }
        assert_eq!(countdown.remaining(), 0);
        assert_eq!(expirations, 1);

        for _ in 0..5 {
            assert_eq!(countdown.tick(), Tick::Stopped);
        }
        assert_eq!(countdown.remaining(), 0);
        assert_eq!(countdown.phase(), CountdownPhase::Expired);
    }

    #[test]
    fn ticks_before_start_are_ignored() {
        let mut countdown = Countdown::new(3);
        assert_eq!(countdown.tick(), Tick::Stopped);
        assert_eq!(countdown.remaining(), 3);
    }

    #[test]
    fn cancelled_countdown_stops_ticking() {
        let mut countdown = Countdown::new(3);
        countdown.start();
        assert_eq!(countdown.tick(), Tick::Running { remaining: 2 });
        assert!(countdown.cancel());
        assert_eq!(countdown.tick(), Tick::Stopped);
        assert_eq!(countdown.remaining(), 2);
        assert!(!countdown.cancel());
    }

    #[test]
    fn expired_countdown_cannot_be_cancelled_or_restarted() {
        let mut countdown = Countdown::new(1);
        countdown.start();
        assert_eq!(countdown.tick(), Tick::Expired);
        assert!(!countdown.cancel());
        assert_eq!(countdown.start(), Tick::Stopped);
    }

    #[test]
    fn zero_budget_expires_on_start() {
        let mut countdown = Countdown::new(0);
        assert_eq!(countdown.start(), Tick::Expired);
        assert_eq!(countdown.phase(), CountdownPhase::Expired);
    }

    #[test]
    fn label_and_urgency() {
        let mut countdown = Countdown::new(61);
        assert_eq!(countdown.label(), "01:01");
        assert!(!countdown.is_urgent());
        countdown.start();
        countdown.tick();
        countdown.tick();
        assert_eq!(countdown.label(), "00:59");
        assert!(countdown.is_urgent());
    }
}
