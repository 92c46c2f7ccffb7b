//! Fixed-rate timer driven by the host event loop

use snow_physics::Millis;

/// Interval of the stuck-particle fade sweep
pub const FADE_SWEEP_INTERVAL_MS: Millis = 100;

/// Fires at most once per poll, at a fixed period, independent of frame rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalTimer {
    period: Millis,
    next_due: Option<Millis>,
}

impl IntervalTimer {
    pub fn new(period: Millis) -> Self {
        Self {
            period: period.max(1),
            next_due: None,
        }
    }

    /// Arm the timer; the first firing is one period after `now`
    pub fn start(&mut self, now: Millis) {
        if self.next_due.is_none() {
            self.next_due = Some(now + self.period);
        }
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn period(&self) -> Millis {
        self.period
    }

    /// When the timer will next fire, if armed
    pub fn next_deadline(&self) -> Option<Millis> {
        self.next_due
    }

    /// Whether the timer fired at `now`. Missed periods collapse into one firing.
    pub fn poll(&mut self, now: Millis) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if now < due {
            return false;
        }

        let missed = (now - due) / self.period;
        self.next_due = Some(due + (missed + 1) * self.period);
        true
    }
}

impl Default for IntervalTimer {
    fn default() -> Self {
        Self::new(FADE_SWEEP_INTERVAL_MS)
    }
}
