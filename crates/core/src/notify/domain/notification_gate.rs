use std::time::{Duration, Instant};

/// Rate-limits the notification side effect to one firing per cooldown
/// window.
///
/// Elapsed time is compared in whole seconds, so a tick landing just
/// past the boundary may admit a firing a fraction of a second early
/// or late. A freshly created gate allows an immediate firing.
#[derive(Clone, Debug)]
pub struct NotificationGate {
    cooldown: Duration,
    last_fired: Option<Instant>,
}

impl NotificationGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_fired: None,
        }
    }

    /// True when no firing happened yet, or more than the cooldown's
    /// whole seconds have elapsed since the last one.
    pub fn should_fire(&self, now: Instant) -> bool {
        match self.last_fired {
            None => true,
            Some(last) => now.saturating_duration_since(last).as_secs() > self.cooldown.as_secs(),
        }
    }

    /// Restarts the suppression window at `now`.
    pub fn mark_fired(&mut self, now: Instant) {
        self.last_fired = Some(now);
    }

    /// Forgets any previous firing, re-arming the gate.
    pub fn reset(&mut self) {
        self.last_fired = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COOLDOWN: Duration = Duration::from_secs(10);

    #[test]
    fn test_fresh_gate_fires_immediately() {
        let gate = NotificationGate::new(COOLDOWN);
        assert!(gate.should_fire(Instant::now()));
    }

    #[test]
    fn test_suppressed_within_cooldown() {
        let t0 = Instant::now();
        let mut gate = NotificationGate::new(COOLDOWN);
        gate.mark_fired(t0);

        assert!(!gate.should_fire(t0));
        assert!(!gate.should_fire(t0 + Duration::from_secs(1)));
        assert!(!gate.should_fire(t0 + Duration::from_secs(9)));
        // Exactly 10 elapsed seconds is still inside the window
        // (strict "greater than" comparison).
        assert!(!gate.should_fire(t0 + Duration::from_secs(10)));
    }

    #[test]
    fn test_fires_after_cooldown() {
        let t0 = Instant::now();
        let mut gate = NotificationGate::new(COOLDOWN);
        gate.mark_fired(t0);
        assert!(gate.should_fire(t0 + Duration::from_secs(11)));
    }

    #[test]
    fn test_at_most_once_per_window() {
        let t0 = Instant::now();
        let mut gate = NotificationGate::new(COOLDOWN);

        // Faces on every tick for 30 seconds of 1s ticks.
        let mut fired = 0;
        for s in 0..30 {
            let now = t0 + Duration::from_secs(s);
            if gate.should_fire(now) {
                gate.mark_fired(now);
                fired += 1;
            }
        }
        // t=0, t=11, t=22.
        assert_eq!(fired, 3);
    }

    #[test]
    fn test_truncation_admits_sub_second_early_fire() {
        let t0 = Instant::now();
        let mut gate = NotificationGate::new(COOLDOWN);
        gate.mark_fired(t0);
        // 10.999s elapsed truncates to 10 whole seconds: suppressed.
        assert!(!gate.should_fire(t0 + Duration::from_millis(10_999)));
        // 11.0s elapsed truncates to 11: admitted.
        assert!(gate.should_fire(t0 + Duration::from_millis(11_000)));
    }

    #[test]
    fn test_reset_rearms_the_gate() {
        let t0 = Instant::now();
        let mut gate = NotificationGate::new(COOLDOWN);
        gate.mark_fired(t0);
        assert!(!gate.should_fire(t0 + Duration::from_secs(1)));
        gate.reset();
        assert!(gate.should_fire(t0 + Duration::from_secs(1)));
    }
}
