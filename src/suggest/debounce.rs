/// Cancellable one-shot timer bookkeeping
///
/// The timer does not sleep itself. It hands out tokens; whoever owns the
/// clock reports expiry with `fire(token)`, and only the newest token that
/// has not been cancelled fires, once.

use std::time::Duration;

/// Identifies one scheduling of a timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

#[derive(Debug, Clone)]
pub struct DebounceTimer {
    delay: Duration,
    generation: u64,
    armed: Option<u64>,
}

impl DebounceTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            armed: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Start (or restart) the timer; any earlier token is superseded
    pub fn schedule(&mut self) -> TimerToken {
        self.generation += 1;
        self.armed = Some(self.generation);
        TimerToken(self.generation)
    }

    /// Disarm without firing
    pub fn cancel(&mut self) {
        self.armed = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Report that `token` elapsed; true only for the live token, at most once
    pub fn fire(&mut self, token: TimerToken) -> bool {
        if self.armed == Some(token.0) {
            self.armed = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timer() -> DebounceTimer {
        DebounceTimer::new(Duration::from_millis(300))
    }

    #[test]
    fn test_fires_once() {
        let mut t = timer();
        let token = t.schedule();

        assert!(t.is_armed());
        assert!(t.fire(token));
        assert!(!t.fire(token));
        assert!(!t.is_armed());
    }

    #[test]
    fn test_reschedule_supersedes() {
        let mut t = timer();
        let first = t.schedule();
        let second = t.schedule();

        assert_ne!(first, second);
        assert!(!t.fire(first));
        assert!(t.fire(second));
    }

    #[test]
    fn test_cancel_prevents_fire() {
        let mut t = timer();
        let token = t.schedule();
        t.cancel();

        assert!(!t.fire(token));
    }

    #[test]
    fn test_old_token_cannot_fire_after_new_one_fired() {
        let mut t = timer();
        let first = t.schedule();
        let second = t.schedule();
        assert!(t.fire(second));

        assert!(!t.fire(first));
    }
}
