use std::time::{Duration, Instant};

/// Per-task countdown. A zero duration disables it: it never expires.
#[derive(Clone, Debug)]
pub struct Countdown {
    duration: Duration,
    started_at: Option<Instant>,
    fired: bool,
}

impl Countdown {
    pub fn new(seconds: u64) -> Self {
        Self {
            duration: Duration::from_secs(seconds),
            started_at: None,
            fired: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.duration.is_zero()
    }

    pub fn reset(&mut self, now: Instant) {
        self.started_at = Some(now);
        self.fired = false;
    }

    pub fn stop(&mut self) {
        self.started_at = None;
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        match self.started_at {
            Some(start) => self
                .duration
                .saturating_sub(now.saturating_duration_since(start)),
            None => self.duration,
        }
    }

    /// True exactly once per reset, on the first poll after time runs out.
    pub fn poll_expired(&mut self, now: Instant) -> bool {
        if !self.is_enabled() || self.fired || self.started_at.is_none() {
            return false;
        }
        if self.remaining(now).is_zero() {
            self.fired = true;
            return true;
        }
        false
    }

    /// Fraction of the countdown still left, 1.0 when freshly reset.
    pub fn ratio(&self, now: Instant) -> f64 {
        if !self.is_enabled() {
            return 1.0;
        }
        self.remaining(now).as_secs_f64() / self.duration.as_secs_f64()
    }

    pub fn display(&self, now: Instant) -> String {
        let secs = self.remaining(now).as_secs_f64().ceil() as u64;
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_after_duration() {
        let t0 = Instant::now();
        let mut timer = Countdown::new(5);
        timer.reset(t0);
        assert!(!timer.poll_expired(t0 + Duration::from_secs(4)));
        assert!(timer.poll_expired(t0 + Duration::from_secs(5)));
        assert!(!timer.poll_expired(t0 + Duration::from_secs(6)));
    }

    #[test]
    fn reset_rearms() {
        let t0 = Instant::now();
        let mut timer = Countdown::new(1);
        timer.reset(t0);
        assert!(timer.poll_expired(t0 + Duration::from_secs(2)));
        timer.reset(t0 + Duration::from_secs(2));
        assert!(!timer.poll_expired(t0 + Duration::from_millis(2500)));
        assert!(timer.poll_expired(t0 + Duration::from_secs(3)));
    }

    #[test]
    fn disabled_or_stopped_never_fires() {
        let t0 = Instant::now();
        let mut disabled = Countdown::new(0);
        disabled.reset(t0);
        assert!(!disabled.poll_expired(t0 + Duration::from_secs(100)));
        assert_eq!(disabled.ratio(t0), 1.0);

        let mut stopped = Countdown::new(1);
        assert!(!stopped.poll_expired(t0 + Duration::from_secs(100)));
        stopped.reset(t0);
        stopped.stop();
        assert!(!stopped.poll_expired(t0 + Duration::from_secs(100)));
    }

    #[test]
    fn display_rounds_up_to_whole_seconds() {
        let t0 = Instant::now();
        let mut timer = Countdown::new(90);
        timer.reset(t0);
        assert_eq!(timer.display(t0), "01:30");
        assert_eq!(timer.display(t0 + Duration::from_millis(500)), "01:30");
        assert_eq!(timer.display(t0 + Duration::from_secs(31)), "00:59");
        assert_eq!(timer.display(t0 + Duration::from_secs(200)), "00:00");
        assert!((timer.ratio(t0 + Duration::from_secs(45)) - 0.5).abs() < 1e-9);
    }
}
