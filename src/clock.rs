use std::time::{Duration, Instant};

/// Fixed-interval deadline clock for driving ticks from an event loop.
///
/// At most one tick is due per poll. A caller that falls behind skips the
/// missed deadlines rather than running a burst of catch-up ticks.
#[derive(Debug, Clone)]
pub struct TickClock {
    interval: Duration,
    next_due: Instant,
}

impl TickClock {
    /// First tick is due one interval after `now`
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next_due: now + interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Change the interval; the pending deadline moves with it
    pub fn set_interval(&mut self, interval: Duration, now: Instant) {
        self.interval = interval;
        self.next_due = now + interval;
    }

    /// How long the caller may wait for input before the next tick
    pub fn time_until_due(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }

    /// Returns true when a tick is due and schedules the following one
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        self.next_due += self.interval;
        if self.next_due <= now {
            // Fell behind by more than an interval
            self.next_due = now + self.interval;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_50: Duration = Duration::from_millis(50);

    #[test]
    fn test_not_due_before_interval() {
        let start = Instant::now();
        let mut clock = TickClock::new(MS_50, start);
        assert!(!clock.poll(start));
        assert!(!clock.poll(start + Duration::from_millis(49)));
        assert_eq!(clock.time_until_due(start + Duration::from_millis(20)), Duration::from_millis(30));
    }

    #[test]
    fn test_due_once_per_interval() {
        let start = Instant::now();
        let mut clock = TickClock::new(MS_50, start);
        let t = start + MS_50;
        assert!(clock.poll(t));
        assert!(!clock.poll(t));
        assert!(clock.poll(t + MS_50));
    }

    #[test]
    fn test_keeps_cadence_when_slightly_late() {
        let start = Instant::now();
        let mut clock = TickClock::new(MS_50, start);
        assert!(clock.poll(start + Duration::from_millis(60)));
        // Next deadline stays on the 100 ms grid
        assert_eq!(clock.time_until_due(start + Duration::from_millis(60)), Duration::from_millis(40));
    }

    #[test]
    fn test_skips_missed_deadlines() {
        let start = Instant::now();
        let mut clock = TickClock::new(MS_50, start);
        let late = start + Duration::from_millis(500);
        assert!(clock.poll(late));
        assert!(!clock.poll(late));
        assert_eq!(clock.time_until_due(late), MS_50);
    }

    #[test]
    fn test_set_interval_reschedules() {
        let start = Instant::now();
        let mut clock = TickClock::new(MS_50, start);
        clock.set_interval(Duration::from_millis(200), start);
        assert_eq!(clock.interval(), Duration::from_millis(200));
        assert!(!clock.poll(start + MS_50));
        assert!(clock.poll(start + Duration::from_millis(200)));
    }
}
