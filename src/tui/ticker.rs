use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    next_due: Instant,
}

impl Ticker {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next_due: now,
        }
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Takes effect from the next scheduled tick.
    pub fn set_interval(&mut self, interval: Duration) {
        if interval != self.interval {
            if let Some(last) = self.next_due.checked_sub(self.interval) {
                self.next_due = last + interval;
            }
            self.interval = interval;
        }
    }

    pub fn until_next(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }

    /// `true` at most once per interval; re-arms relative to `now` so a
    /// stalled loop does not burst through missed ticks.
    pub fn due(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        self.next_due = now + self.interval;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tick_is_immediate() {
        let start = Instant::now();
        let mut ticker = Ticker::new(Duration::from_millis(500), start);
        assert_eq!(ticker.until_next(start), Duration::ZERO);
        assert!(ticker.due(start));
        assert!(!ticker.due(start));
    }

    #[test]
    fn test_fires_once_per_interval() {
        let start = Instant::now();
        let mut ticker = Ticker::new(Duration::from_millis(100), start);
        assert!(ticker.due(start));

        assert!(!ticker.due(start + Duration::from_millis(99)));
        assert_eq!(
            ticker.until_next(start + Duration::from_millis(40)),
            Duration::from_millis(60)
        );
        assert!(ticker.due(start + Duration::from_millis(100)));
    }

    #[test]
    fn test_missed_ticks_do_not_burst() {
        let start = Instant::now();
        let mut ticker = Ticker::new(Duration::from_millis(100), start);
        assert!(ticker.due(start));

        let late = start + Duration::from_secs(5);
        assert!(ticker.due(late));
        assert!(!ticker.due(late + Duration::from_millis(50)));
    }

    #[test]
    fn test_interval_change_reschedules() {
        let start = Instant::now();
        let mut ticker = Ticker::new(Duration::from_millis(500), start);
        assert!(ticker.due(start));

        ticker.set_interval(Duration::from_millis(200));
        assert_eq!(ticker.interval(), Duration::from_millis(200));
        assert_eq!(ticker.until_next(start), Duration::from_millis(200));
    }
}
