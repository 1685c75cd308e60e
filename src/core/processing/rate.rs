use std::time::Duration;

/// Admits at most one frame per interval. Dropped frames are never queued.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    interval: Duration,
    last_admitted: Option<Duration>,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_admitted: None,
        }
    }

    /// Returns true and moves the reference to `now` if at least one interval
    /// has passed since the last admitted frame. The first frame is always
    /// admitted; a timestamp before the reference is dropped.
    pub fn admit(&mut self, now: Duration) -> bool {
        let admitted = match self.last_admitted {
            None => true,
            Some(last) => now
                .checked_sub(last)
                .is_some_and(|elapsed| elapsed >= self.interval),
        };
        if admitted {
            self.last_admitted = Some(now);
        }
        admitted
    }

    pub fn last_admitted(&self) -> Option<Duration> {
        self.last_admitted
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}
