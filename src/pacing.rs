use std::time::Duration;

pub const SCROLL_THROTTLE: Duration = Duration::from_millis(16);
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(250);

/// Leading-edge rate limiter: the first call in a window runs, the rest of
/// the window is dropped.
#[derive(Debug, Clone)]
pub struct Throttle {
    limit_ms: u64,
    blocked_until: Option<u64>,
}

impl Throttle {
    pub fn new(limit: Duration) -> Self {
        Self {
            limit_ms: limit.as_millis() as u64,
            blocked_until: None,
        }
    }

    pub fn admit(&mut self, now_ms: u64) -> bool {
        if self.blocked_until.is_some_and(|until| now_ms < until) {
            return false;
        }
        self.blocked_until = Some(now_ms + self.limit_ms);
        true
    }
}

/// Trailing-edge debounce built for a timer queue that never cancels.
///
/// Every call hands out a generation and the wait; the owner schedules a
/// task carrying that generation and only the newest one fires.
#[derive(Debug, Clone)]
pub struct Debounce {
    wait: Duration,
    generation: u64,
}

impl Debounce {
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            generation: 0,
        }
    }

    pub fn call(&mut self) -> (u64, Duration) {
        self.generation += 1;
        (self.generation, self.wait)
    }

    pub fn should_fire(&self, generation: u64) -> bool {
        generation == self.generation
    }
}
