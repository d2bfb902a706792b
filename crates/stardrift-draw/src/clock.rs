use std::time::Instant;

/// Wall-clock time since start, in seconds.
#[derive(Debug, Clone)]
pub struct Clock {
    start: Instant,
    last: Instant,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }

    /// Seconds since the previous call (or since start).
    pub fn delta(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last);
        self.last = now;
        delta.as_secs_f32()
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    #[cfg(test)]
    fn rewind(&mut self, by: std::time::Duration) {
        self.start -= by;
        self.last -= by;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn elapsed_grows() {
        let mut clock = Clock::new();
        clock.rewind(Duration::from_secs(2));
        assert!(clock.elapsed() >= 2.0);
    }

    #[test]
    fn delta_resets_each_call() {
        let mut clock = Clock::new();
        clock.rewind(Duration::from_millis(500));
        assert!(clock.delta() >= 0.5);
        assert!(clock.delta() < 0.5);
    }
}
