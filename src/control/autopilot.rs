/// Timer that flips the mode at a fixed interval while nothing else drives it
#[derive(Debug, Clone)]
pub struct Autopilot {
    interval: Option<f32>,
    elapsed: f32,
}

impl Autopilot {
    pub fn new(interval: Option<f32>) -> Self {
        Self {
            interval: interval.filter(|i| *i > 0.0),
            elapsed: 0.0,
        }
    }

    /// Start a fresh interval
    pub fn restart(&mut self) {
        self.elapsed = 0.0;
    }

    /// Returns true when an interval boundary was crossed. Fires at most once
    /// per call, however large `dt` is.
    pub fn advance(&mut self, dt: f32) -> bool {
        let Some(interval) = self.interval else {
            return false;
        };
        self.elapsed += dt;
        if self.elapsed >= interval {
            self.elapsed %= interval;
            true
        } else {
            false
        }
    }
}
