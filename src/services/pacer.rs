use std::time::Duration;

use rand::Rng;

use crate::configuration::DelayRange;

/// Sleeps for a random duration drawn uniformly from `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacer {
    min: Duration,
    max: Duration,
}

impl Pacer {
    pub fn new(min: Duration, max: Duration) -> Self {
        Pacer {
            min,
            max: max.max(min),
        }
    }

    pub fn none() -> Self {
        Pacer::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn pick(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        rand::thread_rng().gen_range(self.min..=self.max)
    }

    pub async fn pause(&self) {
        let delay = self.pick();
        if delay.is_zero() {
            return;
        }
        log::debug!("Pausing for {:?}", delay);
        tokio::time::sleep(delay).await;
    }
}

impl From<DelayRange> for Pacer {
    fn from(range: DelayRange) -> Self {
        Pacer::new(
            Duration::from_millis(range.min_ms),
            Duration::from_millis(range.max_ms),
        )
    }
}
