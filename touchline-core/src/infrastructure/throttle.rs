// touchline-core/src/infrastructure/throttle.rs

use rand::Rng;
use std::time::Duration;
use tracing::debug;

use crate::domain::project::PacingConfig;

/// Randomized pause between calls to an external source.
#[derive(Debug, Clone, Copy)]
pub struct Throttle {
    min_ms: u64,
    max_ms: u64,
}

impl Throttle {
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self {
            min_ms: min_ms.min(max_ms),
            max_ms: max_ms.max(min_ms),
        }
    }

    /// Between two calls to the same source.
    pub fn between_calls(pacing: &PacingConfig) -> Self {
        Self::new(pacing.min_delay_ms, pacing.max_delay_ms)
    }

    /// Between two clubs of a squad snapshot.
    pub fn between_clubs(pacing: &PacingConfig) -> Self {
        Self::new(pacing.club_min_delay_ms, pacing.club_max_delay_ms)
    }

    /// No waiting at all (tests, local sources).
    pub fn none() -> Self {
        Self::new(0, 0)
    }

    pub fn next_delay(&self) -> Duration {
        if self.max_ms == 0 {
            return Duration::ZERO;
        }
        let ms = rand::thread_rng().gen_range(self.min_ms..=self.max_ms);
        Duration::from_millis(ms)
    }

    pub async fn wait(&self) {
        let delay = self.next_delay();
        if delay.is_zero() {
            return;
        }
        debug!(delay_ms = delay.as_millis() as u64, "Pausing before next call");
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_stays_in_range() {
        let t = Throttle::new(500, 1500);
        for _ in 0..200 {
            let d = t.next_delay().as_millis();
            assert!((500..=1500).contains(&d));
        }
    }

    #[test]
    fn test_inverted_bounds_are_swapped() {
        let t = Throttle::new(20, 10);
        let d = t.next_delay().as_millis();
        assert!((10..=20).contains(&d));
    }

    #[tokio::test]
    async fn test_none_does_not_wait() {
        let start = std::time::Instant::now();
        Throttle::none().wait().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
