//! Polite delay between search-page requests.
//!
//! The crawl pauses before each search-results fetch so the harvester never
//! hammers the site. The pause is a base delay plus uniform random jitter,
//! matching the "sleep a few seconds, vary it a little" behavior scrapers
//! conventionally use to look less mechanical.

use std::time::Duration;

/// Randomized pause awaited before each search-page fetch.
#[derive(Debug, Clone)]
pub struct PageThrottle {
    /// Minimum pause before a page request.
    pub delay: Duration,

    /// Maximum random jitter added on top of `delay` (uniform [0, jitter]).
    /// Set to `Duration::ZERO` to make the pause deterministic.
    pub jitter: Duration,
}

impl PageThrottle {
    /// Fixed pause with no jitter.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            jitter: Duration::ZERO,
        }
    }

    /// Add random jitter (uniform [0, jitter]) on top of the base delay.
    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    /// No pause at all. For tests and fixture servers.
    pub fn none() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Compute the pause for a single wait (delay + random jitter).
    fn effective_delay(&self) -> Duration {
        if self.jitter.is_zero() {
            return self.delay;
        }
        let jitter_ms = rand_jitter_ms(self.jitter.as_millis() as u64);
        self.delay + Duration::from_millis(jitter_ms)
    }

    /// Sleep for the configured pause.
    pub async fn pause(&self) {
        let duration = self.effective_delay();
        if duration.is_zero() {
            return;
        }
        tracing::debug!(sleep_ms = %duration.as_millis(), "Throttling before page fetch");
        tokio::time::sleep(duration).await;
    }
}

impl Default for PageThrottle {
    /// 2 second delay, 3 seconds of jitter — a 2–5 s pause per page.
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(2),
            jitter: Duration::from_secs(3),
        }
    }
}

// ---------------------------------------------------------------------------
// Deterministic jitter based on std — avoids pulling in the `rand` crate.
// Uses a simple xorshift seeded from the current time.
// ---------------------------------------------------------------------------

fn rand_jitter_ms(max_ms: u64) -> u64 {
    if max_ms == 0 {
        return 0;
    }
    // Seed from high-resolution clock — good enough for jitter, not crypto.
    let mut x = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64;
    // xorshift64
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    x % max_ms
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn effective_delay_without_jitter() {
        let throttle = PageThrottle::new(Duration::from_secs(1));
        assert_eq!(throttle.effective_delay(), Duration::from_secs(1));
    }

    #[test]
    fn effective_delay_with_jitter_is_bounded() {
        let throttle =
            PageThrottle::new(Duration::from_millis(100)).with_jitter(Duration::from_millis(50));
        for _ in 0..100 {
            let d = throttle.effective_delay();
            assert!(d >= Duration::from_millis(100));
            assert!(d < Duration::from_millis(150));
        }
    }

    #[tokio::test]
    async fn pause_enforces_delay() {
        let throttle = PageThrottle::new(Duration::from_millis(50));
        let start = Instant::now();
        throttle.pause().await;
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn none_does_not_sleep() {
        let throttle = PageThrottle::none();
        let start = Instant::now();
        throttle.pause().await;
        assert!(start.elapsed() < Duration::from_millis(20));
    }

    #[test]
    fn default_config_matches_polite_range() {
        let throttle = PageThrottle::default();
        assert_eq!(throttle.delay, Duration::from_secs(2));
        assert_eq!(throttle.jitter, Duration::from_secs(3));
    }
}
