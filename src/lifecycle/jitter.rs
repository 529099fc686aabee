//! # Startup jitter for worker provisioning.
//!
//! [`StartupJitter`] bounds the randomized delay a worker sleeps before
//! entering its body. Without it every subsystem's worker would begin at the
//! same instant during boot and contend for shared resources; with it, starts
//! spread across the jitter window.

use std::time::Duration;

use rand::Rng;

/// Bounded random delay applied before a worker body runs.
///
/// The default window is 1–100 ms: never less than one scheduler tick, never
/// long enough to visibly delay bring-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StartupJitter {
    /// Lower bound of the delay window.
    pub min: Duration,
    /// Upper bound of the delay window.
    pub max: Duration,
}

impl Default for StartupJitter {
    fn default() -> Self {
        Self {
            min: Duration::from_millis(1),
            max: Duration::from_millis(100),
        }
    }
}

impl StartupJitter {
    /// Creates a jitter window; `max` is raised to `min` if it is below it.
    pub fn new(min: Duration, max: Duration) -> Self {
        Self { min, max: max.max(min) }
    }

    /// Samples one delay uniformly from `[min, max]`.
    pub fn delay(&self) -> Duration {
        let lo = self.min.as_millis() as u64;
        let hi = (self.max.as_millis() as u64).max(lo);
        Duration::from_millis(rand::rng().random_range(lo..=hi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_delay_within_window() {
        let jitter = StartupJitter::default();
        for _ in 0..200 {
            let d = jitter.delay();
            assert!(d >= Duration::from_millis(1), "delay {:?} below one tick", d);
            assert!(d <= Duration::from_millis(100), "delay {:?} above window", d);
        }
    }

    #[test]
    fn degenerate_window_is_constant() {
        let jitter = StartupJitter::new(Duration::from_millis(5), Duration::from_millis(5));
        for _ in 0..20 {
            assert_eq!(jitter.delay(), Duration::from_millis(5));
        }
    }

    #[test]
    fn inverted_bounds_are_clamped() {
        let jitter = StartupJitter::new(Duration::from_millis(50), Duration::from_millis(10));
        assert_eq!(jitter.max, Duration::from_millis(50));
    }
}
