//! Randomized pause between deliveries.

use nostra_core::config::CampaignConfig;
use rand::Rng;
use std::time::Duration;

/// Uniform pause drawn from `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayPolicy {
    min: Duration,
    max: Duration,
}

impl DelayPolicy {
    /// Swaps the bounds if given inverted.
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// No pause at all.
    #[cfg(test)]
    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn from_config(cfg: &CampaignConfig) -> Self {
        Self::new(
            Duration::from_secs(cfg.min_delay_secs),
            Duration::from_secs(cfg.max_delay_secs),
        )
    }

    pub fn is_zero(&self) -> bool {
        self.max.is_zero()
    }

    pub fn bounds(&self) -> (Duration, Duration) {
        (self.min, self.max)
    }

    /// Draw one pause length.
    pub fn sample(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let secs = rand::thread_rng().gen_range(self.min.as_secs_f64()..=self.max.as_secs_f64());
        Duration::from_secs_f64(secs)
    }
}

impl Default for DelayPolicy {
    fn default() -> Self {
        Self::from_config(&CampaignConfig::default())
    }
}
