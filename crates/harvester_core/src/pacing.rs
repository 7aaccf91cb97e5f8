use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Inclusive range of pauses, in milliseconds, sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pacing {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl Pacing {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    pub const fn fixed(ms: u64) -> Self {
        Self::new(ms, ms)
    }

    /// Swapped bounds are tolerated.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let (low, high) = if self.min_ms <= self.max_ms {
            (self.min_ms, self.max_ms)
        } else {
            (self.max_ms, self.min_ms)
        };
        Duration::from_millis(rng.gen_range(low..=high))
    }
}
