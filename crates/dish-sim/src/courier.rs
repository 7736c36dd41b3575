//! Courier timing policies.
//!
//! The courier waits before each delivery attempt to model travel time.
//! The wait is a driver concern; the shelves never see it.

use std::time::Duration;

use rand::Rng;

/// Decides how long the courier waits before attempting a delivery.
pub trait CourierPolicy: Send + Sync {
    fn delay(&self) -> Duration;
}

/// Uniformly random whole-second delay in `min_secs..=max_secs`.
#[derive(Debug, Clone, Copy)]
pub struct RandomDelay {
    min_secs: u64,
    max_secs: u64,
}

impl RandomDelay {
    /// Bounds are swapped if given in the wrong order.
    pub fn new(min_secs: u64, max_secs: u64) -> Self {
        Self {
            min_secs: min_secs.min(max_secs),
            max_secs: min_secs.max(max_secs),
        }
    }
}

impl CourierPolicy for RandomDelay {
    fn delay(&self) -> Duration {
        let secs = rand::thread_rng().gen_range(self.min_secs..=self.max_secs);
        Duration::from_secs(secs)
    }
}

/// The same delay every time.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl CourierPolicy for FixedDelay {
    fn delay(&self) -> Duration {
        self.0
    }
}
