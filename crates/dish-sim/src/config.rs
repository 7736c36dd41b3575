//! Simulation configuration.
//!
//! Provides [`SimConfig`] with defaults matching the stock kitchen: three
//! 20-slot temperature shelves, a 30-slot overflow shelf, two orders per
//! second, and a five-minute cap. A JSON file (camelCase keys) may override
//! any subset of fields; a missing file means "use the defaults".

use std::path::Path;
use std::time::Duration;

use dish_core::constants::{
    DEFAULT_COLD_CAPACITY, DEFAULT_FROZEN_CAPACITY, DEFAULT_HOT_CAPACITY,
    DEFAULT_OVERFLOW_CAPACITY,
};
use dish_core::{ShelfCapacities, ShelfKind};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Longest gap allowed between two order placements.
pub const MAX_ORDER_INTERVAL: Duration = Duration::from_secs(86_400);

/// Configuration for a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimConfig {
    pub hot_shelf_capacity: usize,
    pub cold_shelf_capacity: usize,
    pub frozen_shelf_capacity: usize,
    pub overflow_capacity: usize,
    /// Rate at which the producer admits orders.
    pub orders_per_second: f64,
    /// Upper bound on the run in seconds; 0 runs until the orders drain.
    pub simulation_duration: u64,
    /// Multiplier applied to every order's decay rate.
    pub decay_modifier: f64,
    /// Pause between courier passes over the resident orders.
    pub delivery_interval_ms: u64,
    /// Pause between expiry sweeps.
    pub cleanup_interval_ms: u64,
    pub stats_interval_secs: u64,
    /// Time allowed for deliveries and sweeps after the last order is placed.
    pub drain_grace_secs: u64,
    pub courier_min_delay_secs: u64,
    pub courier_max_delay_secs: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            hot_shelf_capacity: DEFAULT_HOT_CAPACITY,
            cold_shelf_capacity: DEFAULT_COLD_CAPACITY,
            frozen_shelf_capacity: DEFAULT_FROZEN_CAPACITY,
            overflow_capacity: DEFAULT_OVERFLOW_CAPACITY,
            orders_per_second: 2.0,
            simulation_duration: 300,
            decay_modifier: 1.0,
            delivery_interval_ms: 500,
            cleanup_interval_ms: 500,
            stats_interval_secs: 10,
            drain_grace_secs: 10,
            courier_min_delay_secs: 2,
            courier_max_delay_secs: 6,
        }
    }
}

impl SimConfig {
    /// Load from a JSON file, falling back to defaults if it does not exist.
    ///
    /// Fields missing from the file keep their default values. The result
    /// is validated before it is returned.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = match std::fs::read_to_string(path) {
            Ok(text) => serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the simulator cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let capacities = self.capacities();
        for (shelf, capacity) in [
            (ShelfKind::Hot, capacities.hot),
            (ShelfKind::Cold, capacities.cold),
            (ShelfKind::Frozen, capacities.frozen),
            (ShelfKind::Overflow, capacities.overflow),
        ] {
            if capacity == 0 {
                return Err(ConfigError::ZeroCapacity { shelf });
            }
        }

        let interval = Duration::try_from_secs_f64(1.0 / self.orders_per_second);
        if !matches!(interval, Ok(interval) if interval <= MAX_ORDER_INTERVAL)
            || !self.orders_per_second.is_finite()
        {
            return Err(ConfigError::InvalidOrderRate(self.orders_per_second));
        }
        if !(self.decay_modifier.is_finite() && self.decay_modifier >= 0.0) {
            return Err(ConfigError::InvalidDecayModifier(self.decay_modifier));
        }

        for (name, value) in [
            ("deliveryIntervalMs", self.delivery_interval_ms),
            ("cleanupIntervalMs", self.cleanup_interval_ms),
            ("statsIntervalSecs", self.stats_interval_secs),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroInterval(name));
            }
        }

        if self.courier_min_delay_secs > self.courier_max_delay_secs {
            return Err(ConfigError::InvalidCourierDelay {
                min: self.courier_min_delay_secs,
                max: self.courier_max_delay_secs,
            });
        }

        Ok(())
    }

    pub fn capacities(&self) -> ShelfCapacities {
        ShelfCapacities {
            hot: self.hot_shelf_capacity,
            cold: self.cold_shelf_capacity,
            frozen: self.frozen_shelf_capacity,
            overflow: self.overflow_capacity,
        }
    }

    /// Time between successive order placements, clamped to
    /// `1µs..=MAX_ORDER_INTERVAL`.
    pub fn order_interval(&self) -> Duration {
        Duration::try_from_secs_f64(1.0 / self.orders_per_second)
            .unwrap_or(MAX_ORDER_INTERVAL)
            .clamp(Duration::from_micros(1), MAX_ORDER_INTERVAL)
    }

    /// Maximum run time, or `None` to run until the orders drain.
    pub fn max_duration(&self) -> Option<Duration> {
        (self.simulation_duration > 0).then(|| Duration::from_secs(self.simulation_duration))
    }

    pub fn delivery_interval(&self) -> Duration {
        Duration::from_millis(self.delivery_interval_ms)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_millis(self.cleanup_interval_ms)
    }

    pub fn stats_interval(&self) -> Duration {
        Duration::from_secs(self.stats_interval_secs)
    }

    pub fn drain_grace(&self) -> Duration {
        Duration::from_secs(self.drain_grace_secs)
    }
}
