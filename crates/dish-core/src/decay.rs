//! Linear, segmented value decay.
//!
//! An order loses `decay_rate` value units per second of residency. Residency
//! is tracked in two segments (time on its primary shelf and time on the
//! overflow shelf) and both segments decay at the same rate:
//!
//! ```text
//! decay = decay_rate * primary_secs + decay_rate * overflow_secs
//! value = max(0, shelf_life - decay) / shelf_life
//! ```
//!
//! This is the only value formula in the crate. There is no overflow penalty.

use chrono::{DateTime, Utc};

use crate::constants::{FULL_VALUE, MICROS_PER_SEC};

/// Seconds an order has spent on each kind of shelf.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Residency {
    /// Seconds on the primary shelf before the first move to overflow
    /// (or until now, if the order never touched overflow).
    pub primary_secs: f64,
    /// Seconds since the order first touched the overflow shelf.
    pub overflow_secs: f64,
}

impl Residency {
    pub fn total_secs(&self) -> f64 {
        self.primary_secs + self.overflow_secs
    }
}

/// Value units lost over `residency` at `decay_rate` units per second.
pub fn decay_amount(decay_rate: f64, residency: Residency) -> f64 {
    decay_rate * residency.primary_secs + decay_rate * residency.overflow_secs
}

/// Normalized value in `[0, 1]` after `residency`.
///
/// A non-positive shelf life has no value to lose and reports 0.
pub fn remaining_value(shelf_life: f64, decay_rate: f64, residency: Residency) -> f64 {
    if !(shelf_life > 0.0) {
        return 0.0;
    }

    let remaining = shelf_life - decay_amount(decay_rate, residency);
    if remaining <= 0.0 {
        return 0.0;
    }

    (remaining / shelf_life).min(FULL_VALUE)
}

/// Fractional seconds from `from` to `to`, clamped at zero.
pub fn elapsed_secs(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let delta = to.signed_duration_since(from);
    match delta.num_microseconds() {
        Some(micros) => micros.max(0) as f64 / MICROS_PER_SEC,
        // Beyond ~292k years of microseconds; whole seconds are plenty.
        None => delta.num_seconds().max(0) as f64,
    }
}
