//! Capacity and timing constants. All durations in seconds unless noted.

/// Default capacity of the hot shelf.
pub const DEFAULT_HOT_CAPACITY: usize = 20;
/// Default capacity of the cold shelf.
pub const DEFAULT_COLD_CAPACITY: usize = 20;
/// Default capacity of the frozen shelf.
pub const DEFAULT_FROZEN_CAPACITY: usize = 20;
/// Default capacity of the shared overflow shelf.
pub const DEFAULT_OVERFLOW_CAPACITY: usize = 30;

/// Value of an order that has not started decaying.
pub const FULL_VALUE: f64 = 1.0;

/// Microseconds per second, used when converting chrono durations.
pub const MICROS_PER_SEC: f64 = 1_000_000.0;
