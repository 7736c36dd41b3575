//! Shared test helpers for integration tests.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dish_core::{ManagerStats, ManualClock, Order, ShelfCapacities, ShelfManager, Temperature};

/// Manager driven by a manual clock starting at a fixed instant.
pub fn manual_manager(
    hot: usize,
    cold: usize,
    frozen: usize,
    overflow: usize,
) -> (Arc<ManualClock>, ShelfManager) {
    let clock = Arc::new(ManualClock::at_epoch());
    let capacities = ShelfCapacities { hot, cold, frozen, overflow };
    let manager = ShelfManager::with_clock(capacities, clock.clone());
    (clock, manager)
}

/// Order that keeps its value for the length of any test.
pub fn durable(name: &str, temp: Temperature) -> Order {
    Order::new(name, temp, 1_000.0, 0.0)
}

/// Cycle through the three real temperatures.
pub fn temperature_for(i: usize) -> Temperature {
    match i % 3 {
        0 => Temperature::Hot,
        1 => Temperature::Cold,
        _ => Temperature::Frozen,
    }
}

/// Check every bookkeeping identity that must hold in any snapshot.
pub fn assert_consistent(stats: &ManagerStats) {
    assert!(stats.is_reconciled(), "totals do not reconcile: {stats:?}");

    let mut added = 0;
    let mut delivered = 0;
    let mut expired = 0;
    for shelf in stats.shelves() {
        assert!(
            shelf.current <= shelf.capacity,
            "{} shelf over capacity: {}/{}",
            shelf.kind,
            shelf.current,
            shelf.capacity
        );
        assert!(shelf.stats.peak_usage <= shelf.capacity);
        added += shelf.stats.orders_added;
        delivered += shelf.stats.orders_delivered;
        expired += shelf.stats.orders_wasted;
    }

    assert_eq!(added, stats.totals.received - stats.totals.wasted);
    assert_eq!(delivered, stats.totals.delivered);
    assert_eq!(expired, stats.totals.expired);
}

/// Write `value` as JSON to `dir/name` and return the path.
pub fn write_json(dir: &Path, name: &str, value: &serde_json::Value) -> PathBuf {
    let path = dir.join(name);
    let text = serde_json::to_string_pretty(value).unwrap();
    std::fs::write(&path, text).unwrap();
    path
}
