//! Capacity-bounded, lock-protected container of orders for one zone.
//!
//! Every operation takes the shelf's lock for its own duration only.
//! Mutators are crate-private: outside this crate a shelf is only changed
//! through the [`ShelfManager`](crate::manager::ShelfManager), which always
//! takes its own lock before a shelf lock.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::debug;

use crate::clock::SystemClock;
use crate::order::Order;
use crate::stats::{ShelfSnapshot, ShelfStats};
use crate::traits::Clock;
use crate::types::{OrderId, ShelfKind};

/// Resident orders and counters, guarded together.
#[derive(Default)]
struct ShelfState {
    /// Primary storage: order id → order.
    orders: HashMap<OrderId, Order>,
    stats: ShelfStats,
}

/// A single zone with fixed capacity.
pub struct Shelf {
    kind: ShelfKind,
    capacity: usize,
    state: Mutex<ShelfState>,
    clock: Arc<dyn Clock>,
}

impl Shelf {
    /// Create an empty shelf timed by the system clock.
    pub fn new(kind: ShelfKind, capacity: usize) -> Self {
        Self::with_clock(kind, capacity, Arc::new(SystemClock))
    }

    /// Create an empty shelf that timestamps orders with `clock`.
    pub fn with_clock(kind: ShelfKind, capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            kind,
            capacity,
            state: Mutex::new(ShelfState::default()),
            clock,
        }
    }

    pub fn kind(&self) -> ShelfKind {
        self.kind
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Shelve `order`.
    ///
    /// Fails without touching the shelf or the order when the shelf is full
    /// or already holds an order with the same id; the order is handed back.
    /// On success the first placement time is recorded if unset, the current
    /// zone is updated, and on the overflow shelf the first overflow time is
    /// recorded if unset.
    pub(crate) fn add_order(&self, mut order: Order) -> Result<(), Order> {
        let now = self.clock.now();
        let mut state = self.state.lock();

        if state.orders.len() >= self.capacity || state.orders.contains_key(order.id()) {
            return Err(order);
        }

        order.mark_placed(self.kind, now);
        let id = order.id().clone();
        state.orders.insert(id.clone(), order);
        state.stats.orders_added += 1;
        state.stats.peak_usage = state.stats.peak_usage.max(state.orders.len());

        debug!(order_id = %id, shelf = %self.kind, size = state.orders.len(), "order shelved");
        Ok(())
    }

    /// Take an order off the shelf without resolving it.
    ///
    /// The caller owns any terminal timestamp.
    #[cfg_attr(not(test), allow(dead_code))]
    pub(crate) fn remove_order(&self, id: &str) -> Option<Order> {
        let mut state = self.state.lock();
        let order = state.orders.remove(id)?;
        state.stats.orders_removed += 1;
        Some(order)
    }

    /// Remove an order and stamp it delivered.
    pub(crate) fn mark_order_delivered(&self, id: &str) -> Option<Order> {
        let now = self.clock.now();
        let mut state = self.state.lock();
        let mut order = state.orders.remove(id)?;
        order.mark_delivered(now);
        state.stats.orders_delivered += 1;
        state.stats.orders_removed += 1;
        Some(order)
    }

    /// Remove every order with no value left at `now`, stamping each wasted.
    ///
    /// Visits each resident order exactly once. Returns the number removed.
    pub(crate) fn remove_expired_orders(&self, now: DateTime<Utc>) -> usize {
        let mut state = self.state.lock();
        let ShelfState { orders, stats } = &mut *state;

        let mut expired = 0;
        orders.retain(|id, order| {
            if !order.is_expired(now) {
                return true;
            }
            order.mark_wasted(now);
            stats.orders_wasted += 1;
            expired += 1;
            debug!(order_id = %id, shelf = %self.kind, "order expired");
            false
        });

        expired
    }

    /// Snapshot of resident orders, in no particular order.
    pub fn get_all_orders(&self) -> Vec<Order> {
        self.state.lock().orders.values().cloned().collect()
    }

    /// Copy of a resident order, if present.
    pub fn get_order(&self, id: &str) -> Option<Order> {
        self.state.lock().orders.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.state.lock().orders.contains_key(id)
    }

    /// Number of resident orders.
    pub fn size(&self) -> usize {
        self.state.lock().orders.len()
    }

    pub fn is_full(&self) -> bool {
        self.size() >= self.capacity
    }

    pub fn get_stats(&self) -> ShelfStats {
        self.state.lock().stats
    }

    /// Occupancy and counters read under one lock acquisition.
    pub fn snapshot(&self) -> ShelfSnapshot {
        let state = self.state.lock();
        ShelfSnapshot {
            kind: self.kind,
            capacity: self.capacity,
            current: state.orders.len(),
            stats: state.stats,
        }
    }
}

impl fmt::Debug for Shelf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shelf")
            .field("kind", &self.kind)
            .field("capacity", &self.capacity)
            .field("size", &self.size())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::types::Temperature;
    use proptest::prelude::*;

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn order(id: &str) -> Order {
        Order::with_id(id, "Pizza", Temperature::Hot, 300.0, 0.5)
    }

    fn shelf_with_clock(kind: ShelfKind, capacity: usize) -> (Shelf, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::at_epoch());
        let shelf = Shelf::with_clock(kind, capacity, clock.clone());
        (shelf, clock)
    }

    // ------------------------------------------------------------------
    // Capacity
    // ------------------------------------------------------------------

    #[test]
    fn new_shelf_is_empty() {
        let shelf = Shelf::new(ShelfKind::Cold, 3);
        assert_eq!(shelf.size(), 0);
        assert!(!shelf.is_full());
        assert_eq!(shelf.get_stats(), ShelfStats::default());
        assert_eq!(shelf.kind(), ShelfKind::Cold);
        assert_eq!(shelf.capacity(), 3);
    }

    #[test]
    fn add_until_full_then_reject() {
        let shelf = Shelf::new(ShelfKind::Hot, 2);
        assert!(shelf.add_order(order("1")).is_ok());
        assert!(shelf.add_order(order("2")).is_ok());
        assert!(shelf.is_full());

        let rejected = shelf.add_order(order("3")).unwrap_err();
        assert_eq!(rejected.id().as_str(), "3");
        assert!(rejected.placed_on_shelf_at().is_none(), "rejected order must be untouched");
        assert_eq!(shelf.size(), 2);
        assert_eq!(shelf.get_stats().orders_added, 2);
    }

    #[test]
    fn zero_capacity_rejects_everything() {
        let shelf = Shelf::new(ShelfKind::Frozen, 0);
        assert!(shelf.is_full());
        assert!(shelf.add_order(order("1")).is_err());
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let shelf = Shelf::new(ShelfKind::Hot, 5);
        assert!(shelf.add_order(order("dup")).is_ok());
        assert!(shelf.add_order(order("dup")).is_err());
        assert_eq!(shelf.size(), 1);
    }

    // ------------------------------------------------------------------
    // Placement timestamps
    // ------------------------------------------------------------------

    #[test]
    fn add_stamps_primary_placement() {
        let (shelf, clock) = shelf_with_clock(ShelfKind::Hot, 1);
        shelf.add_order(order("1")).unwrap();
        let o = shelf.get_order("1").unwrap();
        assert_eq!(o.placed_on_shelf_at(), Some(clock.now()));
        assert!(o.placed_on_overflow_at().is_none());
        assert_eq!(o.current_shelf(), Some(ShelfKind::Hot));
    }

    #[test]
    fn overflow_add_stamps_overflow_placement() {
        let (shelf, clock) = shelf_with_clock(ShelfKind::Overflow, 1);
        shelf.add_order(order("1")).unwrap();
        let o = shelf.get_order("1").unwrap();
        assert_eq!(o.placed_on_overflow_at(), Some(clock.now()));
        assert_eq!(o.current_shelf(), Some(ShelfKind::Overflow));
    }

    #[test]
    fn moving_to_overflow_keeps_primary_time() {
        let clock = Arc::new(ManualClock::at_epoch());
        let hot = Shelf::with_clock(ShelfKind::Hot, 1, clock.clone());
        let overflow = Shelf::with_clock(ShelfKind::Overflow, 1, clock.clone());
        let placed = clock.now();

        hot.add_order(order("1")).unwrap();
        clock.advance_secs(50.0);
        let moved = hot.remove_order("1").unwrap();
        overflow.add_order(moved).unwrap();
        clock.advance_secs(100.0);

        let o = overflow.get_order("1").unwrap();
        assert_eq!(o.placed_on_shelf_at(), Some(placed));
        let v = o.calculate_value(clock.now());
        assert!((v - 0.75).abs() < 1e-9, "value {v}");
    }

    // ------------------------------------------------------------------
    // Removal and delivery
    // ------------------------------------------------------------------

    #[test]
    fn remove_order_counts_removal_only() {
        let shelf = Shelf::new(ShelfKind::Hot, 2);
        shelf.add_order(order("1")).unwrap();
        let removed = shelf.remove_order("1").unwrap();
        assert!(!removed.is_resolved());
        assert!(shelf.remove_order("1").is_none());
        let stats = shelf.get_stats();
        assert_eq!(stats.orders_removed, 1);
        assert_eq!(stats.orders_delivered, 0);
    }

    #[test]
    fn mark_delivered_stamps_and_counts() {
        let (shelf, clock) = shelf_with_clock(ShelfKind::Cold, 2);
        shelf.add_order(order("1")).unwrap();
        clock.advance_secs(3.0);

        let delivered = shelf.mark_order_delivered("1").unwrap();
        assert_eq!(delivered.delivered_at(), Some(clock.now()));
        assert!(!shelf.contains("1"));

        let stats = shelf.get_stats();
        assert_eq!(stats.orders_delivered, 1);
        assert_eq!(stats.orders_removed, 1);
    }

    #[test]
    fn mark_delivered_unknown_id_is_noop() {
        let shelf = Shelf::new(ShelfKind::Cold, 2);
        shelf.add_order(order("1")).unwrap();
        assert!(shelf.mark_order_delivered("missing").is_none());
        assert_eq!(shelf.size(), 1);
        assert_eq!(shelf.get_stats().orders_delivered, 0);
    }

    // ------------------------------------------------------------------
    // Expiry
    // ------------------------------------------------------------------

    #[test]
    fn remove_expired_takes_only_worthless_orders() {
        let (shelf, clock) = shelf_with_clock(ShelfKind::Hot, 3);
        shelf
            .add_order(Order::with_id("short", "Fries", Temperature::Hot, 10.0, 1.0))
            .unwrap();
        shelf
            .add_order(Order::with_id("long", "Stew", Temperature::Hot, 1_000.0, 1.0))
            .unwrap();

        clock.advance_secs(10.0);
        assert_eq!(shelf.remove_expired_orders(clock.now()), 1);
        assert!(!shelf.contains("short"));
        assert!(shelf.contains("long"));

        let stats = shelf.get_stats();
        assert_eq!(stats.orders_wasted, 1);
        assert_eq!(stats.orders_removed, 0);

        // Second sweep finds nothing new.
        assert_eq!(shelf.remove_expired_orders(clock.now()), 0);
    }

    #[test]
    fn remove_expired_on_empty_shelf() {
        let shelf = Shelf::new(ShelfKind::Overflow, 3);
        assert_eq!(shelf.remove_expired_orders(Utc::now()), 0);
    }

    // ------------------------------------------------------------------
    // Statistics
    // ------------------------------------------------------------------

    #[test]
    fn peak_usage_tracks_high_water_mark() {
        let shelf = Shelf::new(ShelfKind::Hot, 5);
        for i in 0..4 {
            shelf.add_order(order(&i.to_string())).unwrap();
        }
        shelf.mark_order_delivered("0").unwrap();
        shelf.mark_order_delivered("1").unwrap();
        shelf.add_order(order("9")).unwrap();

        let snap = shelf.snapshot();
        assert_eq!(snap.current, 3);
        assert_eq!(snap.stats.peak_usage, 4);
        assert_eq!(snap.stats.orders_added, 5);
    }

    #[test]
    fn get_all_orders_is_a_snapshot() {
        let shelf = Shelf::new(ShelfKind::Cold, 3);
        shelf.add_order(order("a")).unwrap();
        shelf.add_order(order("b")).unwrap();
        let mut ids: Vec<String> = shelf
            .get_all_orders()
            .iter()
            .map(|o| o.id().to_string())
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn debug_shows_kind_and_size() {
        let shelf = Shelf::new(ShelfKind::Frozen, 1);
        let debug = format!("{shelf:?}");
        assert!(debug.contains("Frozen"));
        assert!(debug.contains("size: 0"));
    }

    proptest! {
        #[test]
        fn never_exceeds_capacity(capacity in 0usize..16, attempts in 0usize..48) {
            let shelf = Shelf::new(ShelfKind::Hot, capacity);
            let accepted = (0..attempts)
                .filter(|i| shelf.add_order(order(&i.to_string())).is_ok())
                .count();
            prop_assert_eq!(accepted, attempts.min(capacity));
            prop_assert_eq!(shelf.size(), attempts.min(capacity));
            prop_assert!(shelf.get_stats().peak_usage <= capacity);
        }
    }
}
