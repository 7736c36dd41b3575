//! Routing of orders across the four shelves.
//!
//! The [`ShelfManager`] owns one shelf per temperature class plus the shared
//! overflow shelf, and the manager-wide [`OrderTotals`]. Every routing
//! operation runs under the manager lock, and shelf locks are only ever
//! taken while it is held (manager before shelf), so a placement's
//! "primary, then overflow" attempt is atomic with respect to other
//! placements, deliveries, and sweeps.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::clock::SystemClock;
use crate::constants::{
    DEFAULT_COLD_CAPACITY, DEFAULT_FROZEN_CAPACITY, DEFAULT_HOT_CAPACITY,
    DEFAULT_OVERFLOW_CAPACITY,
};
use crate::order::Order;
use crate::shelf::Shelf;
use crate::stats::{ManagerStats, OrderTotals};
use crate::traits::Clock;
use crate::types::{ShelfKind, Temperature};

/// Capacity of each shelf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShelfCapacities {
    pub hot: usize,
    pub cold: usize,
    pub frozen: usize,
    pub overflow: usize,
}

impl Default for ShelfCapacities {
    fn default() -> Self {
        Self {
            hot: DEFAULT_HOT_CAPACITY,
            cold: DEFAULT_COLD_CAPACITY,
            frozen: DEFAULT_FROZEN_CAPACITY,
            overflow: DEFAULT_OVERFLOW_CAPACITY,
        }
    }
}

/// Outcome of [`ShelfManager::place_order`].
#[derive(Debug, Clone, PartialEq)]
pub enum Placement {
    /// The order is resident on the given shelf.
    Shelved(ShelfKind),
    /// No shelf had room (or the temperature was unknown). The order is
    /// returned to the caller, stamped wasted.
    Wasted(Order),
}

impl Placement {
    /// `true` if the order was shelved.
    pub fn is_placed(&self) -> bool {
        matches!(self, Self::Shelved(_))
    }

    /// The shelf holding the order, if it was placed.
    pub fn shelf(&self) -> Option<ShelfKind> {
        match self {
            Self::Shelved(kind) => Some(*kind),
            Self::Wasted(_) => None,
        }
    }
}

/// Owner of the four shelves and the aggregate order counters.
pub struct ShelfManager {
    hot: Shelf,
    cold: Shelf,
    frozen: Shelf,
    overflow: Shelf,
    /// Manager lock. Guards the counters and serializes routing.
    totals: Mutex<OrderTotals>,
    clock: Arc<dyn Clock>,
}

impl ShelfManager {
    /// Create a manager with the given shelf capacities, timed by the
    /// system clock.
    pub fn new(hot: usize, cold: usize, frozen: usize, overflow: usize) -> Self {
        Self::with_clock(
            ShelfCapacities {
                hot,
                cold,
                frozen,
                overflow,
            },
            Arc::new(SystemClock),
        )
    }

    /// Create a manager whose shelves all share `clock`.
    pub fn with_clock(capacities: ShelfCapacities, clock: Arc<dyn Clock>) -> Self {
        Self {
            hot: Shelf::with_clock(ShelfKind::Hot, capacities.hot, Arc::clone(&clock)),
            cold: Shelf::with_clock(ShelfKind::Cold, capacities.cold, Arc::clone(&clock)),
            frozen: Shelf::with_clock(ShelfKind::Frozen, capacities.frozen, Arc::clone(&clock)),
            overflow: Shelf::with_clock(
                ShelfKind::Overflow,
                capacities.overflow,
                Arc::clone(&clock),
            ),
            totals: Mutex::new(OrderTotals::default()),
            clock,
        }
    }

    /// Admit an order.
    ///
    /// Tries the primary shelf for the order's temperature, then overflow.
    /// If neither has room, or an order with the same id is already
    /// resident anywhere, the order is counted and stamped wasted. Exactly
    /// one of {primary, overflow, wasted} happens per call.
    pub fn place_order(&self, order: Order) -> Placement {
        let mut totals = self.totals.lock();
        totals.received += 1;

        let id = order.id().as_str();
        if self.shelves().iter().any(|shelf| shelf.contains(id)) {
            return self.waste(&mut totals, order, "duplicate order id");
        }

        let Some(primary) = self.get_shelf_for_temperature(order.temperature()) else {
            return self.waste(&mut totals, order, "unknown temperature");
        };

        let order = match primary.add_order(order) {
            Ok(()) => return Placement::Shelved(primary.kind()),
            Err(order) => order,
        };

        match self.overflow.add_order(order) {
            Ok(()) => {
                debug!(shelf = %primary.kind(), "primary shelf full, placed on overflow");
                Placement::Shelved(ShelfKind::Overflow)
            }
            Err(order) => self.waste(&mut totals, order, "no shelf space"),
        }
    }

    fn waste(&self, totals: &mut OrderTotals, mut order: Order, reason: &str) -> Placement {
        totals.wasted += 1;
        order.mark_wasted(self.clock.now());
        warn!(
            order_id = %order.id(),
            name = order.name(),
            temp = %order.temperature(),
            reason,
            "order wasted"
        );
        Placement::Wasted(order)
    }

    /// Deliver a resident order.
    ///
    /// Searches hot, cold, frozen, then overflow; the first shelf holding
    /// `id` hands it over stamped delivered. Returns `None`, changing
    /// nothing, if no shelf holds it.
    pub fn deliver_order(&self, id: &str) -> Option<Order> {
        let mut totals = self.totals.lock();

        for shelf in self.shelves() {
            if let Some(order) = shelf.mark_order_delivered(id) {
                totals.delivered += 1;
                info!(order_id = %id, shelf = %shelf.kind(), "order delivered");
                return Some(order);
            }
        }

        None
    }

    /// Sweep every shelf for orders with no value left.
    ///
    /// All shelves are checked against a single `now`. Returns the number
    /// removed, which is also added to the expired total.
    pub fn remove_expired_orders(&self) -> usize {
        let mut totals = self.totals.lock();
        let now = self.clock.now();

        let expired: usize = self
            .shelves()
            .iter()
            .map(|shelf| shelf.remove_expired_orders(now))
            .sum();

        totals.expired += expired as u64;
        if expired > 0 {
            info!(expired, "removed expired orders");
        }
        expired
    }

    /// Snapshot of every resident order across all shelves.
    pub fn get_all_orders(&self) -> Vec<Order> {
        let _guard = self.totals.lock();
        self.shelves()
            .iter()
            .flat_map(|shelf| shelf.get_all_orders())
            .collect()
    }

    /// Consistent snapshot of all shelves and counters.
    pub fn get_stats(&self) -> ManagerStats {
        let totals = self.totals.lock();
        ManagerStats {
            hot: self.hot.snapshot(),
            cold: self.cold.snapshot(),
            frozen: self.frozen.snapshot(),
            overflow: self.overflow.snapshot(),
            totals: *totals,
        }
    }

    /// Primary shelf for `temperature`; `None` for an unknown class.
    pub fn get_shelf_for_temperature(&self, temperature: Temperature) -> Option<&Shelf> {
        temperature.shelf_kind().map(|kind| self.shelf(kind))
    }

    pub fn shelf(&self, kind: ShelfKind) -> &Shelf {
        match kind {
            ShelfKind::Hot => &self.hot,
            ShelfKind::Cold => &self.cold,
            ShelfKind::Frozen => &self.frozen,
            ShelfKind::Overflow => &self.overflow,
        }
    }

    /// All shelves in delivery search order.
    pub fn shelves(&self) -> [&Shelf; 4] {
        ShelfKind::ALL.map(|kind| self.shelf(kind))
    }

    /// The clock shared by the manager and its shelves.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }
}

impl Default for ShelfManager {
    fn default() -> Self {
        Self::with_clock(ShelfCapacities::default(), Arc::new(SystemClock))
    }
}

impl fmt::Debug for ShelfManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShelfManager")
            .field("hot", &self.hot)
            .field("cold", &self.cold)
            .field("frozen", &self.frozen)
            .field("overflow", &self.overflow)
            .field("totals", &*self.totals.lock())
            .finish()
    }
}
