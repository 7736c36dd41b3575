//! Typed statistics snapshots for shelves and the manager.

use serde::{Deserialize, Serialize};

use crate::types::ShelfKind;

/// Lifetime counters for a single shelf.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShelfStats {
    pub orders_added: u64,
    /// Orders taken off by removal or delivery. Expiry sweeps count as
    /// `orders_wasted` only.
    pub orders_removed: u64,
    pub orders_wasted: u64,
    pub orders_delivered: u64,
    /// Highest concurrent occupancy seen.
    pub peak_usage: usize,
}

/// Point-in-time view of one shelf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShelfSnapshot {
    pub kind: ShelfKind,
    pub capacity: usize,
    pub current: usize,
    pub stats: ShelfStats,
}

/// Manager-wide order counters. Monotonically increasing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub received: u64,
    pub delivered: u64,
    pub expired: u64,
    /// Rejected at placement for lack of room (or an unknown temperature).
    pub wasted: u64,
}

impl OrderTotals {
    /// Orders that reached a terminal outcome.
    pub fn resolved(&self) -> u64 {
        self.delivered + self.expired + self.wasted
    }
}

/// Consistent snapshot of every shelf and the aggregate counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerStats {
    pub hot: ShelfSnapshot,
    pub cold: ShelfSnapshot,
    pub frozen: ShelfSnapshot,
    pub overflow: ShelfSnapshot,
    pub totals: OrderTotals,
}

impl ManagerStats {
    /// Shelf snapshots in search order.
    pub fn shelves(&self) -> [&ShelfSnapshot; 4] {
        [&self.hot, &self.cold, &self.frozen, &self.overflow]
    }

    pub fn shelf(&self, kind: ShelfKind) -> &ShelfSnapshot {
        match kind {
            ShelfKind::Hot => &self.hot,
            ShelfKind::Cold => &self.cold,
            ShelfKind::Frozen => &self.frozen,
            ShelfKind::Overflow => &self.overflow,
        }
    }

    /// Orders currently resident across all shelves.
    pub fn occupancy(&self) -> usize {
        self.shelves().iter().map(|s| s.current).sum()
    }

    /// `received == delivered + wasted + expired + occupancy`.
    ///
    /// Holds for every snapshot; orders that have hit zero value but not yet
    /// been swept still count as resident.
    pub fn is_reconciled(&self) -> bool {
        self.totals.received == self.totals.resolved() + self.occupancy() as u64
    }

    /// Delivered orders as a percentage of received (0 when nothing received).
    pub fn delivery_rate(&self) -> f64 {
        percent(self.totals.delivered, self.totals.received)
    }

    /// Wasted plus expired orders as a percentage of received.
    pub fn waste_rate(&self) -> f64 {
        percent(self.totals.wasted + self.totals.expired, self.totals.received)
    }
}

/// `part / whole * 100`, or 0 for an empty whole.
pub fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}
