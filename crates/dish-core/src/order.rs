//! Perishable orders and their time-based value.
//!
//! An [`Order`] is created by a driver, handed to the
//! [`ShelfManager`](crate::manager::ShelfManager), and comes back to a caller
//! only once it reaches a terminal outcome (delivered or wasted). While it is
//! resident, its runtime timestamps are written exclusively by the shelf that
//! holds it.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::constants::FULL_VALUE;
use crate::decay::{elapsed_secs, remaining_value, Residency};
use crate::types::{OrderId, ShelfKind, Temperature};

/// Disambiguates ids of same-named orders created within one clock tick.
static NEXT_ORDER_SEQ: AtomicU64 = AtomicU64::new(1);

/// A perishable item that decays while it sits on a shelf.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    id: OrderId,
    name: String,
    temperature: Temperature,
    /// Seconds of value at zero decay.
    shelf_life: f64,
    /// Value units lost per second of residency.
    decay_rate: f64,
    created_at: DateTime<Utc>,

    placed_on_shelf_at: Option<DateTime<Utc>>,
    /// First time the order touched the overflow shelf. Never reset.
    placed_on_overflow_at: Option<DateTime<Utc>>,
    current_shelf: Option<ShelfKind>,
    wasted_at: Option<DateTime<Utc>>,
    delivered_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Create an order with a freshly generated id.
    ///
    /// The id has the form `{name}-{unix_nanos}-{seq}`.
    pub fn new(
        name: impl Into<String>,
        temperature: Temperature,
        shelf_life: f64,
        decay_rate: f64,
    ) -> Self {
        let name = name.into();
        let created_at = Utc::now();
        let seq = NEXT_ORDER_SEQ.fetch_add(1, Ordering::Relaxed);
        let nanos = created_at.timestamp_nanos_opt().unwrap_or_default();
        let id = OrderId::new(format!("{name}-{nanos}-{seq}"));
        Self::build(id, name, temperature, shelf_life, decay_rate, created_at)
    }

    /// Create an order with a caller-chosen id.
    pub fn with_id(
        id: impl Into<OrderId>,
        name: impl Into<String>,
        temperature: Temperature,
        shelf_life: f64,
        decay_rate: f64,
    ) -> Self {
        Self::build(
            id.into(),
            name.into(),
            temperature,
            shelf_life,
            decay_rate,
            Utc::now(),
        )
    }

    fn build(
        id: OrderId,
        name: String,
        temperature: Temperature,
        shelf_life: f64,
        decay_rate: f64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            temperature,
            shelf_life,
            decay_rate,
            created_at,
            placed_on_shelf_at: None,
            placed_on_overflow_at: None,
            current_shelf: None,
            wasted_at: None,
            delivered_at: None,
        }
    }

    /// Normalized value in `[0, 1]` at `now`.
    ///
    /// An order that was never placed has not started decaying and is worth
    /// exactly 1.0. Once it has touched overflow, residency is split at the
    /// first overflow placement; see [`crate::decay`].
    pub fn calculate_value(&self, now: DateTime<Utc>) -> f64 {
        let Some(placed) = self.placed_on_shelf_at else {
            return FULL_VALUE;
        };

        let residency = match self.placed_on_overflow_at {
            None => Residency {
                primary_secs: elapsed_secs(placed, now),
                overflow_secs: 0.0,
            },
            Some(overflow) => Residency {
                primary_secs: elapsed_secs(placed, overflow),
                overflow_secs: elapsed_secs(overflow, now),
            },
        };

        remaining_value(self.shelf_life, self.decay_rate, residency)
    }

    /// Whether the order has no value left at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.calculate_value(now) <= 0.0
    }

    pub fn id(&self) -> &OrderId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn temperature(&self) -> Temperature {
        self.temperature
    }

    pub fn shelf_life(&self) -> f64 {
        self.shelf_life
    }

    pub fn decay_rate(&self) -> f64 {
        self.decay_rate
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn placed_on_shelf_at(&self) -> Option<DateTime<Utc>> {
        self.placed_on_shelf_at
    }

    pub fn placed_on_overflow_at(&self) -> Option<DateTime<Utc>> {
        self.placed_on_overflow_at
    }

    /// Zone currently (or last) holding the order.
    pub fn current_shelf(&self) -> Option<ShelfKind> {
        self.current_shelf
    }

    pub fn wasted_at(&self) -> Option<DateTime<Utc>> {
        self.wasted_at
    }

    pub fn delivered_at(&self) -> Option<DateTime<Utc>> {
        self.delivered_at
    }

    /// Whether the order has reached a terminal outcome.
    pub fn is_resolved(&self) -> bool {
        self.wasted_at.is_some() || self.delivered_at.is_some()
    }

    /// Record placement on a shelf of `kind` at `now`.
    ///
    /// The primary and overflow placement times are only ever set once.
    pub(crate) fn mark_placed(&mut self, kind: ShelfKind, now: DateTime<Utc>) {
        self.placed_on_shelf_at.get_or_insert(now);
        if kind.is_overflow() {
            self.placed_on_overflow_at.get_or_insert(now);
        }
        self.current_shelf = Some(kind);
    }

    pub(crate) fn mark_delivered(&mut self, now: DateTime<Utc>) {
        debug_assert!(!self.is_resolved(), "order {} resolved twice", self.id);
        self.delivered_at = Some(now);
    }

    pub(crate) fn mark_wasted(&mut self, now: DateTime<Utc>) {
        debug_assert!(!self.is_resolved(), "order {} resolved twice", self.id);
        self.wasted_at = Some(now);
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.temperature, self.id)
    }
}
