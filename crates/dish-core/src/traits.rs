//! Trait interfaces at the boundary between the core and its environment.
//!
//! - [`Clock`]: source of wall-clock time for placement, delivery and
//!   expiry timestamps ([`SystemClock`](crate::clock::SystemClock) in production)

use chrono::{DateTime, Utc};

/// Source of the current time.
///
/// A manager and its shelves share a single clock so that every timestamp
/// recorded on an order is taken from the same source.
pub trait Clock: Send + Sync {
    /// Current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}
