//! # dish-core: Shelf allocation and value decay for perishable orders.
//!
//! This crate implements the in-memory allocation engine:
//! - **Orders** decay linearly while resident; residency is split into a
//!   primary-shelf segment and an overflow segment that decay at the same rate.
//! - **Shelves** are capacity-bounded, lock-protected containers for one zone.
//! - **The shelf manager** routes each order to its temperature shelf, spills
//!   to the shared overflow shelf, wastes orders when nothing has room, and
//!   keeps the aggregate counters consistent under concurrent use.
//!
//! Nothing here performs I/O or blocks beyond short critical sections.

pub mod clock;
pub mod constants;
pub mod decay;
pub mod manager;
pub mod order;
pub mod shelf;
pub mod stats;
pub mod traits;
pub mod types;

pub use clock::SystemClock;
#[cfg(any(test, feature = "testing"))]
pub use clock::ManualClock;
pub use manager::{Placement, ShelfCapacities, ShelfManager};
pub use order::Order;
pub use shelf::Shelf;
pub use stats::{ManagerStats, OrderTotals, ShelfSnapshot, ShelfStats};
pub use traits::Clock;
pub use types::{OrderId, ShelfKind, Temperature};
