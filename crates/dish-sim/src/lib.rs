//! # dish-sim: Simulation driver for the Dish Dispatcher shelves.
//!
//! Loads a [`SimConfig`] and a list of [`OrderSpec`]s, then runs the
//! producer, courier, sweeper and reporter tasks against a shared
//! [`dish_core::ShelfManager`] until the orders drain, the duration cap
//! elapses, or the caller asks it to stop.

pub mod config;
pub mod courier;
pub mod error;
pub mod orders;
pub mod report;
pub mod simulator;

pub use config::SimConfig;
pub use courier::{CourierPolicy, FixedDelay, RandomDelay};
pub use error::{ConfigError, OrderFileError, SimError};
pub use orders::{load_orders, OrderSpec};
pub use simulator::Simulator;
