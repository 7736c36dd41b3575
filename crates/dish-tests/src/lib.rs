//! Integration test suite for Dish Dispatcher.
//!
//! Exercises the shelf manager under heavy concurrent use, checks the
//! bookkeeping identities over random operation sequences, and runs the
//! simulator end to end from files on paused time.

pub mod helpers;
