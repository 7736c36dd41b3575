//! Error types for loading driver inputs and running the simulation.
use std::path::PathBuf;

use dish_core::ShelfKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())] Io { path: PathBuf, source: std::io::Error },
    #[error("invalid config {}: {source}", .path.display())] Parse { path: PathBuf, source: serde_json::Error },
    #[error("{shelf} shelf capacity must be positive")] ZeroCapacity { shelf: ShelfKind },
    #[error("orders per second must be finite and at least one per day, got {0}")] InvalidOrderRate(f64),
    #[error("decay modifier must be non-negative and finite, got {0}")] InvalidDecayModifier(f64),
    #[error("{0} must be positive")] ZeroInterval(&'static str),
    #[error("courier delay range {min}s..={max}s is empty")] InvalidCourierDelay { min: u64, max: u64 },
}

#[derive(Error, Debug)]
pub enum OrderFileError {
    #[error("failed to read orders {}: {source}", .path.display())] Io { path: PathBuf, source: std::io::Error },
    #[error("invalid orders {}: {source}", .path.display())] Parse { path: PathBuf, source: serde_json::Error },
    #[error("no orders in {}", .0.display())] Empty(PathBuf),
}

#[derive(Error, Debug)]
pub enum SimError {
    #[error(transparent)] Config(#[from] ConfigError),
    #[error(transparent)] Orders(#[from] OrderFileError),
    #[error("simulation task failed: {0}")] Task(String),
}
