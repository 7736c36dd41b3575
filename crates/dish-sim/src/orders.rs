//! Order definitions read from a JSON array file.

use std::path::Path;

use dish_core::{Order, Temperature};
use serde::{Deserialize, Serialize};

use crate::error::OrderFileError;

/// One entry of the order definitions file.
///
/// ```json
/// { "name": "Banana Split", "temp": "frozen", "shelfLife": 20, "decayRate": 0.63 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSpec {
    pub name: String,
    pub temp: Temperature,
    pub shelf_life: f64,
    pub decay_rate: f64,
}

impl OrderSpec {
    /// Build a fresh order with its decay rate scaled by `decay_modifier`.
    pub fn to_order(&self, decay_modifier: f64) -> Order {
        Order::new(
            self.name.clone(),
            self.temp,
            self.shelf_life,
            self.decay_rate * decay_modifier,
        )
    }
}

/// Read and parse an order definitions file. An empty list is an error.
pub fn load_orders(path: impl AsRef<Path>) -> Result<Vec<OrderSpec>, OrderFileError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| OrderFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let specs: Vec<OrderSpec> =
        serde_json::from_str(&text).map_err(|source| OrderFileError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    if specs.is_empty() {
        return Err(OrderFileError::Empty(path.to_path_buf()));
    }
    Ok(specs)
}
