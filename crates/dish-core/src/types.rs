//! Shared identifiers and classifications for orders and shelves.

use std::borrow::Borrow;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Temperature class of an order, selecting its primary shelf.
///
/// Labels match exactly, as in JSON. Any label other than `hot`, `cold`
/// or `frozen` (including `HOT`) decodes to
/// [`Temperature::Unknown`]. Such orders have no primary shelf and are
/// wasted on placement.
///
/// # Examples
///
/// ```
/// use dish_core::types::Temperature;
/// assert_eq!("hot".parse::<Temperature>().unwrap(), Temperature::Hot);
/// assert_eq!("lukewarm".parse::<Temperature>().unwrap(), Temperature::Unknown);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Temperature {
    Hot,
    Cold,
    Frozen,
    #[serde(other)]
    Unknown,
}

impl Temperature {
    /// The primary shelf for this class, if it has one.
    pub fn shelf_kind(&self) -> Option<ShelfKind> {
        match self {
            Self::Hot => Some(ShelfKind::Hot),
            Self::Cold => Some(ShelfKind::Cold),
            Self::Frozen => Some(ShelfKind::Frozen),
            Self::Unknown => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::Cold => "cold",
            Self::Frozen => "frozen",
            Self::Unknown => "unknown",
        }
    }
}

impl FromStr for Temperature {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "hot" => Self::Hot,
            "cold" => Self::Cold,
            "frozen" => Self::Frozen,
            _ => Self::Unknown,
        })
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Zone a shelf serves: one per temperature class plus the shared overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShelfKind {
    Hot,
    Cold,
    Frozen,
    Overflow,
}

impl ShelfKind {
    /// Every zone, in the fixed order the manager searches them.
    pub const ALL: [ShelfKind; 4] = [Self::Hot, Self::Cold, Self::Frozen, Self::Overflow];

    /// Lowercase label stored on an order as its current zone.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::Cold => "cold",
            Self::Frozen => "frozen",
            Self::Overflow => "overflow",
        }
    }

    pub fn is_overflow(&self) -> bool {
        matches!(self, Self::Overflow)
    }
}

impl fmt::Display for ShelfKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unique, immutable order identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for OrderId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_parse_agrees_with_serde() {
        for label in ["hot", "cold", "frozen", "HOT", " Frozen ", "Cold", "ambient"] {
            let parsed: Temperature = label.parse().unwrap();
            let decoded: Temperature = serde_json::from_value(serde_json::json!(label)).unwrap();
            assert_eq!(parsed, decoded, "{label:?}");
        }
        assert_eq!("cold".parse::<Temperature>().unwrap(), Temperature::Cold);
        assert_eq!("HOT".parse::<Temperature>().unwrap(), Temperature::Unknown);
        assert_eq!(" frozen ".parse::<Temperature>().unwrap(), Temperature::Unknown);
    }

    #[test]
    fn unknown_temperature_has_no_shelf() {
        let t: Temperature = "ambient".parse().unwrap();
        assert_eq!(t, Temperature::Unknown);
        assert_eq!(t.shelf_kind(), None);
    }

    #[test]
    fn temperature_maps_to_matching_shelf() {
        assert_eq!(Temperature::Hot.shelf_kind(), Some(ShelfKind::Hot));
        assert_eq!(Temperature::Cold.shelf_kind(), Some(ShelfKind::Cold));
        assert_eq!(Temperature::Frozen.shelf_kind(), Some(ShelfKind::Frozen));
    }

    #[test]
    fn temperature_deserializes_unknown_labels() {
        let t: Temperature = serde_json::from_str("\"hot\"").unwrap();
        assert_eq!(t, Temperature::Hot);
        let t: Temperature = serde_json::from_str("\"tepid\"").unwrap();
        assert_eq!(t, Temperature::Unknown);
    }

    #[test]
    fn shelf_kind_search_order_ends_with_overflow() {
        assert_eq!(ShelfKind::ALL.len(), 4);
        assert_eq!(ShelfKind::ALL[3], ShelfKind::Overflow);
        assert!(ShelfKind::Overflow.is_overflow());
        assert!(!ShelfKind::Hot.is_overflow());
    }

    #[test]
    fn shelf_kind_labels() {
        assert_eq!(ShelfKind::Overflow.to_string(), "overflow");
        assert_eq!(ShelfKind::Frozen.label(), "frozen");
    }

    #[test]
    fn order_id_borrows_as_str() {
        let id = OrderId::from("burger-1");
        let mut map = std::collections::HashMap::new();
        map.insert(id.clone(), 1);
        assert_eq!(map.get("burger-1"), Some(&1));
        assert_eq!(id.to_string(), "burger-1");
    }
}
