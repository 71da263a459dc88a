use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::product::Product;

/// Unique order identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderId(pub String);

/// A purchase of one product at a given quantity.
///
/// `product` is a value snapshot taken when the order was placed; later
/// edits or deletion of the catalog entry do not touch it. `total` is
/// computed once from the snapshot price and never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub product: Product,
    pub quantity: u64,
    pub total: f64,
    pub created_at: DateTime<Utc>,
}
