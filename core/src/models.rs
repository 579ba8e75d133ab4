// core/src/models.rs

use crate::ids::{CartItemId, Sku, UserId};
use serde::{Deserialize, Serialize};

/// One line of a user's cart. There is at most one per (user, SKU) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
  pub id: CartItemId,
  pub sku_id: Sku,
  pub user_id: UserId,
  pub count: u32,
}

/// Product attributes as reported by the catalog service.
///
/// The catalog emits capitalized keys (`Sku`, `Name`, `Price`), hence the aliases.
/// Only the SKU is required; the cart never reads the other attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  #[serde(alias = "Sku")]
  pub sku: Sku,
  #[serde(alias = "Name", default)]
  pub name: String,
  #[serde(alias = "Price", default)]
  pub price: f64,
}
