// core/src/store/mod.rs

//! The cart store contract and its backends.
//!
//! Both backends must behave identically from the caller's point of view:
//!  - `upsert_item` never creates a second row for the same (user, SKU); it
//!    increments the existing row's count instead, also under concurrent calls.
//!  - `list_items` is ordered by ascending SKU and returns an empty vector for
//!    an unknown or empty cart.
//!  - `remove_item` and `clear_cart` treat absent rows as success.

pub mod memory;
pub mod postgres;

use crate::error::StoreResult;
use crate::ids::{Sku, UserId};
use crate::models::CartItem;
use async_trait::async_trait;

pub use memory::InMemoryCartStore;
pub use postgres::PgCartStore;

#[async_trait]
pub trait CartStore: Send + Sync {
  /// Inserts a new line or adds `count` to the existing line for `(user_id, sku)`.
  /// Returns the row as it is after the write.
  async fn upsert_item(&self, user_id: UserId, sku: Sku, count: u32) -> StoreResult<CartItem>;

  async fn list_items(&self, user_id: UserId) -> StoreResult<Vec<CartItem>>;

  async fn remove_item(&self, user_id: UserId, sku: Sku) -> StoreResult<()>;

  async fn clear_cart(&self, user_id: UserId) -> StoreResult<()>;
}
