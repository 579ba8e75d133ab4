// core/src/store/memory.rs
use crate::error::{StoreError, StoreResult};
use crate::ids::{CartItemId, Sku, UserId};
use crate::models::CartItem;
use crate::store::CartStore;

use anyhow::anyhow;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, instrument};

/// Process-local cart store used by tests and `STORE_BACKEND=memory`.
///
/// Lines are kept per user in a `BTreeMap` keyed by SKU, so listing is already
/// in ascending SKU order. The write lock is held for the whole
/// check-and-write of an upsert. Guards never live across an `.await`.
#[derive(Debug, Default)]
pub struct InMemoryCartStore {
  carts: RwLock<HashMap<UserId, BTreeMap<Sku, CartItem>>>,
  id_factory: AtomicU64,
}

impl InMemoryCartStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_capacity(users: usize) -> Self {
    Self {
      carts: RwLock::new(HashMap::with_capacity(users)),
      id_factory: AtomicU64::new(0),
    }
  }

  fn next_id(&self) -> CartItemId {
    CartItemId::new(self.id_factory.fetch_add(1, Ordering::Relaxed) + 1)
  }
}

fn rejected(source: anyhow::Error) -> StoreError {
  StoreError::Backend {
    operation: "upsert_item",
    source,
  }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
  #[instrument(name = "InMemoryCartStore::upsert_item", skip(self), fields(%user_id, %sku))]
  async fn upsert_item(&self, user_id: UserId, sku: Sku, count: u32) -> StoreResult<CartItem> {
    // Same row constraints as the `cart_items` table.
    if count == 0 {
      return Err(rejected(anyhow!("count must be greater than zero")));
    }
    if sku.to_storage().is_none() {
      return Err(rejected(anyhow!("sku {} exceeds the storable maximum {}", sku, Sku::MAX_STORABLE)));
    }

    let mut carts = self.carts.write();
    let cart = carts.entry(user_id).or_default();

    if let Some(existing) = cart.get_mut(&sku) {
      let new_count = existing
        .count
        .checked_add(count)
        .ok_or_else(|| rejected(anyhow!("count for sku {} would exceed {}", sku, u32::MAX)))?;
      existing.count = new_count;
      debug!(item_id = %existing.id, new_count, "Incremented existing cart line.");
      return Ok(existing.clone());
    }

    let item = CartItem {
      id: self.next_id(),
      sku_id: sku,
      user_id,
      count,
    };
    cart.insert(sku, item.clone());
    debug!(item_id = %item.id, "Inserted new cart line.");
    Ok(item)
  }

  async fn list_items(&self, user_id: UserId) -> StoreResult<Vec<CartItem>> {
    let carts = self.carts.read();
    Ok(
      carts
        .get(&user_id)
        .map(|cart| cart.values().cloned().collect())
        .unwrap_or_default(),
    )
  }

  async fn remove_item(&self, user_id: UserId, sku: Sku) -> StoreResult<()> {
    let mut carts = self.carts.write();
    if let Some(cart) = carts.get_mut(&user_id) {
      cart.remove(&sku);
      if cart.is_empty() {
        carts.remove(&user_id);
      }
    }
    Ok(())
  }

  async fn clear_cart(&self, user_id: UserId) -> StoreResult<()> {
    self.carts.write().remove(&user_id);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn ids_are_monotonic_across_users() {
    let store = InMemoryCartStore::new();
    let a = store.upsert_item(UserId::new_v4(), Sku::new(1), 1).await.unwrap();
    let b = store.upsert_item(UserId::new_v4(), Sku::new(1), 1).await.unwrap();
    assert!(b.id > a.id);
  }

  #[tokio::test]
  async fn increment_keeps_the_original_id() {
    let store = InMemoryCartStore::with_capacity(4);
    let user = UserId::new_v4();
    let first = store.upsert_item(user, Sku::new(9), 2).await.unwrap();
    let second = store.upsert_item(user, Sku::new(9), 5).await.unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(second.count, 7);
  }

  #[tokio::test]
  async fn overflowing_count_is_rejected_and_row_kept() {
    let store = InMemoryCartStore::new();
    let user = UserId::new_v4();
    store.upsert_item(user, Sku::new(3), u32::MAX).await.unwrap();

    let err = store.upsert_item(user, Sku::new(3), 1).await.unwrap_err();
    assert_eq!(err.operation(), "upsert_item");
    assert!(!err.is_unavailable());

    let items = store.list_items(user).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].count, u32::MAX);
  }

  #[tokio::test]
  async fn zero_count_is_rejected_like_the_table_constraint() {
    let store = InMemoryCartStore::new();
    let user = UserId::new_v4();
    let err = store.upsert_item(user, Sku::new(4), 0).await.unwrap_err();
    assert_eq!(err.operation(), "upsert_item");
    assert!(store.list_items(user).await.unwrap().is_empty());

    store.upsert_item(user, Sku::new(4), 2).await.unwrap();
    assert!(store.upsert_item(user, Sku::new(4), 0).await.is_err());
    assert_eq!(store.list_items(user).await.unwrap()[0].count, 2);
  }
}
