// core/src/service.rs

//! The cart service: input validation, the product existence check and the
//! store call, in that order. Every failure short-circuits.

use crate::checker::{ProductChecker, ProductLookup};
use crate::error::{CartError, CartResult};
use crate::ids::{Sku, UserId};
use crate::models::CartItem;
use crate::store::CartStore;

use std::fmt;
use std::sync::Arc;
use tracing::{info, instrument, warn};

#[derive(Clone)]
pub struct CartService {
  store: Arc<dyn CartStore>,
  checker: Arc<dyn ProductChecker>,
}

impl fmt::Debug for CartService {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CartService").finish_non_exhaustive()
  }
}

fn validate_user(user_id: UserId) -> CartResult<()> {
  if user_id.is_nil() {
    return Err(CartError::validation("user_id", "must not be nil"));
  }
  Ok(())
}

fn validate_sku(sku: Sku) -> CartResult<()> {
  if !sku.is_valid() {
    return Err(CartError::validation("sku", "must be greater than zero"));
  }
  Ok(())
}

impl CartService {
  pub fn new(store: Arc<dyn CartStore>, checker: Arc<dyn ProductChecker>) -> Self {
    Self { store, checker }
  }

  /// Adds `count` units of `sku` to the user's cart after confirming the
  /// product exists. Returns the cart line as stored.
  #[instrument(name = "CartService::add_product", skip(self), fields(%user_id, %sku), err(Display))]
  pub async fn add_product(&self, user_id: UserId, sku: Sku, count: u32) -> CartResult<CartItem> {
    validate_sku(sku)?;
    if sku > Sku::MAX_STORABLE {
      return Err(CartError::validation("sku", format!("must not exceed {}", Sku::MAX_STORABLE)));
    }
    validate_user(user_id)?;
    if count < 1 {
      return Err(CartError::validation("count", "must be greater than zero"));
    }

    match self.checker.lookup(sku).await? {
      ProductLookup::Found(_) => {}
      ProductLookup::NotFound => {
        warn!("Refusing to add unknown product to cart.");
        return Err(CartError::ProductNotFound { sku });
      }
    }

    let item = self.store.upsert_item(user_id, sku, count).await?;
    info!(item_id = %item.id, new_count = item.count, "Product added to cart.");
    Ok(item)
  }

  /// Lists the user's cart in ascending SKU order. An empty cart is not an error.
  #[instrument(name = "CartService::get_items_by_user_id", skip(self), fields(%user_id), err(Display))]
  pub async fn get_items_by_user_id(&self, user_id: UserId) -> CartResult<Vec<CartItem>> {
    validate_user(user_id)?;
    Ok(self.store.list_items(user_id).await?)
  }

  #[instrument(name = "CartService::remove_product", skip(self), fields(%user_id, %sku), err(Display))]
  pub async fn remove_product(&self, user_id: UserId, sku: Sku) -> CartResult<()> {
    validate_sku(sku)?;
    validate_user(user_id)?;
    self.store.remove_item(user_id, sku).await?;
    Ok(())
  }

  #[instrument(name = "CartService::remove_all_products", skip(self), fields(%user_id), err(Display))]
  pub async fn remove_all_products(&self, user_id: UserId) -> CartResult<()> {
    validate_user(user_id)?;
    self.store.clear_cart(user_id).await?;
    Ok(())
  }
}
