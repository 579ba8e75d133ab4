// core/src/store/postgres.rs

//! PostgreSQL-backed `CartStore`.

use crate::error::{StoreError, StoreResult};
use crate::ids::{CartItemId, Sku, UserId};
use crate::models::CartItem;
use crate::store::CartStore;

use anyhow::anyhow;
use async_trait::async_trait;
use sqlx::migrate::Migrator;
use sqlx::{FromRow, PgPool};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// SQLSTATE for `query_canceled`, raised when `statement_timeout` fires.
const QUERY_CANCELED: &str = "57014";

const UPSERT_ITEM: &str = r#"
INSERT INTO cart_items (user_id, sku_id, count)
VALUES ($1, $2, $3)
ON CONFLICT (user_id, sku_id) DO UPDATE
SET count = cart_items.count + EXCLUDED.count
RETURNING id, user_id, sku_id, count
"#;

const LIST_ITEMS: &str = r#"
SELECT id, user_id, sku_id, count
FROM cart_items
WHERE user_id = $1
ORDER BY sku_id ASC
"#;

const REMOVE_ITEM: &str = "DELETE FROM cart_items WHERE user_id = $1 AND sku_id = $2";

const CLEAR_CART: &str = "DELETE FROM cart_items WHERE user_id = $1";

/// Raw `cart_items` row. Postgres has no unsigned types, so the numeric
/// columns come back as `i64` and are range-checked on conversion.
#[derive(Debug, FromRow)]
struct CartItemRow {
  id: i64,
  user_id: Uuid,
  sku_id: i64,
  count: i64,
}

impl TryFrom<CartItemRow> for CartItem {
  type Error = anyhow::Error;

  fn try_from(row: CartItemRow) -> Result<Self, Self::Error> {
    let id = u64::try_from(row.id).map_err(|_| anyhow!("negative cart item id {}", row.id))?;
    let sku = u64::try_from(row.sku_id).map_err(|_| anyhow!("negative sku_id {} in row {}", row.sku_id, row.id))?;
    let count = u32::try_from(row.count).map_err(|_| anyhow!("count {} out of range in row {}", row.count, row.id))?;
    Ok(CartItem {
      id: CartItemId::new(id),
      sku_id: Sku::new(sku),
      user_id: UserId::new(row.user_id),
      count,
    })
  }
}

/// Sorts a sqlx failure into "datastore unreachable" versus everything else.
fn store_error(operation: &'static str, err: sqlx::Error) -> StoreError {
  let unavailable = match &err {
    sqlx::Error::PoolTimedOut
    | sqlx::Error::PoolClosed
    | sqlx::Error::Io(_)
    | sqlx::Error::Tls(_)
    | sqlx::Error::WorkerCrashed => true,
    sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(QUERY_CANCELED),
    _ => false,
  };

  error!(operation, unavailable, error = %err, "Cart store query failed.");
  if unavailable {
    StoreError::Unavailable {
      operation,
      source: err.into(),
    }
  } else {
    StoreError::Backend {
      operation,
      source: err.into(),
    }
  }
}

fn sku_param(operation: &'static str, sku: Sku) -> StoreResult<i64> {
  sku.to_storage().ok_or_else(|| StoreError::Backend {
    operation,
    source: anyhow!("sku {} exceeds the storable maximum {}", sku, Sku::MAX_STORABLE),
  })
}

#[derive(Debug, Clone)]
pub struct PgCartStore {
  pool: PgPool,
}

impl PgCartStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  pub fn pool(&self) -> &PgPool {
    &self.pool
  }

  /// Applies the embedded `cart_items` migrations.
  pub async fn migrate(&self) -> StoreResult<()> {
    MIGRATOR.run(&self.pool).await.map_err(|e| StoreError::Backend {
      operation: "migrate",
      source: e.into(),
    })?;
    info!("Cart store migrations applied.");
    Ok(())
  }
}

#[async_trait]
impl CartStore for PgCartStore {
  #[instrument(name = "PgCartStore::upsert_item", skip(self), fields(%user_id, %sku), err(Display))]
  async fn upsert_item(&self, user_id: UserId, sku: Sku, count: u32) -> StoreResult<CartItem> {
    const OP: &str = "upsert_item";
    let sku_id = sku_param(OP, sku)?;

    // The unique index on (user_id, sku_id) makes the conflict branch the
    // serialization point for concurrent adds of the same key.
    let mut tx = self.pool.begin().await.map_err(|e| store_error(OP, e))?;
    let row: CartItemRow = sqlx::query_as(UPSERT_ITEM)
      .bind(*user_id.as_uuid())
      .bind(sku_id)
      .bind(i64::from(count))
      .fetch_one(&mut *tx)
      .await
      .map_err(|e| store_error(OP, e))?;
    tx.commit().await.map_err(|e| store_error(OP, e))?;

    CartItem::try_from(row).map_err(|source| StoreError::Backend { operation: OP, source })
  }

  #[instrument(name = "PgCartStore::list_items", skip(self), fields(%user_id), err(Display))]
  async fn list_items(&self, user_id: UserId) -> StoreResult<Vec<CartItem>> {
    const OP: &str = "list_items";
    let rows: Vec<CartItemRow> = sqlx::query_as(LIST_ITEMS)
      .bind(*user_id.as_uuid())
      .fetch_all(&self.pool)
      .await
      .map_err(|e| store_error(OP, e))?;

    rows
      .into_iter()
      .map(CartItem::try_from)
      .collect::<Result<Vec<_>, _>>()
      .map_err(|source| StoreError::Backend { operation: OP, source })
  }

  #[instrument(name = "PgCartStore::remove_item", skip(self), fields(%user_id, %sku), err(Display))]
  async fn remove_item(&self, user_id: UserId, sku: Sku) -> StoreResult<()> {
    const OP: &str = "remove_item";
    // No row can hold a SKU past the BIGINT range, so there is nothing to delete.
    let Some(sku_id) = sku.to_storage() else {
      debug!("SKU beyond storable range; nothing to remove.");
      return Ok(());
    };
    sqlx::query(REMOVE_ITEM)
      .bind(*user_id.as_uuid())
      .bind(sku_id)
      .execute(&self.pool)
      .await
      .map_err(|e| store_error(OP, e))?;
    Ok(())
  }

  #[instrument(name = "PgCartStore::clear_cart", skip(self), fields(%user_id), err(Display))]
  async fn clear_cart(&self, user_id: UserId) -> StoreResult<()> {
    sqlx::query(CLEAR_CART)
      .bind(*user_id.as_uuid())
      .execute(&self.pool)
      .await
      .map_err(|e| store_error("clear_cart", e))?;
    Ok(())
  }
}
