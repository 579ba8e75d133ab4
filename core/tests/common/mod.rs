// tests/common/mod.rs
#![allow(dead_code)] // Each test binary uses a different subset of these helpers

use async_trait::async_trait;
use cart_core::{
  CartItem, CartStore, CheckerError, Product, ProductChecker, ProductLookup, Sku, StoreError, StoreResult, UserId,
};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::Level;

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Product checker doubles ---

/// How the fake catalog answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogMode {
  /// Known SKUs are found, everything else is not found.
  Normal,
  /// Every lookup fails as if the catalog were down.
  Down,
}

#[derive(Debug)]
pub struct FakeChecker {
  known: HashSet<u64>,
  mode: Mutex<CatalogMode>,
  calls: AtomicUsize,
}

impl FakeChecker {
  pub fn with_skus(skus: &[u64]) -> Arc<Self> {
    Arc::new(Self {
      known: skus.iter().copied().collect(),
      mode: Mutex::new(CatalogMode::Normal),
      calls: AtomicUsize::new(0),
    })
  }

  pub fn set_mode(&self, mode: CatalogMode) {
    *self.mode.lock() = mode;
  }

  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl ProductChecker for FakeChecker {
  async fn lookup(&self, sku: Sku) -> Result<ProductLookup, CheckerError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    if *self.mode.lock() == CatalogMode::Down {
      return Err(CheckerError::UnexpectedStatus { status: 503 });
    }
    if self.known.contains(&sku.get()) {
      Ok(ProductLookup::Found(Product {
        sku,
        name: format!("product-{}", sku),
        price: 9.99,
      }))
    } else {
      Ok(ProductLookup::NotFound)
    }
  }
}

// --- Store doubles ---

/// Wraps a store and counts the writes that reach it.
pub struct CountingStore<S> {
  pub inner: S,
  pub writes: AtomicUsize,
}

impl<S: CartStore> CountingStore<S> {
  pub fn new(inner: S) -> Arc<Self> {
    Arc::new(Self {
      inner,
      writes: AtomicUsize::new(0),
    })
  }

  pub fn writes(&self) -> usize {
    self.writes.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl<S: CartStore> CartStore for CountingStore<S> {
  async fn upsert_item(&self, user_id: UserId, sku: Sku, count: u32) -> StoreResult<CartItem> {
    self.writes.fetch_add(1, Ordering::SeqCst);
    self.inner.upsert_item(user_id, sku, count).await
  }

  async fn list_items(&self, user_id: UserId) -> StoreResult<Vec<CartItem>> {
    self.inner.list_items(user_id).await
  }

  async fn remove_item(&self, user_id: UserId, sku: Sku) -> StoreResult<()> {
    self.writes.fetch_add(1, Ordering::SeqCst);
    self.inner.remove_item(user_id, sku).await
  }

  async fn clear_cart(&self, user_id: UserId) -> StoreResult<()> {
    self.writes.fetch_add(1, Ordering::SeqCst);
    self.inner.clear_cart(user_id).await
  }
}

/// A store whose datastore is permanently unreachable.
pub struct UnreachableStore;

fn unreachable(operation: &'static str) -> StoreError {
  StoreError::Unavailable {
    operation,
    source: anyhow::anyhow!("connection refused"),
  }
}

#[async_trait]
impl CartStore for UnreachableStore {
  async fn upsert_item(&self, _user_id: UserId, _sku: Sku, _count: u32) -> StoreResult<CartItem> {
    Err(unreachable("upsert_item"))
  }

  async fn list_items(&self, _user_id: UserId) -> StoreResult<Vec<CartItem>> {
    Err(unreachable("list_items"))
  }

  async fn remove_item(&self, _user_id: UserId, _sku: Sku) -> StoreResult<()> {
    Err(unreachable("remove_item"))
  }

  async fn clear_cart(&self, _user_id: UserId) -> StoreResult<()> {
    Err(unreachable("clear_cart"))
  }
}

// --- Shared store contract checks, run against every backend ---

pub fn skus(items: &[CartItem]) -> Vec<u64> {
  items.iter().map(|i| i.sku_id.get()).collect()
}

pub async fn check_upsert_merges_counts(store: &dyn CartStore) {
  let user = UserId::new_v4();
  let first = store.upsert_item(user, Sku::new(10), 3).await.unwrap();
  assert_eq!(first.count, 3);
  let second = store.upsert_item(user, Sku::new(10), 2).await.unwrap();
  assert_eq!(second.count, 5);
  assert_eq!(first.id, second.id);

  let items = store.list_items(user).await.unwrap();
  assert_eq!(items.len(), 1);
  assert_eq!(items[0].count, 5);
  assert_eq!(items[0].user_id, user);
}

pub async fn check_list_is_sku_ordered(store: &dyn CartStore) {
  let user = UserId::new_v4();
  for sku in [50, 10, 30] {
    store.upsert_item(user, Sku::new(sku), 1).await.unwrap();
  }
  let items = store.list_items(user).await.unwrap();
  assert_eq!(skus(&items), vec![10, 30, 50]);
}

pub async fn check_carts_are_isolated_per_user(store: &dyn CartStore) {
  let alice = UserId::new_v4();
  let bob = UserId::new_v4();
  store.upsert_item(alice, Sku::new(1), 1).await.unwrap();
  store.upsert_item(bob, Sku::new(1), 4).await.unwrap();
  store.clear_cart(alice).await.unwrap();

  assert!(store.list_items(alice).await.unwrap().is_empty());
  let bobs = store.list_items(bob).await.unwrap();
  assert_eq!(bobs.len(), 1);
  assert_eq!(bobs[0].count, 4);
}

pub async fn check_deletes_are_idempotent(store: &dyn CartStore) {
  let user = UserId::new_v4();
  assert!(store.list_items(user).await.unwrap().is_empty());
  store.remove_item(user, Sku::new(77)).await.unwrap();
  store.clear_cart(user).await.unwrap();

  store.upsert_item(user, Sku::new(5), 1).await.unwrap();
  store.remove_item(user, Sku::new(6)).await.unwrap();
  assert_eq!(skus(&store.list_items(user).await.unwrap()), vec![5]);

  store.remove_item(user, Sku::new(5)).await.unwrap();
  store.remove_item(user, Sku::new(5)).await.unwrap();
  assert!(store.list_items(user).await.unwrap().is_empty());

  store.clear_cart(user).await.unwrap();
  store.clear_cart(user).await.unwrap();
}

/// SKUs past `Sku::MAX_STORABLE` cannot be stored: adding fails, removing is a no-op.
pub async fn check_unstorable_skus_behave_alike(store: &dyn CartStore) {
  let user = UserId::new_v4();
  store.upsert_item(user, Sku::new(3), 1).await.unwrap();

  store.remove_item(user, Sku::new(u64::MAX)).await.unwrap();
  store.remove_item(user, Sku::new(Sku::MAX_STORABLE.get() + 1)).await.unwrap();

  let err = store.upsert_item(user, Sku::new(u64::MAX), 1).await.unwrap_err();
  assert!(!err.is_unavailable());
  assert_eq!(err.operation(), "upsert_item");
  assert_eq!(skus(&store.list_items(user).await.unwrap()), vec![3]);
}

pub async fn check_concurrent_upserts_converge(store: Arc<dyn CartStore>) {
  let user = UserId::new_v4();
  let sku = Sku::new(42);
  let counts: Vec<u32> = (1..=32).collect();
  let expected: u32 = counts.iter().sum();

  let tasks: Vec<_> = counts
    .into_iter()
    .map(|count| {
      let store = store.clone();
      tokio::spawn(async move { store.upsert_item(user, sku, count).await })
    })
    .collect();
  for task in tasks {
    task.await.unwrap().unwrap();
  }

  let items = store.list_items(user).await.unwrap();
  assert_eq!(items.len(), 1, "concurrent adds must not duplicate rows");
  assert_eq!(items[0].count, expected, "concurrent adds must not lose increments");
}
