// src/lib.rs

//! cart_core: the domain behind the cart service.
//!
//! A cart is the set of `CartItem` lines owned by one user, at most one line
//! per SKU. The crate provides:
//!  - Typed identifiers (`UserId`, `Sku`, `CartItemId`).
//!  - The `CartStore` contract with a PostgreSQL backend (`PgCartStore`) and
//!    a lock-guarded in-memory backend (`InMemoryCartStore`).
//!  - The `ProductChecker` contract and its HTTP client (`HttpProductChecker`).
//!  - `CartService`, which validates input, confirms the product exists and
//!    then writes to the store.

pub mod checker;
pub mod error;
pub mod ids;
pub mod models;
pub mod service;
pub mod store;

// --- Re-exports for the Public API ---

pub use crate::checker::{HttpProductChecker, ProductChecker, ProductLookup};
pub use crate::error::{CartError, CartResult, CheckerError, StoreError, StoreResult};
pub use crate::ids::{CartItemId, Sku, UserId};
pub use crate::models::{CartItem, Product};
pub use crate::service::CartService;
pub use crate::store::{CartStore, InMemoryCartStore, PgCartStore};
