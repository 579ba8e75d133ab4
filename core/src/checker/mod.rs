// core/src/checker/mod.rs

//! Product existence checks against the external catalog.
//!
//! A lookup has three outcomes: the product exists (`Ok(Found)`), the
//! catalog says it does not (`Ok(NotFound)`), or the catalog could not be
//! asked (`Err(CheckerError)`). Callers must not treat the last one as "not
//! found".

pub mod http;

use crate::error::CheckerError;
use crate::ids::Sku;
use crate::models::Product;
use async_trait::async_trait;

pub use http::HttpProductChecker;

#[derive(Debug, Clone, PartialEq)]
pub enum ProductLookup {
  Found(Product),
  NotFound,
}

#[async_trait]
pub trait ProductChecker: Send + Sync {
  /// Performs a single lookup. Implementations must not retry.
  async fn lookup(&self, sku: Sku) -> Result<ProductLookup, CheckerError>;
}
