// core/src/ids.rs

//! Strongly typed identifiers used across the cart domain.
//!
//! All of them are `Copy` newtypes that serialize as their inner value, so the
//! JSON and SQL representations stay plain UUIDs and integers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque identifier of a cart owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
  pub fn new(id: Uuid) -> Self {
    UserId(id)
  }

  /// A fresh random identifier. Mostly useful for tests and fixtures.
  pub fn new_v4() -> Self {
    UserId(Uuid::new_v4())
  }

  pub fn nil() -> Self {
    UserId(Uuid::nil())
  }

  pub fn is_nil(&self) -> bool {
    self.0.is_nil()
  }

  pub fn as_uuid(&self) -> &Uuid {
    &self.0
  }
}

impl From<Uuid> for UserId {
  fn from(id: Uuid) -> Self {
    UserId(id)
  }
}

impl fmt::Display for UserId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

impl FromStr for UserId {
  type Err = uuid::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Uuid::parse_str(s).map(UserId)
  }
}

/// Catalog product identifier. Zero is never a valid SKU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sku(u64);

impl Sku {
  pub const fn new(value: u64) -> Self {
    Sku(value)
  }

  pub const fn get(&self) -> u64 {
    self.0
  }

  pub const fn is_valid(&self) -> bool {
    self.0 >= 1
  }

  /// Largest SKU a cart store can hold. Postgres keeps SKUs in a `BIGINT`.
  pub const MAX_STORABLE: Sku = Sku(i64::MAX as u64);

  /// The SKU as a signed storage key, or `None` above `MAX_STORABLE`.
  pub fn to_storage(self) -> Option<i64> {
    i64::try_from(self.0).ok()
  }
}

impl From<u64> for Sku {
  fn from(value: u64) -> Self {
    Sku(value)
  }
}

impl fmt::Display for Sku {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

impl FromStr for Sku {
  type Err = std::num::ParseIntError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    s.parse::<u64>().map(Sku)
  }
}

/// Store-assigned identifier of a cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartItemId(u64);

impl CartItemId {
  pub const fn new(value: u64) -> Self {
    CartItemId(value)
  }

  pub const fn get(&self) -> u64 {
    self.0
  }
}

impl fmt::Display for CartItemId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}
