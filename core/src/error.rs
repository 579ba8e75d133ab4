// core/src/error.rs
use crate::ids::Sku;
use anyhow::Error as AnyhowError;
use std::time::Duration;
use thiserror::Error;

/// Failure raised by a `CartStore` backend.
///
/// `operation` is the store call that failed (`"upsert_item"`, `"list_items"`, ...).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing datastore could not be reached (pool timeout, I/O, closed pool).
    #[error("cart store unavailable during {operation}: {source}")]
    Unavailable {
        operation: &'static str,
        #[source]
        source: AnyhowError,
    },

    #[error("cart store failed during {operation}: {source}")]
    Backend {
        operation: &'static str,
        #[source]
        source: AnyhowError,
    },
}

impl StoreError {
    pub fn operation(&self) -> &'static str {
        match self {
            StoreError::Unavailable { operation, .. } | StoreError::Backend { operation, .. } => *operation,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable { .. })
    }
}

/// The product checker could not determine whether a SKU exists.
#[derive(Debug, Error)]
pub enum CheckerError {
    #[error("product lookup timed out after {after:?}")]
    Timeout { after: Duration },

    #[error("product service request failed: {source}")]
    Transport {
        #[source]
        source: AnyhowError,
    },

    #[error("product service answered with unexpected status {status}")]
    UnexpectedStatus { status: u16 },

    #[error("product service returned a malformed payload: {source}")]
    MalformedPayload {
        #[source]
        source: AnyhowError,
    },
}

#[derive(Debug, Error)]
pub enum CartError {
    #[error("invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("product {sku} not found")]
    ProductNotFound { sku: Sku },

    #[error("product checker unavailable: {0}")]
    CheckerUnavailable(#[from] CheckerError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CartError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        CartError::Validation {
            field,
            message: message.into(),
        }
    }
}

pub type CartResult<T, E = CartError> = std::result::Result<T, E>;

pub type StoreResult<T, E = StoreError> = std::result::Result<T, E>;
