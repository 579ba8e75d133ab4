// app/src/errors.rs

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use cart_core::{CartError, StoreError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  /// Malformed path segment or request body.
  #[error("Bad Request: {0}")]
  BadRequest(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error(transparent)]
  Cart(#[from] CartError),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    AppError::Internal(err.to_string())
  }
}

impl AppError {
  fn client_message(&self) -> String {
    match self {
      AppError::BadRequest(m) => m.clone(),
      AppError::Cart(CartError::Validation { .. }) | AppError::Cart(CartError::ProductNotFound { .. }) => {
        self.to_string()
      }
      AppError::Cart(CartError::CheckerUnavailable(_)) => "Product service unavailable".to_string(),
      AppError::Cart(CartError::Store(StoreError::Unavailable { .. })) => "Cart storage unavailable".to_string(),
      AppError::Cart(CartError::Store(_)) | AppError::Sqlx(_) => "Database operation failed".to_string(),
      AppError::Config(_) | AppError::Internal(_) => "An internal error occurred".to_string(),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
      AppError::Cart(CartError::Validation { .. }) => StatusCode::BAD_REQUEST,
      AppError::Cart(CartError::ProductNotFound { .. }) => StatusCode::NOT_FOUND,
      AppError::Cart(CartError::CheckerUnavailable(_)) => StatusCode::BAD_GATEWAY,
      AppError::Cart(CartError::Store(StoreError::Unavailable { .. })) => StatusCode::SERVICE_UNAVAILABLE,
      AppError::Cart(CartError::Store(_)) | AppError::Sqlx(_) => StatusCode::INTERNAL_SERVER_ERROR,
      AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    // Log the full error when it's turned into a response
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, status = status.as_u16(), "Responding with error");
    } else {
      tracing::warn!(application_error = %self, status = status.as_u16(), "Responding with error");
    }
    HttpResponse::build(status).json(json!({ "error": self.client_message() }))
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
