// app/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use cart_core::{Sku, UserId};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::{AppError, Result};
use crate::state::AppState;

// --- Request DTO ---
#[derive(Deserialize, Debug)]
pub struct AddToCartRequestPayload {
  #[serde(default = "default_count")]
  pub count: u32,
}

fn default_count() -> u32 {
  1
}

impl AddToCartRequestPayload {
  /// An empty body means "add one".
  fn from_body(body: &[u8]) -> Result<Self> {
    if body.iter().all(u8::is_ascii_whitespace) {
      return Ok(Self { count: default_count() });
    }
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(format!("invalid request body: {}", e)))
  }
}

fn parse_user_id(raw: &str) -> Result<UserId> {
  raw
    .parse::<UserId>()
    .map_err(|_| AppError::BadRequest("user_id must be valid uuid".to_string()))
}

fn parse_sku(raw: &str) -> Result<Sku> {
  raw
    .parse::<Sku>()
    .map_err(|_| AppError::BadRequest("sku must be a positive integer".to_string()))
}

// --- Handler Implementation ---

#[instrument(name = "handler::add_to_cart", skip(app_state, path, body))]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  path: web::Path<(String, String)>,
  body: web::Bytes,
) -> Result<HttpResponse> {
  let (user_id_raw, sku_raw) = path.into_inner();
  let user_id = parse_user_id(&user_id_raw)?;
  let sku = parse_sku(&sku_raw)?;
  let payload = AddToCartRequestPayload::from_body(&body)?;

  let cart_item = app_state.cart_service.add_product(user_id, sku, payload.count).await?;
  info!(
    "Add to cart successful for user: {}. Item ID: {}, SKU: {}, New Count: {}",
    user_id, cart_item.id, cart_item.sku_id, cart_item.count
  );

  Ok(HttpResponse::Ok().json(json!({ "cart_item": cart_item })))
}

#[instrument(name = "handler::get_cart_items", skip(app_state, path))]
pub async fn get_cart_items_handler(app_state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse> {
  let user_id = parse_user_id(&path.into_inner())?;
  let cart_items = app_state.cart_service.get_items_by_user_id(user_id).await?;
  info!("Fetched {} cart items for user {}.", cart_items.len(), user_id);

  Ok(HttpResponse::Ok().json(json!({ "cart_items": cart_items })))
}

#[instrument(name = "handler::remove_from_cart", skip(app_state, path))]
pub async fn remove_from_cart_handler(
  app_state: web::Data<AppState>,
  path: web::Path<(String, String)>,
) -> Result<HttpResponse> {
  let (user_id_raw, sku_raw) = path.into_inner();
  let user_id = parse_user_id(&user_id_raw)?;
  let sku = parse_sku(&sku_raw)?;

  app_state.cart_service.remove_product(user_id, sku).await?;
  Ok(HttpResponse::NoContent().finish())
}

#[instrument(name = "handler::clear_cart", skip(app_state, path))]
pub async fn clear_cart_handler(app_state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse> {
  let user_id = parse_user_id(&path.into_inner())?;
  app_state.cart_service.remove_all_products(user_id).await?;
  Ok(HttpResponse::NoContent().finish())
}
