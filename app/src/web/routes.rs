// app/src/web/routes.rs

use crate::config::StoreBackend;
use crate::state::AppState;
use crate::web::handlers::cart_handlers;
use actix_web::web;

async fn health_check_handler(app_state: web::Data<AppState>) -> actix_web::HttpResponse {
  let store = match app_state.config.store_backend {
    StoreBackend::Postgres => "postgres",
    StoreBackend::Memory => "memory",
  };
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok", "store": store }))
}

// Called from `main.rs` (and the handler tests) to mount every route.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .route("/health", web::get().to(health_check_handler))
    .service(
      web::scope("/user/{user_id}/cart")
        .route("", web::get().to(cart_handlers::get_cart_items_handler))
        .route("", web::delete().to(cart_handlers::clear_cart_handler))
        .route("/{sku_id}", web::post().to(cart_handlers::add_to_cart_handler))
        .route("/{sku_id}", web::delete().to(cart_handlers::remove_from_cart_handler)),
    );
}
