// app/src/main.rs

mod config;
mod errors;
mod state;
mod web;

use crate::config::{AppConfig, DatabaseConfig, StoreBackend};
use crate::errors::{AppError, Result as AppResult};
use crate::state::AppState;

use actix_web::{web as actix_data, App, HttpServer};
use cart_core::{CartService, CartStore, HttpProductChecker, InMemoryCartStore, PgCartStore};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

/// Picks the store backend named in the config. This is the only place the
/// concrete store type is chosen.
async fn build_store(config: &AppConfig) -> AppResult<Arc<dyn CartStore>> {
  match (config.store_backend, &config.database) {
    (StoreBackend::Memory, _) => {
      tracing::warn!("Using the in-memory cart store; cart contents are lost on restart.");
      Ok(Arc::new(InMemoryCartStore::with_capacity(1024)))
    }
    (StoreBackend::Postgres, Some(db)) => Ok(Arc::new(connect_postgres(db).await?)),
    (StoreBackend::Postgres, None) => Err(AppError::Config("DATABASE_URL is required for the postgres backend".into())),
  }
}

async fn connect_postgres(db: &DatabaseConfig) -> AppResult<PgCartStore> {
  let pool = PgPoolOptions::new()
    .max_connections(db.max_connections)
    .acquire_timeout(db.acquire_timeout)
    .connect(&db.url)
    .await?;
  tracing::info!("Successfully connected to the database.");

  let store = PgCartStore::new(pool);
  if db.run_migrations {
    store.migrate().await.map_err(anyhow::Error::from)?;
  }
  Ok(store)
}

async fn build_state(config: Arc<AppConfig>) -> AppResult<AppState> {
  let store = build_store(&config).await?;
  let checker = HttpProductChecker::new(
    config.products.base_url.clone(),
    config.products.token.clone(),
    config.products.timeout,
  )
  .map_err(anyhow::Error::from)?;

  Ok(AppState {
    cart_service: CartService::new(store, Arc::new(checker)),
    config,
  })
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO) // Default level
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE) // Log when spans close, showing duration
    .init();

  tracing::info!("Starting cart service...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
    }
  };

  let app_state = match build_state(app_config.clone()).await {
    Ok(state) => state,
    Err(e) => {
      tracing::error!(error = %e, "Failed to initialize cart service.");
      return Err(std::io::Error::other(e.to_string()));
    }
  };

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
