// app/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Which `CartStore` backend the server is wired with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
  Postgres,
  Memory,
}

impl FromStr for StoreBackend {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "postgres" | "pg" => Ok(StoreBackend::Postgres),
      "memory" | "in-memory" => Ok(StoreBackend::Memory),
      other => Err(AppError::Config(format!(
        "Invalid STORE_BACKEND '{}': expected 'postgres' or 'memory'",
        other
      ))),
    }
  }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
  pub url: String,
  pub max_connections: u32,
  pub acquire_timeout: Duration,
  pub run_migrations: bool,
}

#[derive(Debug, Clone)]
pub struct ProductsConfig {
  pub base_url: String,
  pub token: String,
  pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub store_backend: StoreBackend,
  /// Present only when `store_backend` is `Postgres`.
  pub database: Option<DatabaseConfig>,
  pub products: ProductsConfig,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from an arbitrary variable source.
  pub fn from_lookup<F>(lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let get_env = |var_name: &str| {
      lookup(var_name).ok_or_else(|| AppError::Config(format!("Missing environment variable '{}'", var_name)))
    };
    let var_or = |var_name: &str, default: &str| lookup(var_name).unwrap_or_else(|| default.to_string());

    let server_host = var_or("SERVER_HOST", "127.0.0.1");
    let server_port = var_or("SERVER_PORT", "8080")
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;

    let store_backend = var_or("STORE_BACKEND", "postgres").parse::<StoreBackend>()?;

    let database = match store_backend {
      StoreBackend::Memory => None,
      StoreBackend::Postgres => {
        let url = get_env("DATABASE_URL")?;
        let max_connections = var_or("DATABASE_MAX_CONNECTIONS", "10")
          .parse::<u32>()
          .map_err(|e| AppError::Config(format!("Invalid DATABASE_MAX_CONNECTIONS: {}", e)))?;
        let acquire_timeout_ms = var_or("DATABASE_ACQUIRE_TIMEOUT_MS", "3000")
          .parse::<u64>()
          .map_err(|e| AppError::Config(format!("Invalid DATABASE_ACQUIRE_TIMEOUT_MS: {}", e)))?;
        let run_migrations = var_or("RUN_MIGRATIONS", "true")
          .parse::<bool>()
          .map_err(|e| AppError::Config(format!("Invalid RUN_MIGRATIONS value: {}", e)))?;
        Some(DatabaseConfig {
          url,
          max_connections,
          acquire_timeout: Duration::from_millis(acquire_timeout_ms),
          run_migrations,
        })
      }
    };

    let products_timeout_ms = var_or("PRODUCTS_TIMEOUT_MS", "2000")
      .parse::<u64>()
      .map_err(|e| AppError::Config(format!("Invalid PRODUCTS_TIMEOUT_MS: {}", e)))?;
    let products = ProductsConfig {
      base_url: get_env("PRODUCTS_BASE_URL")?,
      token: get_env("PRODUCTS_TOKEN")?,
      timeout: Duration::from_millis(products_timeout_ms),
    };

    tracing::info!(
      backend = ?store_backend,
      products_base_url = %products.base_url,
      "Application configuration loaded successfully."
    );

    Ok(Self {
      server_host,
      server_port,
      store_backend,
      database,
      products,
    })
  }
}
