// core/src/checker/http.rs
use crate::checker::{ProductChecker, ProductLookup};
use crate::error::CheckerError;
use crate::ids::Sku;
use crate::models::Product;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{Map, Value};
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

pub const HEADER_X_API_KEY: &str = "X-API-KEY";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// `ProductChecker` talking to the catalog service over HTTP.
///
/// `GET {base_url}/product/{sku}` with the API key header. Each lookup is
/// bounded by `timeout`; dropping the returned future aborts the request.
#[derive(Debug, Clone)]
pub struct HttpProductChecker {
  client: Client,
  base_url: String,
  token: String,
  timeout: Duration,
}

impl HttpProductChecker {
  pub fn new(base_url: impl Into<String>, token: impl Into<String>, timeout: Duration) -> Result<Self, CheckerError> {
    let client = Client::builder()
      .timeout(timeout)
      .build()
      .map_err(|e| CheckerError::Transport { source: e.into() })?;
    Ok(Self::with_client(client, base_url, token, timeout))
  }

  /// Uses a caller-built client, e.g. one shared with other outbound calls.
  pub fn with_client(client: Client, base_url: impl Into<String>, token: impl Into<String>, timeout: Duration) -> Self {
    let base_url = base_url.into().trim_end_matches('/').to_string();
    Self {
      client,
      base_url,
      token: token.into(),
      timeout,
    }
  }

  pub fn timeout(&self) -> Duration {
    self.timeout
  }

  fn product_url(&self, sku: Sku) -> String {
    format!("{}/product/{}", self.base_url, sku)
  }

  async fn fetch(&self, sku: Sku) -> Result<ProductLookup, CheckerError> {
    let response = self
      .client
      .get(self.product_url(sku))
      .header(HEADER_X_API_KEY, &self.token)
      .send()
      .await
      .map_err(|e| self.transport_error(e))?;

    match response.status() {
      StatusCode::OK => {
        let body = response.bytes().await.map_err(|e| self.transport_error(e))?;
        Ok(ProductLookup::Found(decode_product(sku, &body)?))
      }
      StatusCode::NOT_FOUND => Ok(ProductLookup::NotFound),
      other => Err(CheckerError::UnexpectedStatus { status: other.as_u16() }),
    }
  }

  fn transport_error(&self, err: reqwest::Error) -> CheckerError {
    if err.is_timeout() {
      CheckerError::Timeout { after: self.timeout }
    } else {
      CheckerError::Transport { source: err.into() }
    }
  }
}

/// Reads a catalog product body. Keys match without regard to case and absent
/// or mistyped fields fall back to defaults; only non-JSON is malformed.
fn decode_product(sku: Sku, body: &[u8]) -> Result<Product, CheckerError> {
  let value: Value =
    serde_json::from_slice(body).map_err(|e| CheckerError::MalformedPayload { source: e.into() })?;
  let fields: Map<String, Value> = match value {
    Value::Object(map) => map.into_iter().map(|(key, v)| (key.to_ascii_lowercase(), v)).collect(),
    _ => Map::new(),
  };

  Ok(Product {
    sku: fields.get("sku").and_then(Value::as_u64).map(Sku::new).unwrap_or(sku),
    name: fields.get("name").and_then(Value::as_str).unwrap_or_default().to_string(),
    price: fields.get("price").and_then(Value::as_f64).unwrap_or_default(),
  })
}

#[async_trait]
impl ProductChecker for HttpProductChecker {
  #[instrument(name = "HttpProductChecker::lookup", skip(self), fields(%sku))]
  async fn lookup(&self, sku: Sku) -> Result<ProductLookup, CheckerError> {
    let started = Instant::now();
    // The client timeout already covers the request; this also bounds body reads.
    let outcome = match tokio::time::timeout(self.timeout, self.fetch(sku)).await {
      Ok(outcome) => outcome,
      Err(_) => Err(CheckerError::Timeout { after: self.timeout }),
    };
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match &outcome {
      Ok(ProductLookup::Found(product)) => info!(elapsed_ms, name = %product.name, "Product found."),
      Ok(ProductLookup::NotFound) => info!(elapsed_ms, "Product not found."),
      Err(e) => warn!(elapsed_ms, error = %e, "Product lookup failed."),
    }
    outcome
  }
}
