use reqwest::{Client, Response};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::error::CatalogError;
use crate::state::data::{Product, ProductPayload};

/// Page size requested on fetch; the API returns a small page otherwise
pub const DEFAULT_FETCH_LIMIT: u32 = 200;

/// HTTP client for the product catalog.
///
/// Every call is a single request: no retry, no timeout, no backoff.
/// Any non-success status is reported as the operation's error variant.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Client,
    base_url: String,
    fetch_limit: u32,
}

impl CatalogClient {
    pub fn new(base_url: &str, fetch_limit: u32) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            fetch_limit,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the whole catalog in one request.
    ///
    /// Accepts a bare array or an object with the array under `data`.
    /// Any other body shape yields an empty list; undecodable records are
    /// dropped with a warning.
    pub async fn fetch_all(&self) -> Result<Vec<Product>, CatalogError> {
        debug!(url = %self.base_url, limit = self.fetch_limit, "Fetching catalog");

        let response = self
            .http
            .get(&self.base_url)
            .query(&[("offset", 0), ("limit", self.fetch_limit)])
            .send()
            .await
            .map_err(|e| CatalogError::Fetch(e.to_string()))?;
        let response = ensure_success(response).map_err(CatalogError::Fetch)?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| CatalogError::Fetch(e.to_string()))?;
        let products = products_from_body(body);

        info!(count = products.len(), "Fetched catalog");
        Ok(products)
    }

    /// Replace the editable fields of product `id`
    pub async fn update(&self, id: i64, payload: &ProductPayload) -> Result<Product, CatalogError> {
        let url = format!("{}/{}", self.base_url, id);
        debug!(%url, "Updating product");

        let response = self
            .http
            .put(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| CatalogError::Update(e.to_string()))?;
        let response = ensure_success(response).map_err(CatalogError::Update)?;

        let product: Product = response
            .json()
            .await
            .map_err(|e| CatalogError::Update(e.to_string()))?;

        info!(id = product.id, "Updated product");
        Ok(product)
    }

    /// Create a product; the server assigns the id
    pub async fn create(&self, payload: &ProductPayload) -> Result<Product, CatalogError> {
        debug!(url = %self.base_url, title = %payload.title, "Creating product");

        let response = self
            .http
            .post(&self.base_url)
            .json(payload)
            .send()
            .await
            .map_err(|e| CatalogError::Create(e.to_string()))?;
        let response = ensure_success(response).map_err(CatalogError::Create)?;

        let product: Product = response
            .json()
            .await
            .map_err(|e| CatalogError::Create(e.to_string()))?;

        info!(id = product.id, "Created product");
        Ok(product)
    }

    /// Download the raw bytes behind a product image URL
    pub async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
        debug!(%url, "Fetching image");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogError::Thumbnail(e.to_string()))?;
        let response = ensure_success(response).map_err(CatalogError::Thumbnail)?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CatalogError::Thumbnail(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

fn ensure_success(response: Response) -> Result<Response, String> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        warn!(%status, url = %response.url(), "Catalog API returned an error status");
        Err(format!("server answered {}", status))
    }
}

/// Decode the records of a list response. A record that does not decode
/// is skipped so one bad row cannot hide the rest of the catalog.
fn products_from_body(body: Value) -> Vec<Product> {
    let records = match body {
        Value::Array(records) => records,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(records)) => records,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    records
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<Product>(record) {
            Ok(product) => Some(product),
            Err(err) => {
                warn!(%err, "Skipping malformed product record");
                None
            }
        })
        .collect()
}
