//! HTTP client for the FakeStore product API.
//!
//! ```text
//! GET {base}/products[?limit=&sort=]           → [Product]
//! GET {base}/products/{id}                     → Product | null
//! GET {base}/products/category/{c}[?limit=...] → [Product]
//! GET {base}/products/categories               → [String]
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, error, warn};
use url::Url;

use storefront_core::{Money, Product, ProductId, Rating};

use crate::ports::{CatalogQuery, LookupError, ProductCatalog, ProductLookup};

/// Product as the FakeStore API returns it (no currency).
#[derive(Debug, Deserialize)]
struct WireProduct {
    id: u32,
    title: String,
    price: Money,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    rating: Option<Rating>,
}

impl WireProduct {
    fn into_product(self, currency: &str) -> Product {
        Product {
            id: ProductId::new(self.id),
            title: self.title,
            price: self.price,
            currency: currency.to_string(),
            description: self.description,
            category: self.category,
            image: self.image,
            rating: self.rating,
        }
    }
}

/// Catalog adapter over the FakeStore REST API.
#[derive(Debug, Clone)]
pub struct FakeStoreClient {
    http: reqwest::Client,
    base_url: Url,
    currency: String,
}

impl FakeStoreClient {
    pub fn new(
        base_url: Url,
        timeout: Duration,
        currency: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(FakeStoreClient {
            http,
            base_url,
            currency: currency.into(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends `segments` to the base URL's path, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, LookupError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                error!(base_url = %self.base_url, "Catalog base URL cannot take a path");
                LookupError::Transport(format!("cannot build a request on {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn query_pairs(query: CatalogQuery) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(limit) = query.limit.filter(|l| *l > 0) {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(sort) = query.sort {
            pairs.push(("sort", sort.as_str().to_string()));
        }
        pairs
    }

    /// Sends a GET and returns the status and body.
    async fn fetch(
        &self,
        url: &Url,
        query: &[(&'static str, String)],
    ) -> Result<(StatusCode, String), LookupError> {
        debug!(url = %url, "Fetching from catalog");

        let response = self.http.get(url.clone()).query(query).send().await.map_err(|e| {
            error!(url = %url, error = %e, "Catalog request failed");
            LookupError::Transport(e.to_string())
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!(url = %url, error = %e, "Failed to read catalog response");
            LookupError::Transport(e.to_string())
        })?;

        Ok((status, body))
    }

    fn ensure_success(path: &str, status: StatusCode) -> Result<(), LookupError> {
        if status.is_success() {
            return Ok(());
        }
        error!(path, %status, "Catalog returned an error status");
        Err(LookupError::Transport(format!(
            "catalog returned {} for {}",
            status, path
        )))
    }

    fn decode<T: for<'de> Deserialize<'de>>(path: &str, body: &str) -> Result<T, LookupError> {
        serde_json::from_str(body).map_err(|e| {
            error!(path, error = %e, "Failed to decode catalog response");
            LookupError::Decode(e.to_string())
        })
    }

    async fn fetch_products(
        &self,
        segments: &[&str],
        query: CatalogQuery,
    ) -> Result<Vec<Product>, LookupError> {
        let url = self.endpoint(segments)?;
        let (status, body) = self.fetch(&url, &Self::query_pairs(query)).await?;
        Self::ensure_success(url.path(), status)?;

        let products: Vec<WireProduct> = Self::decode(url.path(), &body)?;
        Ok(products
            .into_iter()
            .map(|p| p.into_product(&self.currency))
            .collect())
    }
}

#[async_trait]
impl ProductLookup for FakeStoreClient {
    async fn get_product(&self, id: ProductId) -> Result<Product, LookupError> {
        let url = self.endpoint(&["products", &id.to_string()])?;
        let (status, body) = self.fetch(&url, &[]).await?;

        if status == StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound(id));
        }
        Self::ensure_success(url.path(), status)?;

        // The API answers unknown ids with 200 and an empty or null body
        let body = body.trim();
        if body.is_empty() || body == "null" {
            warn!(product_id = %id, "Catalog returned no product");
            return Err(LookupError::NotFound(id));
        }

        let product: WireProduct = Self::decode(url.path(), body)?;
        Ok(product.into_product(&self.currency))
    }
}

#[async_trait]
impl ProductCatalog for FakeStoreClient {
    async fn list_products(&self, query: CatalogQuery) -> Result<Vec<Product>, LookupError> {
        self.fetch_products(&["products"], query).await
    }

    async fn list_category(
        &self,
        category: &str,
        query: CatalogQuery,
    ) -> Result<Vec<Product>, LookupError> {
        self.fetch_products(&["products", "category", category], query)
            .await
    }

    async fn list_categories(&self) -> Result<Vec<String>, LookupError> {
        let url = self.endpoint(&["products", "categories"])?;
        let (status, body) = self.fetch(&url, &[]).await?;
        Self::ensure_success(url.path(), status)?;
        Self::decode(url.path(), &body)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
