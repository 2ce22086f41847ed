//! Ports between the cart/product services and their collaborators.
//!
//! ```text
//! ┌──────────────┐   ProductLookup    ┌───────────────────┐
//! │ CartService  │───────────────────►│ FakeStoreClient   │
//! │              │                    │ (ProductCatalog)  │
//! │              │   SessionStore     ├───────────────────┤
//! │              │───────────────────►│ SqliteSessionStore│
//! └──────────────┘                    │ MemorySessionStore│
//! ┌──────────────┐   ProductCatalog   └───────────────────┘
//! │ProductService│───────────────────► FakeStoreClient
//! └──────────────┘
//! ```

use async_trait::async_trait;
use thiserror::Error;

use storefront_core::cart::LineItems;
use storefront_core::catalog::SortOrder;
use storefront_core::{Product, ProductId};
use storefront_db::DbError;

use crate::session::SessionId;

// =============================================================================
// Product Lookup
// =============================================================================

/// Catalog failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The catalog does not know this product.
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// Network failure, timeout or non-success status.
    #[error("Catalog request failed: {0}")]
    Transport(String),

    /// The catalog answered with something we could not read.
    #[error("Catalog response could not be decoded: {0}")]
    Decode(String),
}

impl LookupError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LookupError::NotFound(_))
    }
}

/// Narrow product lookup used by the cart.
#[async_trait]
pub trait ProductLookup: Send + Sync {
    async fn get_product(&self, id: ProductId) -> Result<Product, LookupError>;
}

/// Options the remote catalog understands natively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    pub limit: Option<u32>,
    pub sort: Option<SortOrder>,
}

/// Full catalog browsing used by the product endpoints.
#[async_trait]
pub trait ProductCatalog: ProductLookup {
    async fn list_products(&self, query: CatalogQuery) -> Result<Vec<Product>, LookupError>;

    async fn list_category(
        &self,
        category: &str,
        query: CatalogQuery,
    ) -> Result<Vec<Product>, LookupError>;

    async fn list_categories(&self) -> Result<Vec<String>, LookupError>;
}

// =============================================================================
// Session Store
// =============================================================================

/// Session storage failures.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session storage failed: {0}")]
    Storage(String),
}

impl From<DbError> for SessionError {
    fn from(err: DbError) -> Self {
        SessionError::Storage(err.to_string())
    }
}

/// Per-session storage of line-item mappings, keyed by `(session, key)`.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the stored mapping, or an empty one when nothing is stored.
    async fn get(&self, session: &SessionId, key: &str) -> Result<LineItems, SessionError>;

    /// Replaces the whole mapping.
    async fn set(&self, session: &SessionId, key: &str, items: &LineItems)
        -> Result<(), SessionError>;

    /// Deletes the key entirely.
    async fn remove(&self, session: &SessionId, key: &str) -> Result<(), SessionError>;

    /// Whether the backing storage is reachable.
    async fn health_check(&self) -> bool {
        true
    }
}
