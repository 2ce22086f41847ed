//! Product browsing on top of the remote catalog.

use std::sync::Arc;

use tracing::info;

use storefront_core::catalog::{search, ProductFilter, ProductStats, SortOrder};
use storefront_core::{Product, ProductId};

use crate::ports::{CatalogQuery, LookupError, ProductCatalog};

/// Parameters of a product listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListParams {
    pub limit: Option<u32>,
    pub sort: Option<SortOrder>,
    pub filter: ProductFilter,
    pub search: Option<String>,
}

impl ListParams {
    fn catalog_query(&self) -> CatalogQuery {
        CatalogQuery {
            limit: self.limit.filter(|l| *l > 0),
            sort: self.sort,
        }
    }
}

/// Listing, lookup, category and statistics operations.
#[derive(Clone)]
pub struct ProductService {
    catalog: Arc<dyn ProductCatalog>,
}

impl ProductService {
    pub fn new(catalog: Arc<dyn ProductCatalog>) -> Self {
        ProductService { catalog }
    }

    /// Fetches with limit/sort, then applies filters and search locally.
    pub async fn list_products(&self, params: &ListParams) -> Result<Vec<Product>, LookupError> {
        let products = self.catalog.list_products(params.catalog_query()).await?;
        let products = params.filter.apply(products);

        let products = match params.search.as_deref() {
            Some(term) if !term.trim().is_empty() => search(products, term),
            _ => products,
        };

        info!(count = products.len(), "Products fetched");
        Ok(products)
    }

    pub async fn get_product(&self, id: ProductId) -> Result<Product, LookupError> {
        self.catalog.get_product(id).await
    }

    /// Category listing; only the price bounds of `params.filter` apply.
    pub async fn products_by_category(
        &self,
        category: &str,
        params: &ListParams,
    ) -> Result<Vec<Product>, LookupError> {
        let products = self
            .catalog
            .list_category(category, params.catalog_query())
            .await?;

        let price_only = ProductFilter {
            category: None,
            ..params.filter.clone()
        };
        let products = price_only.apply(products);

        info!(category, count = products.len(), "Category products fetched");
        Ok(products)
    }

    pub async fn categories(&self) -> Result<Vec<String>, LookupError> {
        self.catalog.list_categories().await
    }

    pub async fn stats(&self) -> Result<ProductStats, LookupError> {
        let products = self.catalog.list_products(CatalogQuery::default()).await?;
        Ok(ProductStats::from_products(&products))
    }
}
