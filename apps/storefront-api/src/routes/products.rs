//! Product endpoints under `/api/products`.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};
use tracing::info;

use storefront_core::catalog::{ProductFilter, ProductStats, SortOrder};
use storefront_core::validation::{validate_product_id, validate_search_query};
use storefront_core::{Money, Product, ValidationErrors};

use crate::catalog::ListParams;
use crate::error::{ApiError, ApiResponse, ApiResult};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/categories", get(list_categories))
        .route("/stats", get(product_stats))
        .route("/category/:category", get(products_by_category))
        .route("/:id", get(get_product))
}

// =============================================================================
// Query Parameters
// =============================================================================

/// Raw listing parameters. Unparseable numbers are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub limit: Option<String>,
    pub sort: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub search: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_price(value: &Option<String>) -> Option<f64> {
    non_blank(value).and_then(|v| v.parse::<f64>().ok())
}

impl ProductQuery {
    fn limit(&self) -> Option<u32> {
        non_blank(&self.limit)
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|l| *l > 0)
    }

    fn into_params(self, errors: &mut ValidationErrors) -> ListParams {
        let search = match non_blank(&self.search) {
            Some(raw) => match validate_search_query(raw) {
                Ok(term) => Some(term),
                Err(e) => {
                    errors.push(e, raw);
                    None
                }
            },
            None => None,
        };

        ListParams {
            limit: self.limit(),
            sort: non_blank(&self.sort).and_then(SortOrder::parse),
            filter: ProductFilter {
                category: non_blank(&self.category).map(str::to_string),
                min_price: parse_price(&self.min_price).and_then(Money::from_f64),
                max_price: parse_price(&self.max_price).and_then(Money::from_f64),
            },
            search,
        }
    }
}

// =============================================================================
// Response Bodies
// =============================================================================

#[derive(Debug, Serialize)]
pub struct ListFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListMeta {
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub limit: Option<u32>,
    pub sort: Option<String>,
    pub filters: ListFilters,
}

#[derive(Debug, Serialize)]
pub struct ProductList {
    pub products: Vec<Product>,
    pub meta: ListMeta,
}

// =============================================================================
// Handlers
// =============================================================================

async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<ProductQuery>, QueryRejection>,
) -> ApiResult<ProductList> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let mut errors = ValidationErrors::new();
    let limit = query.limit();
    let sort = non_blank(&query.sort).map(str::to_string);
    let filters = ListFilters {
        category: non_blank(&query.category).map(str::to_string),
        min_price: parse_price(&query.min_price),
        max_price: parse_price(&query.max_price),
        search: non_blank(&query.search).map(str::to_string),
    };
    let params = query.into_params(&mut errors);
    errors.into_result()?;

    let products = state
        .products
        .list_products(&params)
        .await
        .map_err(|e| ApiError::from(e).headline("Please try again later"))?;

    let meta = ListMeta {
        total: products.len(),
        category: None,
        limit,
        sort,
        filters,
    };
    Ok(ApiResponse::success(
        ProductList { products, meta },
        "Products retrieved successfully",
    ))
}

async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Product> {
    let product_id = id
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|id| validate_product_id(id).ok())
        .ok_or_else(|| {
            ApiError::not_found("Product not found")
                .with_error(format!("Invalid product id: {}", id))
        })?;

    let product = state
        .products
        .get_product(product_id)
        .await
        .map_err(|e| ApiError::from(e).headline("Product not found"))?;

    info!(product_id = %product_id, title = %product.title, "Product fetched");
    Ok(ApiResponse::success(product, "Product retrieved successfully"))
}

async fn products_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
    query: Result<Query<ProductQuery>, QueryRejection>,
) -> ApiResult<ProductList> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let limit = query.limit();
    let sort = non_blank(&query.sort).map(str::to_string);
    let filters = ListFilters {
        category: None,
        min_price: parse_price(&query.min_price),
        max_price: parse_price(&query.max_price),
        search: None,
    };
    let mut errors = ValidationErrors::new();
    let params = query.into_params(&mut errors);

    let products = state
        .products
        .products_by_category(&category, &params)
        .await
        .map_err(|e| ApiError::from(e).headline("Please try again later"))?;

    let meta = ListMeta {
        total: products.len(),
        category: Some(category),
        limit,
        sort,
        filters,
    };
    Ok(ApiResponse::success(
        ProductList { products, meta },
        "Products retrieved successfully",
    ))
}

async fn list_categories(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    let categories = state
        .products
        .categories()
        .await
        .map_err(|e| ApiError::from(e).headline("Please try again later"))?;

    info!(count = categories.len(), "Categories fetched");
    Ok(ApiResponse::success(
        categories,
        "Categories retrieved successfully",
    ))
}

async fn product_stats(State(state): State<AppState>) -> ApiResult<ProductStats> {
    let stats = state
        .products
        .stats()
        .await
        .map_err(|e| ApiError::from(e).headline("Please try again later"))?;

    Ok(ApiResponse::success(
        stats,
        "Product statistics retrieved successfully",
    ))
}
