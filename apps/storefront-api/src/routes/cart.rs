//! Cart endpoints under `/api/cart`.
//!
//! Every handler runs behind the session middleware, so [`SessionId`] is
//! always available.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use storefront_core::validation::{
    validate_add_quantity, validate_product_id, validate_update_quantity,
};
use storefront_core::{Cart, ProductId, ValidationError, ValidationErrors};

use crate::error::{ApiError, ApiResponse, ApiResult};
use crate::session::SessionId;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_cart))
        .route("/add", post(add_to_cart))
        .route("/item/:product_id", put(update_cart_item).delete(remove_from_cart))
        .route("/clear", delete(clear_cart))
        .route("/count", get(cart_count))
}

// =============================================================================
// Request Bodies
// =============================================================================

/// `POST /api/cart/add` body. `quantity` defaults to 1.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: Option<i64>,
    pub quantity: Option<i64>,
}

impl AddToCartRequest {
    /// Collects every violation rather than stopping at the first.
    pub fn validate(&self) -> Result<(ProductId, u32), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let product_id = match self.product_id {
            None => {
                errors.push(
                    ValidationError::Required {
                        field: "productId".to_string(),
                    },
                    Value::Null,
                );
                None
            }
            Some(raw) => validate_product_id(raw)
                .map_err(|e| errors.push(e, raw))
                .ok(),
        };

        let raw_quantity = self.quantity.unwrap_or(1);
        let quantity = validate_add_quantity(raw_quantity)
            .map_err(|e| errors.push(e, raw_quantity))
            .ok();

        match (product_id, quantity) {
            (Some(id), Some(quantity)) => Ok((id, quantity)),
            _ => Err(errors),
        }
    }
}

/// `PUT /api/cart/item/:productId` body.
#[derive(Debug, Deserialize)]
pub struct UpdateCartItemRequest {
    pub quantity: Option<i64>,
}

impl UpdateCartItemRequest {
    pub fn validate(&self) -> Result<u32, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let Some(raw) = self.quantity else {
            errors.push(
                ValidationError::Required {
                    field: "quantity".to_string(),
                },
                Value::Null,
            );
            return Err(errors);
        };

        validate_update_quantity(raw).map_err(|e| {
            errors.push(e, raw);
            errors
        })
    }
}

#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: u64,
}

fn path_product_id(raw: &str) -> Result<ProductId, ApiError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(|id| validate_product_id(id).ok())
        .ok_or_else(|| ApiError::not_found(format!("Product {} not found in cart", raw)))
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value).map_err(|e| {
        warn!(error = %e.body_text(), "Invalid JSON payload received");
        ApiError::invalid_json()
    })
}

// =============================================================================
// Handlers
// =============================================================================

async fn get_cart(State(state): State<AppState>, session: SessionId) -> ApiResult<Cart> {
    let cart = state
        .cart
        .get_cart(&session)
        .await
        .map_err(|e| ApiError::from(e).headline("Please try again later"))?;

    info!(items = cart.items.len(), total = %cart.totals.total, "Cart retrieved");
    Ok(ApiResponse::success(cart, "Cart retrieved successfully"))
}

async fn add_to_cart(
    State(state): State<AppState>,
    session: SessionId,
    body: Result<Json<AddToCartRequest>, JsonRejection>,
) -> ApiResult<Cart> {
    let (product_id, quantity) = json_body(body)?.validate()?;

    let cart = state
        .cart
        .add_to_cart(&session, product_id, quantity)
        .await
        .map_err(|e| ApiError::from(e).headline("Failed to add product to cart"))?;

    Ok(ApiResponse::success(
        cart,
        "Product added to cart successfully",
    ))
}

async fn update_cart_item(
    State(state): State<AppState>,
    session: SessionId,
    Path(product_id): Path<String>,
    body: Result<Json<UpdateCartItemRequest>, JsonRejection>,
) -> ApiResult<Cart> {
    let product_id = path_product_id(&product_id)?;
    let quantity = json_body(body)?.validate()?;

    let cart = state
        .cart
        .update_cart_item(&session, product_id, quantity)
        .await
        .map_err(|e| ApiError::from(e).headline("Failed to update cart item"))?;

    Ok(ApiResponse::success(cart, "Cart item updated successfully"))
}

async fn remove_from_cart(
    State(state): State<AppState>,
    session: SessionId,
    Path(product_id): Path<String>,
) -> ApiResult<Cart> {
    let product_id = path_product_id(&product_id)?;

    let cart = state
        .cart
        .remove_from_cart(&session, product_id)
        .await
        .map_err(|e| ApiError::from(e).headline("Failed to remove product from cart"))?;

    Ok(ApiResponse::success(
        cart,
        "Product removed from cart successfully",
    ))
}

async fn clear_cart(State(state): State<AppState>, session: SessionId) -> ApiResult<Cart> {
    let cart = state
        .cart
        .clear_cart(&session)
        .await
        .map_err(|e| ApiError::from(e).headline("Failed to clear cart"))?;

    Ok(ApiResponse::success(cart, "Cart cleared successfully"))
}

async fn cart_count(State(state): State<AppState>, session: SessionId) -> ApiResult<CartCount> {
    let count = state
        .cart
        .cart_items_count(&session)
        .await
        .map_err(|e| ApiError::from(e).headline("Please try again later"))?;

    info!(count, "Cart count retrieved");
    Ok(ApiResponse::success(
        CartCount { count },
        "Cart count retrieved successfully",
    ))
}
