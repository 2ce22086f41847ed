//! HTTP routing.
//!
//! ```text
//! /health                      liveness + storage check
//! /api/products/...            catalog browsing (no session)
//! /api/cart/...                cart operations (session middleware)
//! ```

mod cart;
mod health;
mod products;

use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::session::session_middleware;
use crate::state::AppState;

pub use cart::{AddToCartRequest, CartCount, UpdateCartItemRequest};
pub use health::HealthStatus;
pub use products::{ListFilters, ListMeta, ProductList, ProductQuery};

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    let cart_routes = cart::routes().route_layer(from_fn_with_state(
        state.session_cookie.clone(),
        session_middleware,
    ));

    Router::new()
        .route("/health", get(health::health))
        .nest("/api/products", products::routes())
        .nest("/api/cart", cart_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
