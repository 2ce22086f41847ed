//! # Storefront API
//!
//! HTTP service for product browsing and the session-backed shopping cart.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Storefront API                                  │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │ /api/products  │  │   /api/cart    │  │  /health                   ││
//! │  │                │  │                │  │                            ││
//! │  │ • list/filter  │  │ • get          │  │ • liveness                 ││
//! │  │ • get one      │  │ • add/update   │  │ • storage check            ││
//! │  │ • categories   │  │ • remove/clear │  │                            ││
//! │  │ • stats        │  │ • count        │  │                            ││
//! │  └───────┬────────┘  └───────┬────────┘  └────────────────────────────┘│
//! │          │                   │                                          │
//! │  ┌───────▼────────┐  ┌───────▼────────┐                                │
//! │  │ ProductService │  │  CartService   │──► storefront-core (pricing)   │
//! │  └───────┬────────┘  └──┬──────────┬──┘                                │
//! │          │              │          │                                    │
//! │  ┌───────▼──────────────▼──┐  ┌────▼──────────────────────────────┐    │
//! │  │  FakeStoreClient        │  │  SessionStore                     │    │
//! │  │  (ProductCatalog)       │  │  SQLite (storefront-db) / memory  │    │
//! │  └─────────────────────────┘  └───────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables (all optional, see [`config`]):
//! - `SERVER_HOST` / `SERVER_PORT` - listen address (default: 0.0.0.0:8080)
//! - `FAKESTORE_API_BASE_URL` - catalog base URL
//! - `SESSION_BACKEND` - `sqlite` or `memory`
//! - `CART_DISCOUNT_THRESHOLD` / `CART_DISCOUNT_RATE` - discount policy

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod ports;
pub mod routes;
pub mod session;
pub mod state;

// Re-exports
pub use config::AppConfig;
pub use error::{ApiError, ApiResponse, ErrorCode};
pub use routes::router;
pub use state::{AppState, StartupError};
