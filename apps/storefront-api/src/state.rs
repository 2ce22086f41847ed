//! Application state shared by every handler.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use storefront_db::{Database, DbConfig, DbError};

use crate::cart::{CartService, CartSettings};
use crate::catalog::{FakeStoreClient, ProductService};
use crate::config::{AppConfig, SessionBackend};
use crate::ports::{ProductCatalog, ProductLookup, SessionError, SessionStore};
use crate::session::{MemorySessionStore, SessionCookieConfig, SqliteSessionStore};

/// Failures while wiring the application together.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Failed to open session database: {0}")]
    Database(#[from] DbError),

    #[error("Failed to prepare session storage: {0}")]
    Session(#[from] SessionError),

    #[error("Failed to build catalog client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Services and settings handed to the router.
#[derive(Clone)]
pub struct AppState {
    pub cart: Arc<CartService>,
    pub products: Arc<ProductService>,
    pub sessions: Arc<dyn SessionStore>,
    pub session_cookie: SessionCookieConfig,
}

impl AppState {
    /// Assembles state from already-built collaborators.
    pub fn new<C>(
        catalog: Arc<C>,
        sessions: Arc<dyn SessionStore>,
        settings: CartSettings,
        session_cookie: SessionCookieConfig,
    ) -> Self
    where
        C: ProductCatalog + 'static,
    {
        let lookup: Arc<dyn ProductLookup> = catalog.clone();
        let catalog: Arc<dyn ProductCatalog> = catalog;
        let cart = CartService::new(lookup, sessions.clone(), settings);

        AppState {
            cart: Arc::new(cart),
            products: Arc::new(ProductService::new(catalog)),
            sessions,
            session_cookie,
        }
    }

    /// Builds the production state: FakeStore catalog plus the configured
    /// session backend.
    pub async fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        let catalog = FakeStoreClient::new(
            config.catalog.base_url.clone(),
            config.catalog.timeout,
            config.cart.currency.clone(),
        )?;
        info!(base_url = %catalog.base_url(), "Catalog client ready");

        let sessions: Arc<dyn SessionStore> = match config.session.backend {
            SessionBackend::Sqlite => {
                let db = Database::new(DbConfig::new(&config.session.db_path)).await?;
                let store = SqliteSessionStore::new(db);
                store.purge_idle(config.session.idle_days).await?;
                info!(path = %config.session.db_path, "SQLite session store ready");
                Arc::new(store)
            }
            SessionBackend::Memory => {
                info!("In-memory session store ready");
                Arc::new(MemorySessionStore::new())
            }
        };

        let settings = CartSettings {
            session_key: config.cart.session_key.clone(),
            policy: config.cart.discount_policy(),
            currency: config.cart.currency.clone(),
        };
        let session_cookie =
            SessionCookieConfig::new(config.session.cookie_name.clone(), config.session.idle_days);

        Ok(AppState::new(
            Arc::new(catalog),
            sessions,
            settings,
            session_cookie,
        ))
    }
}
