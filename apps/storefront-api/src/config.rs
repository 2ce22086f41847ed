//! Storefront API configuration.
//!
//! Configuration is loaded from environment variables (optionally seeded
//! from a `.env` file) with fallback to defaults.
//!
//! | Variable                  | Default                    |
//! |---------------------------|----------------------------|
//! | `SERVER_HOST`             | `0.0.0.0`                  |
//! | `SERVER_PORT`             | `8080`                     |
//! | `LOG_LEVEL`               | `info`                     |
//! | `CORS_ALLOWED_ORIGINS`    | (none)                     |
//! | `FAKESTORE_API_BASE_URL`  | `https://fakestoreapi.com` |
//! | `CATALOG_TIMEOUT_SECS`    | `10`                       |
//! | `SESSION_BACKEND`         | `sqlite`                   |
//! | `SESSION_DB_PATH`         | `./data/storefront.db`     |
//! | `SESSION_COOKIE_NAME`     | `STOREFRONT_SESSION`       |
//! | `SESSION_IDLE_DAYS`       | `30`                       |
//! | `CART_SESSION_KEY`        | `cart`                     |
//! | `CART_DISCOUNT_THRESHOLD` | `200.00`                   |
//! | `CART_DISCOUNT_RATE`      | `0.10`                     |
//! | `CART_DEFAULT_CURRENCY`   | `EUR`                      |

use std::env;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use storefront_core::pricing::DiscountPolicy;
use storefront_core::{DiscountRate, Money, DEFAULT_CURRENCY};

// =============================================================================
// Sections
// =============================================================================

/// HTTP server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Fallback tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    /// Listen target for `TcpListener::bind`. Hostnames resolve at bind time.
    pub fn bind_target(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}

/// Remote product catalog settings.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

/// Where session data lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionBackend {
    Sqlite,
    Memory,
}

impl FromStr for SessionBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(SessionBackend::Sqlite),
            "memory" => Ok(SessionBackend::Memory),
            _ => Err(ConfigError::InvalidValue("SESSION_BACKEND".to_string())),
        }
    }
}

/// Session cookie and storage settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub backend: SessionBackend,
    pub db_path: String,
    pub cookie_name: String,
    pub idle_days: u32,
}

/// Cart pricing settings, constant per deployment.
#[derive(Debug, Clone)]
pub struct CartConfig {
    pub session_key: String,
    pub discount_threshold: Money,
    pub discount_rate: DiscountRate,
    pub currency: String,
}

impl CartConfig {
    pub fn discount_policy(&self) -> DiscountPolicy {
        DiscountPolicy::new(self.discount_threshold, self.discount_rate)
    }
}

// =============================================================================
// Application Config
// =============================================================================

/// Storefront API configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub session: SessionConfig,
    pub cart: CartConfig,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// A `.env` file in the working directory is read first if present;
    /// real environment variables win over it.
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_source(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| -> String {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let config = AppConfig {
            server: ServerConfig {
                host: get("SERVER_HOST", "0.0.0.0"),
                port: parse(&get("SERVER_PORT", "8080"), "SERVER_PORT")?,
                log_level: get("LOG_LEVEL", "info"),
                cors_origins: lookup("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(|origin| origin.trim().to_string())
                            .filter(|origin| !origin.is_empty())
                            .collect()
                    })
                    .unwrap_or_default(),
            },

            catalog: CatalogConfig {
                base_url: parse(
                    &get("FAKESTORE_API_BASE_URL", "https://fakestoreapi.com"),
                    "FAKESTORE_API_BASE_URL",
                )?,
                timeout: Duration::from_secs(parse(
                    &get("CATALOG_TIMEOUT_SECS", "10"),
                    "CATALOG_TIMEOUT_SECS",
                )?),
            },

            session: SessionConfig {
                backend: get("SESSION_BACKEND", "sqlite").parse()?,
                db_path: get("SESSION_DB_PATH", "./data/storefront.db"),
                cookie_name: get("SESSION_COOKIE_NAME", "STOREFRONT_SESSION"),
                idle_days: parse(&get("SESSION_IDLE_DAYS", "30"), "SESSION_IDLE_DAYS")?,
            },

            cart: CartConfig {
                session_key: get("CART_SESSION_KEY", "cart"),
                discount_threshold: Money::from_str(&get("CART_DISCOUNT_THRESHOLD", "200.00"))
                    .map_err(|_| ConfigError::InvalidValue("CART_DISCOUNT_THRESHOLD".to_string()))?,
                discount_rate: DiscountRate::from_str(&get("CART_DISCOUNT_RATE", "0.10"))
                    .map_err(|_| ConfigError::InvalidValue("CART_DISCOUNT_RATE".to_string()))?,
                currency: get("CART_DEFAULT_CURRENCY", DEFAULT_CURRENCY).to_uppercase(),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Rejects values that parse but make no sense.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue("SERVER_PORT".to_string()));
        }
        if self.catalog.timeout.is_zero() {
            return Err(ConfigError::InvalidValue("CATALOG_TIMEOUT_SECS".to_string()));
        }
        if !matches!(self.catalog.base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue("FAKESTORE_API_BASE_URL".to_string()));
        }
        if self.session.cookie_name.contains([';', '=', ',', ' ']) {
            return Err(ConfigError::InvalidValue("SESSION_COOKIE_NAME".to_string()));
        }
        if self.session.idle_days == 0 {
            return Err(ConfigError::InvalidValue("SESSION_IDLE_DAYS".to_string()));
        }
        if self.cart.discount_threshold.is_negative() {
            return Err(ConfigError::InvalidValue("CART_DISCOUNT_THRESHOLD".to_string()));
        }
        if !self.cart.discount_rate.is_within_unit_range() {
            return Err(ConfigError::InvalidValue("CART_DISCOUNT_RATE".to_string()));
        }
        if self.cart.currency.is_empty() {
            return Err(ConfigError::MissingRequired("CART_DEFAULT_CURRENCY".to_string()));
        }
        Ok(())
    }
}

fn parse<T: FromStr>(value: &str, key: &str) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidValue(key.to_string()))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
