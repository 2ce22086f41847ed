//! # Sessions
//!
//! Browser session identity and the session stores behind the cart.
//!
//! - [`SessionId`] / [`session_middleware`] - cookie-based identity
//! - [`MemorySessionStore`] - process-local store (tests, development)
//! - [`SqliteSessionStore`] - durable store over `storefront-db`
//! - [`SessionLocks`] - per-session mutation locks

mod cookie;
mod id;
mod locks;
mod memory;
mod sqlite;

pub use cookie::{session_middleware, SessionCookieConfig};
pub use id::SessionId;
pub use locks::SessionLocks;
pub use memory::MemorySessionStore;
pub use sqlite::SqliteSessionStore;
