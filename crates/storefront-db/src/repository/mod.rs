//! # Repository Module
//!
//! Database repository implementations for the storefront.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  SessionStore adapter (api app)                                         │
//! │       │                                                                 │
//! │       │  db.sessions().load_line_items(session_id, "cart")              │
//! │       ▼                                                                 │
//! │  SessionRepository                                                      │
//! │  ├── load_line_items(&self, session_id, key)                            │
//! │  ├── save_line_items(&self, session_id, key, items)                     │
//! │  ├── remove(&self, session_id, key)                                     │
//! │  └── purge_idle(&self, max_idle)                                        │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`session::SessionRepository`] - Per-session key/value data

pub mod session;
