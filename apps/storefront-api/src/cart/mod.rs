//! Cart orchestration.

mod service;

pub use service::{CartError, CartResult, CartService, CartSettings};
