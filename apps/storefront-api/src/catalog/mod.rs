//! Product catalog: the FakeStore adapter and the product service.

mod fakestore;
mod service;

pub use fakestore::FakeStoreClient;
pub use service::{ListParams, ProductService};
