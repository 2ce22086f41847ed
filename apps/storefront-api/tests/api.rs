//! End-to-end tests driving the router in-process.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use storefront_api::cart::CartSettings;
use storefront_api::ports::{CatalogQuery, LookupError, ProductCatalog, ProductLookup};
use storefront_api::session::{MemorySessionStore, SessionCookieConfig};
use storefront_api::{router, AppState};
use storefront_core::{Product, ProductId};

// =============================================================================
// Fixtures
// =============================================================================

#[derive(Default)]
struct MockCatalog {
    products: Mutex<HashMap<ProductId, Product>>,
    lookups: AtomicUsize,
    down: Mutex<bool>,
}

impl MockCatalog {
    fn seeded() -> Arc<Self> {
        let catalog = MockCatalog::default();
        catalog.insert(1, "100.00", "electronics", "Portable Speaker");
        catalog.insert(2, "50.00", "jewelery", "Silver Ring");
        catalog.insert(3, "30.00", "men's clothing", "Cotton Shirt");
        Arc::new(catalog)
    }

    fn insert(&self, id: u32, price: &str, category: &str, title: &str) {
        let product = Product {
            id: ProductId::new(id),
            title: title.to_string(),
            price: price.parse().unwrap(),
            currency: "EUR".to_string(),
            description: format!("{} description", title),
            category: category.to_string(),
            image: format!("https://img.example/{}.png", id),
            rating: None,
        };
        self.products.lock().unwrap().insert(product.id, product);
    }

    fn delete(&self, id: u32) {
        self.products.lock().unwrap().remove(&ProductId::new(id));
    }

    fn set_down(&self, down: bool) {
        *self.down.lock().unwrap() = down;
    }

    fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn sorted(&self) -> Vec<Product> {
        let mut products: Vec<Product> = self.products.lock().unwrap().values().cloned().collect();
        products.sort_by_key(|p| p.id);
        products
    }
}

#[async_trait]
impl ProductLookup for MockCatalog {
    async fn get_product(&self, id: ProductId) -> Result<Product, LookupError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if *self.down.lock().unwrap() {
            return Err(LookupError::Transport("connection refused".into()));
        }
        self.products
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(LookupError::NotFound(id))
    }
}

#[async_trait]
impl ProductCatalog for MockCatalog {
    async fn list_products(&self, query: CatalogQuery) -> Result<Vec<Product>, LookupError> {
        if *self.down.lock().unwrap() {
            return Err(LookupError::Transport("connection refused".into()));
        }
        let mut products = self.sorted();
        if let Some(limit) = query.limit {
            products.truncate(limit as usize);
        }
        Ok(products)
    }

    async fn list_category(
        &self,
        category: &str,
        _query: CatalogQuery,
    ) -> Result<Vec<Product>, LookupError> {
        Ok(self
            .sorted()
            .into_iter()
            .filter(|p| p.category == category)
            .collect())
    }

    async fn list_categories(&self) -> Result<Vec<String>, LookupError> {
        Ok(vec![
            "electronics".into(),
            "jewelery".into(),
            "men's clothing".into(),
        ])
    }
}

fn app(catalog: Arc<MockCatalog>) -> Router {
    let state = AppState::new(
        catalog,
        Arc::new(MemorySessionStore::new()),
        CartSettings::default(),
        SessionCookieConfig::new("STOREFRONT_SESSION", 30),
    );
    router(state)
}

/// Client that carries the session cookie between requests.
struct TestClient {
    app: Router,
    cookie: Option<String>,
}

impl TestClient {
    fn new(app: Router) -> Self {
        TestClient { app, cookie: None }
    }

    async fn send(&mut self, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            self.cookie = Some(pair.to_string());
        }

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn get(&mut self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    async fn add(&mut self, product_id: u32, quantity: u32) -> (StatusCode, Value) {
        let body = json!({ "productId": product_id, "quantity": quantity }).to_string();
        self.send(Method::POST, "/api/cart/add", Some(&body)).await
    }
}

fn item_ids(cart: &Value) -> Vec<u64> {
    cart["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["productId"].as_u64().unwrap())
        .collect()
}

// =============================================================================
// Cart
// =============================================================================

#[tokio::test]
async fn test_first_request_issues_session_cookie() {
    let mut client = TestClient::new(app(MockCatalog::seeded()));

    let (status, body) = client.get("/api/cart").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Cart retrieved successfully");
    assert_eq!(body["data"]["items"], json!([]));
    assert_eq!(body["data"]["totals"]["hasDiscount"], false);
    assert!(client.cookie.as_deref().unwrap().starts_with("STOREFRONT_SESSION="));
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let catalog = MockCatalog::seeded();
    let app = app(catalog);
    let mut alice = TestClient::new(app.clone());
    let mut bob = TestClient::new(app);

    alice.add(1, 1).await;
    let (_, bob_cart) = bob.get("/api/cart").await;

    assert!(item_ids(&bob_cart).is_empty());
}

#[tokio::test]
async fn test_add_increments_and_prices_with_discount() {
    let mut client = TestClient::new(app(MockCatalog::seeded()));

    client.add(1, 1).await;
    let (status, body) = client.add(1, 1).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product added to cart successfully");
    let item = &body["data"]["items"][0];
    assert_eq!(item["quantity"], 2);
    assert_eq!(item["price"], json!(100.0));
    assert_eq!(item["totalPrice"], json!(200.0));

    let totals = &body["data"]["totals"];
    assert_eq!(totals["subtotal"], json!(200.0));
    assert_eq!(totals["discount"], json!(20.0));
    assert_eq!(totals["total"], json!(180.0));
    assert_eq!(totals["hasDiscount"], true);
    assert_eq!(totals["currency"], "EUR");
}

#[tokio::test]
async fn test_below_threshold_has_no_discount() {
    let mut client = TestClient::new(app(MockCatalog::seeded()));

    client.add(2, 2).await;
    let (_, body) = client.add(3, 1).await;

    let totals = &body["data"]["totals"];
    assert_eq!(totals["subtotal"], json!(130.0));
    assert_eq!(totals["discount"], json!(0.0));
    assert_eq!(totals["total"], json!(130.0));
    assert_eq!(totals["hasDiscount"], false);
}

#[tokio::test]
async fn test_items_keep_insertion_order() {
    let mut client = TestClient::new(app(MockCatalog::seeded()));

    client.add(3, 1).await;
    client.add(1, 1).await;
    let (_, body) = client.add(2, 1).await;

    assert_eq!(item_ids(&body), vec![3, 1, 2]);
}

#[tokio::test]
async fn test_stale_items_self_heal() {
    let catalog = MockCatalog::seeded();
    let mut client = TestClient::new(app(catalog.clone()));

    client.add(1, 1).await;
    client.add(2, 1).await;
    catalog.delete(2);

    let (status, first) = client.get("/api/cart").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item_ids(&first), vec![1]);

    let before = catalog.lookups();
    let (_, second) = client.get("/api/cart").await;
    assert_eq!(second, first);
    assert_eq!(catalog.lookups() - before, 1);
}

#[tokio::test]
async fn test_get_cart_is_idempotent() {
    let mut client = TestClient::new(app(MockCatalog::seeded()));

    client.add(1, 2).await;
    client.add(3, 1).await;

    let (_, first) = client.get("/api/cart").await;
    let (_, second) = client.get("/api/cart").await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_update_sets_quantity_and_zero_removes() {
    let mut client = TestClient::new(app(MockCatalog::seeded()));
    client.add(1, 1).await;
    client.add(2, 1).await;

    let (status, body) = client
        .send(Method::PUT, "/api/cart/item/2", Some(r#"{"quantity": 4}"#))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Cart item updated successfully");
    assert_eq!(body["data"]["items"][1]["quantity"], 4);

    let (status, body) = client
        .send(Method::PUT, "/api/cart/item/2", Some(r#"{"quantity": 0}"#))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item_ids(&body), vec![1]);
}

#[tokio::test]
async fn test_update_missing_item_is_not_found() {
    let mut client = TestClient::new(app(MockCatalog::seeded()));
    client.add(1, 1).await;

    let (status, body) = client
        .send(Method::PUT, "/api/cart/item/3", Some(r#"{"quantity": 2}"#))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Failed to update cart item");
    assert_eq!(body["error"], "Product 3 not found in cart");

    let (_, cart) = client.get("/api/cart").await;
    assert_eq!(item_ids(&cart), vec![1]);
}

#[tokio::test]
async fn test_remove_and_clear() {
    let mut client = TestClient::new(app(MockCatalog::seeded()));
    client.add(1, 1).await;
    client.add(2, 1).await;

    let (status, body) = client.send(Method::DELETE, "/api/cart/item/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item_ids(&body), vec![2]);

    // Absent item is a no-op
    let (status, body) = client.send(Method::DELETE, "/api/cart/item/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item_ids(&body), vec![2]);

    let (status, body) = client.send(Method::DELETE, "/api/cart/clear", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Cart cleared successfully");
    assert!(item_ids(&body).is_empty());
}

#[tokio::test]
async fn test_count_does_not_contact_catalog() {
    let catalog = MockCatalog::seeded();
    let mut client = TestClient::new(app(catalog.clone()));
    client.add(1, 2).await;
    client.add(2, 3).await;
    catalog.delete(1);

    let before = catalog.lookups();
    let (status, body) = client.get("/api/cart/count").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"], 5);
    assert_eq!(catalog.lookups(), before);
}

#[tokio::test]
async fn test_add_unknown_product_leaves_cart_untouched() {
    let mut client = TestClient::new(app(MockCatalog::seeded()));
    client.add(1, 1).await;

    let (status, body) = client.add(999, 1).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Failed to add product to cart");
    assert_eq!(body["error"], "Product not found: 999");

    let (_, count) = client.get("/api/cart/count").await;
    assert_eq!(count["data"]["count"], 1);
}

#[tokio::test]
async fn test_add_with_catalog_down_is_bad_gateway() {
    let catalog = MockCatalog::seeded();
    let mut client = TestClient::new(app(catalog.clone()));
    catalog.set_down(true);

    let (status, body) = client.add(1, 1).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_add_validation_errors() {
    let mut client = TestClient::new(app(MockCatalog::seeded()));

    let (status, body) = client
        .send(
            Method::POST,
            "/api/cart/add",
            Some(r#"{"productId": 0, "quantity": 100}"#),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Validation failed");
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0]["field"], "productId");
    assert_eq!(errors[1]["field"], "quantity");
    assert_eq!(errors[1]["value"], 100);
}

#[tokio::test]
async fn test_add_defaults_quantity_to_one() {
    let mut client = TestClient::new(app(MockCatalog::seeded()));

    let (status, body) = client
        .send(Method::POST, "/api/cart/add", Some(r#"{"productId": 3}"#))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"][0]["quantity"], 1);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let mut client = TestClient::new(app(MockCatalog::seeded()));

    let (status, body) = client
        .send(Method::POST, "/api/cart/add", Some("{not json"))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid JSON payload");
}

// =============================================================================
// Products
// =============================================================================

#[tokio::test]
async fn test_list_products_with_filters() {
    let mut client = TestClient::new(app(MockCatalog::seeded()));

    let (status, body) = client
        .get("/api/products?min_price=40&max_price=100&sort=desc")
        .await;

    assert_eq!(status, StatusCode::OK);
    let products = body["data"]["products"].as_array().unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(body["data"]["meta"]["total"], 2);
    assert_eq!(body["data"]["meta"]["sort"], "desc");
    assert_eq!(body["data"]["meta"]["filters"]["min_price"], json!(40.0));
}

#[tokio::test]
async fn test_search_products() {
    let mut client = TestClient::new(app(MockCatalog::seeded()));

    let (_, body) = client.get("/api/products?search=ring").await;

    let products = body["data"]["products"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["id"], 2);
}

#[tokio::test]
async fn test_get_product_and_not_found() {
    let mut client = TestClient::new(app(MockCatalog::seeded()));

    let (status, body) = client.get("/api/products/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Portable Speaker");

    let (status, body) = client.get("/api/products/42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");

    let (status, _) = client.get("/api/products/abc").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_categories_and_stats() {
    let mut client = TestClient::new(app(MockCatalog::seeded()));

    let (status, body) = client.get("/api/products/categories").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    let (status, body) = client.get("/api/products/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_products"], 3);
    assert_eq!(body["data"]["min_price"], json!(30.0));
    assert_eq!(body["data"]["max_price"], json!(100.0));
    assert_eq!(body["data"]["avg_price"], json!(60.0));
}

#[tokio::test]
async fn test_category_listing() {
    let mut client = TestClient::new(app(MockCatalog::seeded()));

    let (status, body) = client.get("/api/products/category/jewelery").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["meta"]["category"], "jewelery");
    assert_eq!(body["data"]["products"][0]["id"], 2);
}

#[tokio::test]
async fn test_catalog_down_is_bad_gateway() {
    let catalog = MockCatalog::seeded();
    let mut client = TestClient::new(app(catalog.clone()));
    catalog.set_down(true);

    let (status, body) = client.get("/api/products").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["message"], "Please try again later");
}

#[tokio::test]
async fn test_health() {
    let mut client = TestClient::new(app(MockCatalog::seeded()));

    let (status, body) = client.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok", "storage": "ok" }));
    assert!(client.cookie.is_none());
}
