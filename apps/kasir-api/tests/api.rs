//! End-to-end tests against the full router on an in-memory database.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use kasir_api::{build_router, ApiConfig, AppState};
use kasir_core::password::hash_password;
use kasir_db::{Database, DbConfig};

struct TestApp {
    router: Router,
    db: Database,
}

impl TestApp {
    async fn new() -> Self {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let hash = hash_password("password").unwrap();
        db.users()
            .insert("Admin", "admin@gmail.com", &hash)
            .await
            .unwrap();

        let config = ApiConfig {
            jwt_secret: "integration-test-secret".to_string(),
            ..ApiConfig::default()
        };
        let router = build_router(AppState::new(db.clone(), config));
        TestApp { router, db }
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["data"]["token"].as_str().unwrap().to_string()
    }

    async fn admin_token(&self) -> String {
        self.login("admin@gmail.com", "password").await
    }

    /// Creates a category and one product in it, returning the product id.
    async fn seed_product(&self, token: &str, barcode: &str, stock: i64) -> i64 {
        let (status, category) = self
            .send(
                Method::POST,
                "/api/categories",
                Some(token),
                Some(json!({
                    "name": format!("Kategori {barcode}"),
                    "description": "Minuman",
                    "image": "minuman.png"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{category}");

        let (status, product) = self
            .send(
                Method::POST,
                "/api/products",
                Some(token),
                Some(json!({
                    "category_id": category["data"]["id"],
                    "barcode": barcode,
                    "title": "Kopi Susu",
                    "description": "Kopi susu gula aren",
                    "buy_price": 8000,
                    "sell_price": 10000,
                    "stock": stock
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{product}");
        product["data"]["id"].as_i64().unwrap()
    }
}

#[tokio::test]
async fn test_login() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "email": "admin@gmail.com", "password": "password" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["success"], true);
    assert_eq!(body["data"]["user"]["email"], "admin@gmail.com");
    assert!(body["data"]["user"].get("password").is_none());

    let (status, body) = app
        .send(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "email": "admin@gmail.com", "password": "wrong" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["meta"]["success"], false);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "email": "nobody@gmail.com", "password": "password" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, body) = app
        .send(Method::POST, "/api/login", None, Some(json!({ "email": "" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_requires_token() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::GET, "/api/products", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, body) = app
        .send(Method::GET, "/api/products", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_TOKEN");

    // A bare token without the Bearer prefix is accepted too
    let token = app.admin_token().await;
    let request = Request::builder()
        .uri("/api/categories")
        .header(header::AUTHORIZATION, token)
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], true);
}

#[tokio::test]
async fn test_catalog_crud() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let product_id = app.seed_product(&token, "8991001", 5).await;

    let (status, body) = app
        .send(Method::GET, "/api/products?page=1&limit=5", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["sell_price"], 10000);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/product-by-barcode",
            Some(&token),
            Some(json!({ "barcode": "8991001" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], product_id);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/product-by-barcode",
            Some(&token),
            Some(json!({ "barcode": "0000" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let category_id = app.db.products().get_by_id(product_id).await.unwrap().unwrap().category_id;
    let (status, body) = app
        .send(
            Method::POST,
            "/api/products",
            Some(&token),
            Some(json!({
                "category_id": category_id,
                "barcode": "8991001",
                "title": "Duplikat",
                "description": "Barcode sudah dipakai",
                "buy_price": 1000,
                "sell_price": 2000,
                "stock": 1
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/products",
            Some(&token),
            Some(json!({
                "category_id": category_id,
                "barcode": "8991002",
                "title": "Kopi Emas",
                "description": "Harga di luar batas",
                "buy_price": 1000,
                "sell_price": 50_000_000_000_000_000_i64,
                "stock": 1
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/products-by-category/{}", category_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], product_id);

    // The category still has a product
    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/api/categories/{}", category_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .send(Method::GET, "/api/products/abc", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(Method::GET, "/api/products/9999", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cart_and_checkout() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let product_id = app.seed_product(&token, "8991002", 5).await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/carts",
            Some(&token),
            Some(json!({ "product_id": product_id, "qty": 2 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["price"], 20000);

    let (status, body) = app.send(Method::GET, "/api/carts", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["carts"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["total_price"], 20000);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/transactions",
            Some(&token),
            Some(json!({
                "cash": 50000,
                "discount": 0,
                "change": 30000,
                "grand_total": 20000
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let invoice = body["data"]["invoice"].as_str().unwrap().to_string();
    assert!(invoice.starts_with("INV-"));

    let product = app.db.products().get_by_id(product_id).await.unwrap().unwrap();
    assert_eq!(product.stock, 3);

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/transactions?invoice={}", invoice),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["invoice"], invoice.as_str());
    assert_eq!(body["data"]["cashier_name"], "Admin");
    assert_eq!(body["data"]["details"][0]["qty"], 2);

    // The cart was consumed
    let (status, body) = app
        .send(
            Method::POST,
            "/api/transactions",
            Some(&token),
            Some(json!({ "cash": 1, "change": 0, "grand_total": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "EMPTY_CART");

    let (status, _) = app
        .send(Method::GET, "/api/transactions", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(
            Method::GET,
            "/api/transactions?invoice=INV-1-1",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_checkout_rejects_bad_amounts() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/transactions",
            Some(&token),
            Some(json!({ "cash": "abc", "change": 0, "grand_total": 0 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_cart_lines_are_private() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let product_id = app.seed_product(&admin, "8991003", 10).await;

    let (status, _) = app
        .send(
            Method::POST,
            "/api/users",
            Some(&admin),
            Some(json!({
                "name": "Kasir Dua",
                "email": "kasir2@gmail.com",
                "password": "Rahasia1!"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let other = app.login("kasir2@gmail.com", "Rahasia1!").await;

    let (_, body) = app
        .send(
            Method::POST,
            "/api/carts",
            Some(&admin),
            Some(json!({ "product_id": product_id, "qty": 1 })),
        )
        .await;
    let line_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = app.send(Method::GET, "/api/carts", Some(&other), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["carts"].as_array().unwrap().is_empty());

    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/api/carts/{}", line_id),
            Some(&other),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/api/carts/{}", line_id),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_cart_limits() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let product_id = app.seed_product(&token, "8991004", 5).await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/carts",
            Some(&token),
            Some(json!({ "product_id": product_id, "qty": 0 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = app
        .send(
            Method::POST,
            "/api/carts",
            Some(&token),
            Some(json!({ "product_id": 9999, "qty": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reports() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let (status, body) = app
        .send(Method::GET, "/api/dashboard", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["transactions_today"], 0);
    assert_eq!(body["data"]["revenue_today"], 0);

    let (status, body) = app
        .send(
            Method::GET,
            "/api/sales?start_date=2024-01-01&end_date=2024-01-31",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (status, body) = app
        .send(
            Method::GET,
            "/api/profits?start_date=2024-02-30&end_date=2024-03-01",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}
