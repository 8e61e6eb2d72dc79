//! Integration tests for the storefront HTTP API.
//!
//! These tests require a running storefront server pointed at a throwaway
//! data directory:
//!
//! ```bash
//! STOREFRONT_DATA_DIR=$(mktemp -d) cargo run -p gift-grove-storefront
//! ```
//!
//! Run with: cargo test -p gift-grove-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

/// Base URL for the storefront (configurable via environment).
fn base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Admin password the server was started with.
fn admin_password() -> String {
    std::env::var("STOREFRONT_ADMIN_PASSWORD").expect("STOREFRONT_ADMIN_PASSWORD must be set")
}

/// A cookie-holding client.
fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Test helper: log the client in as the seeded admin.
async fn login_as_admin(client: &Client) {
    let resp = client
        .post(format!("{}/api/auth/login", base_url()))
        .json(&json!({"username": "admin", "password": admin_password()}))
        .send()
        .await
        .expect("Failed to log in as admin");
    assert_eq!(resp.status(), StatusCode::OK);
}

/// Test helper: register a fresh user and stay logged in.
async fn register_fresh_user(client: &Client) -> String {
    let username = format!("user-{}", uuid::Uuid::new_v4().simple());
    let resp = client
        .post(format!("{}/api/auth/register", base_url()))
        .json(&json!({"username": username, "password": "integration-test-pw"}))
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(resp.status(), StatusCode::CREATED);
    username
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_health_endpoints() {
    let client = client();

    let resp = client.get(format!("{}/health", base_url())).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{}/health/ready", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

// ============================================================================
// Auth
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_register_login_me_flow() {
    let client = client();
    let username = register_fresh_user(&client).await;

    let me: Value = client
        .get(format!("{}/api/auth/me", base_url()))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(me["username"], Value::String(username.clone()));
    assert_eq!(me["is_admin"], Value::Bool(false));

    // Logout drops the session
    let resp = client
        .post(format!("{}/api/auth/logout", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .get(format!("{}/api/auth/me", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_wrong_password_is_unauthorized() {
    let client = client();
    let resp = client
        .post(format!("{}/api/auth/login", base_url()))
        .json(&json!({"username": "admin", "password": "definitely-wrong"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Products & ratings
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_product_crud_requires_admin() {
    let anon = client();

    // Anonymous create is rejected
    let resp = anon
        .post(format!("{}/api/products", base_url()))
        .json(&json!({
            "name": "Mug",
            "price": "12.50",
            "affiliate_link": "https://shop.example.com/mug",
            "category": "kitchen"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Admin create works and stores cents
    let admin = client();
    login_as_admin(&admin).await;

    let product: Value = admin
        .post(format!("{}/api/products", base_url()))
        .json(&json!({
            "name": "Integration Mug",
            "description": "Created by the API test",
            "price": "12.50",
            "affiliate_link": "https://shop.example.com/mug",
            "category": "kitchen"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(product["price"], json!(1250));
    let id = product["id"].as_i64().unwrap();

    // Rate it 5 then 3 as one user: one rating, average 3.0
    let rater = client();
    register_fresh_user(&rater).await;
    for stars in [5, 3] {
        let resp = rater
            .post(format!("{}/api/products/{id}/rate", base_url()))
            .json(&json!({"rating": stars}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let rated: Value = anon
        .get(format!("{}/api/products/{id}", base_url()))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(rated["average_rating"], json!(3.0));
    assert_eq!(rated["rating_count"], json!(1));

    // Admin cleanup cascades
    let resp = admin
        .delete(format!("{}/api/products/{id}", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = anon
        .get(format!("{}/api/products/{id}", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Giveaway
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_giveaway_window_rejects_sixth_entry() {
    let client = client();

    let submit = |n: u32| {
        let client = client.clone();
        async move {
            client
                .post(format!("{}/api/giveaway", base_url()))
                .json(&json!({
                    "email": format!("fan+{n}@example.com"),
                    "order_id": format!("112-5551234-{n:04}"),
                    "product_link": "https://shop.example.com/mug"
                }))
                .send()
                .await
                .unwrap()
                .status()
        }
    };

    for n in 0..5 {
        assert_eq!(submit(n).await, StatusCode::CREATED);
    }
    assert_eq!(submit(5).await, StatusCode::TOO_MANY_REQUESTS);
}

// ============================================================================
// Recommendations
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_recommend_always_answers() {
    let client = client();

    // Whether or not the advisor is reachable, the endpoint answers 200
    // with either a real suggestion or the fallback.
    let body: Value = client
        .post(format!("{}/api/recommend/chat", base_url()))
        .json(&json!({"message": "a birthday gift for my sister who hikes"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(body["suggestion"].as_str().is_some_and(|s| !s.is_empty()));
    assert!(body["fallback"].is_boolean());
}
