//! Integration tests for order placement and cancellation.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p heartwood-api)
//! - Admin credentials in `HEARTWOOD_TEST_ADMIN_EMAIL` / `_PASSWORD`
//!
//! Run with: cargo test -p heartwood-integration-tests -- --ignored

use heartwood_core::OrderStatus;
use heartwood_integration_tests::{
    admin_session, base_url, client, seed_catalog, signup, unique_email,
};
use reqwest::StatusCode;
use serde_json::{Value, json};

const PASSWORD: &str = "integration-pass-1";

fn order_body(product_id: i64, quantity: u32) -> Value {
    json!({
        "items": [{ "productId": product_id, "quantity": quantity }],
        "address": {
            "street": "Storgatan 1",
            "city": "Uppsala",
            "zip": "75310",
            "country": "Sweden",
        },
        "paymentMethod": "cod",
    })
}

#[tokio::test]
#[ignore = "Requires running API server and admin credentials"]
async fn test_order_total_is_server_priced() {
    let client = client();
    let base = base_url();
    let admin = admin_session(&client).await;
    let (_, _, product_id) = seed_catalog(&client, &admin, "249.99").await;

    let user = signup(&client, "it-order", &unique_email("order"), PASSWORD).await;

    let resp = user
        .auth(client.post(format!("{base}/api/orders")))
        .json(&order_body(product_id, 2))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let order: Value = resp.json().await.unwrap();

    // Total comes from the catalog price, never from the client
    assert_eq!(order["totalPrice"], "499.98");
    let status: OrderStatus = order["status"].as_str().unwrap().parse().unwrap();
    assert_eq!(status, OrderStatus::Pending);

    // Items are snapshots carrying name and unit price
    let items = order["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["price"], "249.99");
    assert_eq!(items[0]["quantity"], 2);
}

#[tokio::test]
#[ignore = "Requires running API server and admin credentials"]
async fn test_unknown_product_fails_whole_order() {
    let client = client();
    let base = base_url();
    let admin = admin_session(&client).await;
    let (_, _, product_id) = seed_catalog(&client, &admin, "100.00").await;

    let user = signup(&client, "it-atomic", &unique_email("atomic"), PASSWORD).await;

    let resp = user
        .auth(client.post(format!("{base}/api/orders")))
        .json(&json!({
            "items": [
                { "productId": product_id, "quantity": 1 },
                { "productId": 999_999_999, "quantity": 1 },
            ],
            "address": { "street": "Storgatan 1", "city": "Uppsala", "country": "Sweden" },
            "paymentMethod": "card",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Some products were not found");

    // Nothing was persisted for the valid line either
    let resp = user
        .auth(client.get(format!("{base}/api/users/profile")))
        .send()
        .await
        .unwrap();
    let profile: Value = resp.json().await.unwrap();
    assert!(profile["orders"].as_array().unwrap().is_empty());
}

#[tokio::test]
#[ignore = "Requires running API server and admin credentials"]
async fn test_order_validation_messages() {
    let client = client();
    let base = base_url();
    let admin = admin_session(&client).await;
    let (_, _, product_id) = seed_catalog(&client, &admin, "10.00").await;

    let user = signup(&client, "it-valid", &unique_email("valid"), PASSWORD).await;

    // Empty cart
    let resp = user
        .auth(client.post(format!("{base}/api/orders")))
        .json(&json!({
            "items": [],
            "address": { "street": "A", "city": "B", "country": "C" },
            "paymentMethod": "cod",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Order must contain at least one item");

    // Incomplete address
    let resp = user
        .auth(client.post(format!("{base}/api/orders")))
        .json(&json!({
            "items": [{ "productId": product_id, "quantity": 1 }],
            "address": { "city": "Uppsala" },
            "paymentMethod": "cod",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Missing payment method
    let resp = user
        .auth(client.post(format!("{base}/api/orders")))
        .json(&json!({
            "items": [{ "productId": product_id, "quantity": 1 }],
            "address": { "street": "A", "city": "B", "country": "C" },
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Payment method is required");
}

#[tokio::test]
#[ignore = "Requires running API server and admin credentials"]
async fn test_cancel_only_while_pending() {
    let client = client();
    let base = base_url();
    let admin = admin_session(&client).await;
    let (_, _, product_id) = seed_catalog(&client, &admin, "50.00").await;

    let user = signup(&client, "it-cancel", &unique_email("cancel"), PASSWORD).await;

    let resp = user
        .auth(client.post(format!("{base}/api/orders")))
        .json(&order_body(product_id, 1))
        .send()
        .await
        .unwrap();
    let order: Value = resp.json().await.unwrap();
    let order_id = order["id"].as_i64().unwrap();

    // Pending orders cancel fine
    let resp = user
        .auth(client.patch(format!("{base}/api/users/orders/{order_id}/cancel")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Order cancelled");

    // A second cancel fails with the same message as a foreign order would
    let resp = user
        .auth(client.patch(format!("{base}/api/users/orders/{order_id}/cancel")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Order not found or cannot be cancelled");
}

#[tokio::test]
#[ignore = "Requires running API server and admin credentials"]
async fn test_shipped_order_cannot_be_cancelled() {
    let client = client();
    let base = base_url();
    let admin = admin_session(&client).await;
    let (_, _, product_id) = seed_catalog(&client, &admin, "75.00").await;

    let user = signup(&client, "it-shipped", &unique_email("shipped"), PASSWORD).await;

    let resp = user
        .auth(client.post(format!("{base}/api/orders")))
        .json(&order_body(product_id, 1))
        .send()
        .await
        .unwrap();
    let order: Value = resp.json().await.unwrap();
    let order_id = order["id"].as_i64().unwrap();

    // Admin moves the order to shipped
    let resp = admin
        .auth(client.patch(format!("{base}/api/admin/orders/{order_id}/status")))
        .json(&json!({ "status": "shipped" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // The owner can no longer cancel it
    let resp = user
        .auth(client.patch(format!("{base}/api/users/orders/{order_id}/cancel")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running API server and admin credentials"]
async fn test_cancel_is_scoped_to_owner() {
    let client = client();
    let base = base_url();
    let admin = admin_session(&client).await;
    let (_, _, product_id) = seed_catalog(&client, &admin, "30.00").await;

    let owner = signup(&client, "it-owner", &unique_email("owner"), PASSWORD).await;
    let other = signup(&client, "it-other", &unique_email("other"), PASSWORD).await;

    let resp = owner
        .auth(client.post(format!("{base}/api/orders")))
        .json(&order_body(product_id, 1))
        .send()
        .await
        .unwrap();
    let order: Value = resp.json().await.unwrap();
    let order_id = order["id"].as_i64().unwrap();

    let resp = other
        .auth(client.patch(format!("{base}/api/users/orders/{order_id}/cancel")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Still pending for the owner
    let resp = owner
        .auth(client.get(format!("{base}/api/users/profile")))
        .send()
        .await
        .unwrap();
    let profile: Value = resp.json().await.unwrap();
    let orders = profile["orders"].as_array().unwrap();
    assert_eq!(orders[0]["status"], "pending");
}
