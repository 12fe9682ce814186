//! Integration tests for admin user and order management.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p heartwood-api)
//! - Admin credentials in `HEARTWOOD_TEST_ADMIN_EMAIL` / `_PASSWORD`
//!
//! Run with: cargo test -p heartwood-integration-tests -- --ignored

use heartwood_integration_tests::{
    admin_session, base_url, client, login, seed_catalog, signup, unique_email,
};
use reqwest::StatusCode;
use serde_json::{Value, json};

const PASSWORD: &str = "integration-pass-1";

// ============================================================================
// Self-guards
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and admin credentials"]
async fn test_admin_cannot_delete_own_account() {
    let client = client();
    let base = base_url();
    let admin = admin_session(&client).await;
    let admin_id = admin.user_id();

    let resp = admin
        .auth(client.delete(format!("{base}/api/admin/users/{admin_id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "You cannot delete your own admin account");
}

#[tokio::test]
#[ignore = "Requires running API server and admin credentials"]
async fn test_admin_cannot_change_own_role() {
    let client = client();
    let base = base_url();
    let admin = admin_session(&client).await;
    let admin_id = admin.user_id();

    let resp = admin
        .auth(client.patch(format!("{base}/api/admin/users/{admin_id}/role")))
        .json(&json!({ "role": "user" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "You cannot change your own admin role");
}

// ============================================================================
// Role management
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and admin credentials"]
async fn test_set_role_round_trip() {
    let client = client();
    let base = base_url();
    let admin = admin_session(&client).await;
    let user = signup(&client, "it-promote", &unique_email("promote"), PASSWORD).await;
    let user_id = user.user_id();

    // Invalid role string
    let resp = admin
        .auth(client.patch(format!("{base}/api/admin/users/{user_id}/role")))
        .json(&json!({ "role": "supreme_leader" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Invalid role");

    // Promote then demote
    let resp = admin
        .auth(client.patch(format!("{base}/api/admin/users/{user_id}/role")))
        .json(&json!({ "role": "admin" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["role"], "admin");

    let resp = admin
        .auth(client.patch(format!("{base}/api/admin/users/{user_id}/role")))
        .json(&json!({ "role": "user" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["role"], "user");
}

// ============================================================================
// User deletion
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and admin credentials"]
async fn test_delete_user_removes_account_and_orders() {
    let client = client();
    let base = base_url();
    let admin = admin_session(&client).await;
    let (_, _, product_id) = seed_catalog(&client, &admin, "60.00").await;

    let email = unique_email("doomed");
    let user = signup(&client, "it-doomed", &email, PASSWORD).await;
    let user_id = user.user_id();

    // The user leaves an order behind
    let resp = user
        .auth(client.post(format!("{base}/api/orders")))
        .json(&json!({
            "items": [{ "productId": product_id, "quantity": 1 }],
            "address": { "street": "Storgatan 1", "city": "Uppsala", "country": "Sweden" },
            "paymentMethod": "cod",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let order: Value = resp.json().await.unwrap();
    let order_id = order["id"].as_i64().unwrap();

    let resp = admin
        .auth(client.delete(format!("{base}/api/admin/users/{user_id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "User and related orders/images deleted");

    // The account is gone
    let resp = client
        .post(format!("{base}/api/auth/login"))
        .json(&json!({ "email": email, "password": PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // And so is the order
    let orders: Vec<Value> = admin
        .auth(client.get(format!("{base}/api/admin/orders")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(orders.iter().all(|o| o["id"].as_i64() != Some(order_id)));
}

// ============================================================================
// Order management
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and admin credentials"]
async fn test_admin_order_listing_and_status() {
    let client = client();
    let base = base_url();
    let admin = admin_session(&client).await;
    let (_, _, product_id) = seed_catalog(&client, &admin, "45.00").await;

    let email = unique_email("listed");
    let user = signup(&client, "it-listed", &email, PASSWORD).await;

    let resp = user
        .auth(client.post(format!("{base}/api/orders")))
        .json(&json!({
            "items": [{ "productId": product_id, "quantity": 1 }],
            "address": { "street": "Storgatan 1", "city": "Uppsala", "country": "Sweden" },
            "paymentMethod": "paypal",
        }))
        .send()
        .await
        .unwrap();
    let order: Value = resp.json().await.unwrap();
    let order_id = order["id"].as_i64().unwrap();

    // Listing resolves the owning user to an object
    let orders: Vec<Value> = admin
        .auth(client.get(format!("{base}/api/admin/orders")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let listed = orders
        .iter()
        .find(|o| o["id"].as_i64() == Some(order_id))
        .expect("new order in admin listing");
    assert_eq!(listed["user"]["email"], email.as_str());

    // Invalid status string
    let resp = admin
        .auth(client.patch(format!("{base}/api/admin/orders/{order_id}/status")))
        .json(&json!({ "status": "teleported" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Invalid status");

    // Valid transition
    let resp = admin
        .auth(client.patch(format!("{base}/api/admin/orders/{order_id}/status")))
        .json(&json!({ "status": "delivered" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "delivered");

    // Delete, then a second delete is a 404
    let resp = admin
        .auth(client.delete(format!("{base}/api/admin/orders/{order_id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = admin
        .auth(client.delete(format!("{base}/api/admin/orders/{order_id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Order not found");
}

// ============================================================================
// Listing
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and admin credentials"]
async fn test_admin_user_listing_has_no_password_material() {
    let client = client();
    let base = base_url();
    let admin = admin_session(&client).await;
    let email = unique_email("listing");
    signup(&client, "it-listing", &email, PASSWORD).await;

    let users: Vec<Value> = admin
        .auth(client.get(format!("{base}/api/admin/users")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let listed = users
        .iter()
        .find(|u| u["email"] == email.as_str())
        .expect("new user in admin listing");
    assert!(listed.get("passwordHash").is_none());
    assert!(listed.get("password").is_none());

    // Re-login still works after being listed (sanity that listing is read-only)
    login(&client, &email, PASSWORD).await;
}
