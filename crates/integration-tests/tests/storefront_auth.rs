//! Integration tests for signup, login and account self-service.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p heartwood-api)
//!
//! Run with: cargo test -p heartwood-integration-tests -- --ignored

use heartwood_integration_tests::{base_url, client, login, signup, unique_email};
use reqwest::StatusCode;
use serde_json::{Value, json};

const PASSWORD: &str = "integration-pass-1";

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_health_endpoints() {
    let client = client();
    let base = base_url();

    let resp = client.get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");

    let resp = client
        .get(format!("{base}/health/ready"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

// ============================================================================
// Signup & Login
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_signup_then_login() {
    let client = client();
    let email = unique_email("signup");

    let session = signup(&client, "it-user", &email, PASSWORD).await;
    assert_eq!(session.user["email"], email.as_str());
    assert_eq!(session.user["role"], "user");

    // The signup token is immediately usable
    let resp = session
        .auth(client.get(format!("{}/api/users/me", base_url())))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // And a fresh login works with the same credentials
    let relogin = login(&client, &email, PASSWORD).await;
    assert_eq!(relogin.user_id(), session.user_id());
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_duplicate_email_rejected() {
    let client = client();
    let email = unique_email("dup");

    signup(&client, "it-dup-a", &email, PASSWORD).await;

    let resp = client
        .post(format!("{}/api/auth/signup", base_url()))
        .json(&json!({ "username": "it-dup-b", "email": email, "password": PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Username or email already in use");
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_login_wrong_password() {
    let client = client();
    let email = unique_email("badpw");
    signup(&client, "it-badpw", &email, PASSWORD).await;

    let resp = client
        .post(format!("{}/api/auth/login", base_url()))
        .json(&json!({ "email": email, "password": "not-the-password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.unwrap();
    // Same message as an unknown email, so the response does not leak
    // which accounts exist
    assert_eq!(body["message"], "Invalid email or password");
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_me_requires_token() {
    let client = client();
    let resp = client
        .get(format!("{}/api/users/me", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Profile self-service
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_phone_update() {
    let client = client();
    let base = base_url();
    let session = signup(&client, "it-phone", &unique_email("phone"), PASSWORD).await;

    let resp = session
        .auth(client.patch(format!("{base}/api/users/phone")))
        .json(&json!({ "phone": "+46 70 123 45 67" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["phone"], "+46 70 123 45 67");

    // Empty phone is rejected
    let resp = session
        .auth(client.patch(format!("{base}/api/users/phone")))
        .json(&json!({ "phone": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_change_password_flow() {
    let client = client();
    let base = base_url();
    let email = unique_email("chpw");
    let session = signup(&client, "it-chpw", &email, PASSWORD).await;

    // Wrong old password
    let resp = session
        .auth(client.patch(format!("{base}/api/users/password")))
        .json(&json!({ "oldPassword": "wrong", "newPassword": "new-pass-123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Old password is incorrect");

    // Correct old password
    let resp = session
        .auth(client.patch(format!("{base}/api/users/password")))
        .json(&json!({ "oldPassword": PASSWORD, "newPassword": "new-pass-123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Old credentials no longer work, new ones do
    let resp = client
        .post(format!("{base}/api/auth/login"))
        .json(&json!({ "email": email, "password": PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    login(&client, &email, "new-pass-123").await;
}

// ============================================================================
// Address book
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_address_book_crud() {
    let client = client();
    let base = base_url();
    let session = signup(&client, "it-addr", &unique_email("addr"), PASSWORD).await;

    // Missing street is rejected
    let resp = session
        .auth(client.post(format!("{base}/api/users/addresses")))
        .json(&json!({ "city": "Uppsala", "country": "Sweden" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Add returns the full address list
    let resp = session
        .auth(client.post(format!("{base}/api/users/addresses")))
        .json(&json!({
            "street": "Storgatan 1",
            "city": "Uppsala",
            "zip": "75310",
            "country": "Sweden",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let addresses: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(addresses.len(), 1);
    // Title defaults when omitted
    assert_eq!(addresses[0]["title"], "Home");
    let address_id = addresses[0]["id"].as_i64().unwrap();

    // Partial update keeps the other fields
    let resp = session
        .auth(client.put(format!("{base}/api/users/addresses/{address_id}")))
        .json(&json!({ "title": "Office" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let addresses: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(addresses[0]["title"], "Office");
    assert_eq!(addresses[0]["street"], "Storgatan 1");

    // Delete returns the remaining list
    let resp = session
        .auth(client.delete(format!("{base}/api/users/addresses/{address_id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let addresses: Vec<Value> = resp.json().await.unwrap();
    assert!(addresses.is_empty());

    // A second delete is a 404
    let resp = session
        .auth(client.delete(format!("{base}/api/users/addresses/{address_id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_addresses_are_scoped_to_owner() {
    let client = client();
    let base = base_url();
    let alice = signup(&client, "it-alice", &unique_email("alice"), PASSWORD).await;
    let bob = signup(&client, "it-bob", &unique_email("bob"), PASSWORD).await;

    let resp = alice
        .auth(client.post(format!("{base}/api/users/addresses")))
        .json(&json!({ "street": "Kungsgatan 2", "city": "Stockholm", "country": "Sweden" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let addresses: Vec<Value> = resp.json().await.unwrap();
    let address_id = addresses[0]["id"].as_i64().unwrap();

    // Bob cannot touch Alice's address
    let resp = bob
        .auth(client.delete(format!("{base}/api/users/addresses/{address_id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
