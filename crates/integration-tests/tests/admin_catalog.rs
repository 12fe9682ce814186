//! Integration tests for the admin catalog surface and its cascades.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p heartwood-api)
//! - Admin credentials in `HEARTWOOD_TEST_ADMIN_EMAIL` / `_PASSWORD`
//!
//! Run with: cargo test -p heartwood-integration-tests -- --ignored

use heartwood_integration_tests::{
    admin_session, base_url, client, product_form, seed_catalog, signup, theme_form, unique_email,
};
use reqwest::StatusCode;
use serde_json::Value;
use uuid::Uuid;

const PASSWORD: &str = "integration-pass-1";

// ============================================================================
// Access control
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_admin_surface_is_role_gated() {
    let client = client();
    let base = base_url();

    // No token at all
    let resp = client
        .get(format!("{base}/api/admin/themes"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // A plain user token is forbidden, not unauthorized
    let user = signup(&client, "it-gate", &unique_email("gate"), PASSWORD).await;
    let resp = user
        .auth(client.get(format!("{base}/api/admin/themes")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

// ============================================================================
// Theme validation
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and admin credentials"]
async fn test_theme_create_validation() {
    let client = client();
    let base = base_url();
    let admin = admin_session(&client).await;

    // Missing name
    let form = reqwest::multipart::Form::new().text("color", "#112233");
    let resp = admin
        .auth(client.post(format!("{base}/api/admin/themes")))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Name & color are required");

    // Missing image file
    let form = reqwest::multipart::Form::new()
        .text("name", format!("it-nofile-{}", Uuid::new_v4()))
        .text("color", "#112233");
    let resp = admin
        .auth(client.post(format!("{base}/api/admin/themes")))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Theme image file is required");
}

#[tokio::test]
#[ignore = "Requires running API server and admin credentials"]
async fn test_theme_name_conflict() {
    let client = client();
    let base = base_url();
    let admin = admin_session(&client).await;
    let name = format!("it-conflict-{}", Uuid::new_v4());

    let resp = admin
        .auth(client.post(format!("{base}/api/admin/themes")))
        .multipart(theme_form(&name, "#101010"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = admin
        .auth(client.post(format!("{base}/api/admin/themes")))
        .multipart(theme_form(&name, "#202020"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Name already in use");
}

// ============================================================================
// Product images
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and admin credentials"]
async fn test_product_image_limits() {
    let client = client();
    let base = base_url();
    let admin = admin_session(&client).await;
    let (theme_id, category_id, _) = seed_catalog(&client, &admin, "10.00").await;

    // No images at all
    let form = product_form("it-noimg", "10.00", category_id, theme_id, 0);
    let resp = admin
        .auth(client.post(format!("{base}/api/admin/products")))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "At least one image is required");

    // Six images exceeds the cap
    let form = product_form("it-sixup", "10.00", category_id, theme_id, 6);
    let resp = admin
        .auth(client.post(format!("{base}/api/admin/products")))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "At most 5 images are allowed");
}

#[tokio::test]
#[ignore = "Requires running API server and admin credentials"]
async fn test_last_image_cannot_be_removed() {
    let client = client();
    let base = base_url();
    let admin = admin_session(&client).await;
    let (_, _, product_id) = seed_catalog(&client, &admin, "20.00").await;

    // Seeded product has two images; removing the first succeeds
    let resp = client
        .get(format!("{base}/api/products/{product_id}"))
        .send()
        .await
        .unwrap();
    let product: Value = resp.json().await.unwrap();
    let images: Vec<String> = product["images"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    assert_eq!(images.len(), 2);

    let first = images[0].rsplit('/').next().unwrap();
    let resp = admin
        .auth(client.delete(format!(
            "{base}/api/admin/products/{product_id}/images/{first}"
        )))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["images"].as_array().unwrap().len(), 1);

    // The survivor is protected
    let last = images[1].rsplit('/').next().unwrap();
    let resp = admin
        .auth(client.delete(format!(
            "{base}/api/admin/products/{product_id}/images/{last}"
        )))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Cannot remove the last image");
}

// ============================================================================
// Menu
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and admin credentials"]
async fn test_menu_filters_and_pagination() {
    let client = client();
    let base = base_url();
    let admin = admin_session(&client).await;
    let (theme_id, _, product_id) = seed_catalog(&client, &admin, "15.00").await;

    let resp = client
        .get(format!("{base}/api/menu?themeId={theme_id}&limit=5"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let menu: Value = resp.json().await.unwrap();

    assert_eq!(menu["pagination"]["perPage"], 5);
    assert_eq!(menu["pagination"]["currentPage"], 1);
    assert_eq!(menu["theme"]["id"].as_i64(), Some(theme_id));
    let products = menu["products"].as_array().unwrap();
    assert!(
        products.iter().any(|p| p["id"].as_i64() == Some(product_id)),
        "seeded product should appear under its theme"
    );
}

// ============================================================================
// Cascading deletes
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and admin credentials"]
async fn test_category_delete_cascades_to_products() {
    let client = client();
    let base = base_url();
    let admin = admin_session(&client).await;
    let (_, category_id, product_id) = seed_catalog(&client, &admin, "25.00").await;

    let resp = admin
        .auth(client.delete(format!("{base}/api/admin/categories/{category_id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Category, its products & images deleted");

    // The product went with it
    let resp = client
        .get(format!("{base}/api/products/{product_id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and admin credentials"]
async fn test_theme_delete_cascades_to_products() {
    let client = client();
    let base = base_url();
    let admin = admin_session(&client).await;
    let (theme_id, _, product_id) = seed_catalog(&client, &admin, "35.00").await;

    let resp = admin
        .auth(client.delete(format!("{base}/api/admin/themes/{theme_id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base}/api/products/{product_id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
