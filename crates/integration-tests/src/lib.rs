//! Integration test helpers for Heartwood.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p heartwood-cli -- migrate
//!
//! # Bootstrap an admin account for the admin suites
//! cargo run -p heartwood-cli -- admin create \
//!     -u admin -e admin@example.com -p 'integration-admin'
//!
//! # Start the API server
//! cargo run -p heartwood-api
//!
//! # Run integration tests (ignored by default)
//! cargo test -p heartwood-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `HEARTWOOD_API_URL` - Base URL of the running API (default `http://localhost:5000`)
//! - `HEARTWOOD_TEST_ADMIN_EMAIL` / `HEARTWOOD_TEST_ADMIN_PASSWORD` - Admin
//!   credentials for the admin suites

use reqwest::{Client, RequestBuilder};
use serde_json::{Value, json};
use uuid::Uuid;

/// A 1x1 transparent PNG, enough to exercise the upload paths.
pub const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x62, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// Base URL of the API under test.
#[must_use]
pub fn base_url() -> String {
    std::env::var("HEARTWOOD_API_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
}

/// Fresh HTTP client.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Unique email so test runs never collide.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@example.com", Uuid::new_v4())
}

/// A logged-in account: bearer token plus the user object from the session
/// response.
pub struct Session {
    pub token: String,
    pub user: Value,
}

impl Session {
    /// Attach this session's bearer token to a request.
    pub fn auth(&self, req: RequestBuilder) -> RequestBuilder {
        req.bearer_auth(&self.token)
    }

    #[must_use]
    pub fn user_id(&self) -> i64 {
        self.user["id"].as_i64().expect("session user id")
    }
}

/// Sign up a fresh account and return its session.
pub async fn signup(client: &Client, username: &str, email: &str, password: &str) -> Session {
    let resp = client
        .post(format!("{}/api/auth/signup", base_url()))
        .json(&json!({
            "username": username,
            "email": email,
            "password": password,
        }))
        .send()
        .await
        .expect("signup request failed");

    assert_eq!(resp.status(), 201, "signup should return 201 Created");
    session_from(resp.json().await.expect("signup body"))
}

/// Log in and return the session.
pub async fn login(client: &Client, email: &str, password: &str) -> Session {
    let resp = client
        .post(format!("{}/api/auth/login", base_url()))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("login request failed");

    assert_eq!(resp.status(), 200, "login should return 200 OK");
    session_from(resp.json().await.expect("login body"))
}

/// Log in with the admin credentials from the environment.
///
/// Panics with setup instructions when the variables are unset, so a
/// misconfigured run fails loudly instead of silently passing.
pub async fn admin_session(client: &Client) -> Session {
    let email = std::env::var("HEARTWOOD_TEST_ADMIN_EMAIL")
        .expect("Set HEARTWOOD_TEST_ADMIN_EMAIL (bootstrap via `hw-cli admin create`)");
    let password = std::env::var("HEARTWOOD_TEST_ADMIN_PASSWORD")
        .expect("Set HEARTWOOD_TEST_ADMIN_PASSWORD (bootstrap via `hw-cli admin create`)");
    let session = login(client, &email, &password).await;
    assert_eq!(
        session.user["role"], "admin",
        "configured test account must have the admin role"
    );
    session
}

fn session_from(body: Value) -> Session {
    Session {
        token: body["token"].as_str().expect("session token").to_string(),
        user: body["user"].clone(),
    }
}

/// Multipart form for a theme with one image file.
#[must_use]
pub fn theme_form(name: &str, color: &str) -> reqwest::multipart::Form {
    reqwest::multipart::Form::new()
        .text("name", name.to_string())
        .text("description", "Integration test theme")
        .text("color", color.to_string())
        .part(
            "theme",
            reqwest::multipart::Part::bytes(TINY_PNG.to_vec())
                .file_name("theme.png")
                .mime_str("image/png")
                .expect("valid mime"),
        )
}

/// Multipart form for a category with one icon file.
#[must_use]
pub fn category_form(name: &str) -> reqwest::multipart::Form {
    reqwest::multipart::Form::new()
        .text("name", name.to_string())
        .text("description", "Integration test category")
        .part(
            "icon",
            reqwest::multipart::Part::bytes(TINY_PNG.to_vec())
                .file_name("icon.png")
                .mime_str("image/png")
                .expect("valid mime"),
        )
}

/// Multipart form for a product with `image_count` uploaded images.
#[must_use]
pub fn product_form(
    name: &str,
    price: &str,
    category_id: i64,
    theme_id: i64,
    image_count: usize,
) -> reqwest::multipart::Form {
    let mut form = reqwest::multipart::Form::new()
        .text("name", name.to_string())
        .text("description", "Integration test product")
        .text("price", price.to_string())
        .text("category", category_id.to_string())
        .text("theme", theme_id.to_string())
        .text("dimensions", r#"{"width":40.0,"height":90.0,"depth":45.0}"#);
    for i in 0..image_count {
        form = form.part(
            "images",
            reqwest::multipart::Part::bytes(TINY_PNG.to_vec())
                .file_name(format!("product-{i}.png"))
                .mime_str("image/png")
                .expect("valid mime"),
        );
    }
    form
}

/// Create a theme, category and product via the admin API and return
/// `(theme_id, category_id, product_id)`.
pub async fn seed_catalog(client: &Client, admin: &Session, price: &str) -> (i64, i64, i64) {
    let base = base_url();
    let tag = Uuid::new_v4();

    let resp = admin
        .auth(client.post(format!("{base}/api/admin/themes")))
        .multipart(theme_form(&format!("it-theme-{tag}"), "#8B5E3C"))
        .send()
        .await
        .expect("create theme");
    assert_eq!(resp.status(), 201);
    let theme: Value = resp.json().await.expect("theme body");
    let theme_id = theme["id"].as_i64().expect("theme id");

    let resp = admin
        .auth(client.post(format!("{base}/api/admin/categories")))
        .multipart(category_form(&format!("it-category-{tag}")))
        .send()
        .await
        .expect("create category");
    assert_eq!(resp.status(), 201);
    let category: Value = resp.json().await.expect("category body");
    let category_id = category["id"].as_i64().expect("category id");

    let resp = admin
        .auth(client.post(format!("{base}/api/admin/products")))
        .multipart(product_form(
            &format!("it-product-{tag}"),
            price,
            category_id,
            theme_id,
            2,
        ))
        .send()
        .await
        .expect("create product");
    assert_eq!(resp.status(), 201);
    let product: Value = resp.json().await.expect("product body");
    let product_id = product["id"].as_i64().expect("product id");

    (theme_id, category_id, product_id)
}
