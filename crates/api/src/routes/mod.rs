//! HTTP route handlers for the Heartwood API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                         - Liveness check
//! GET  /health/ready                   - Readiness check (pings the database)
//! GET  /uploads/*                      - Static assets (ServeDir)
//!
//! # Auth
//! POST /api/auth/signup                - Create account, issue token (7d)
//! POST /api/auth/login                 - Verify credentials, issue token (5h)
//!
//! # Account (requires user token)
//! GET    /api/users/me                 - Profile + address book
//! GET    /api/users/profile            - Profile + address book + orders
//! PATCH  /api/users/phone              - Set phone number
//! PATCH  /api/users/password           - Change password
//! POST   /api/users/addresses          - Add address
//! PUT    /api/users/addresses/{id}     - Update address
//! DELETE /api/users/addresses/{id}     - Remove address
//! PATCH  /api/users/orders/{id}/cancel - Cancel own pending order
//!
//! # Catalog (public)
//! GET /api/menu                        - Paginated/filterable products
//! GET /api/menu/themes                 - Slim theme list
//! GET /api/menu/categories             - Slim category list
//! GET /api/themes                      - Themes with random product samples
//! GET /api/products/{id}               - Product detail
//! GET /api/info/footer                 - Store contact info
//!
//! # Checkout (requires user token)
//! POST /api/orders                     - Place order
//!
//! # Admin console (requires admin token)
//! GET/POST       /api/admin/themes[/{id}]      - Theme CRUD (cascading delete)
//! GET/POST       /api/admin/categories[/{id}]  - Category CRUD (cascading delete)
//! GET/POST       /api/admin/products[/{id}]    - Product CRUD
//! DELETE /api/admin/products/{id}/images/{filename} - Remove one image
//! GET            /api/admin/orders              - All orders with owners
//! DELETE         /api/admin/orders/{id}         - Delete order record
//! PATCH          /api/admin/orders/{id}/status  - Set order status
//! GET            /api/admin/users               - All accounts
//! DELETE         /api/admin/users/{id}          - Delete account (cascade)
//! PATCH          /api/admin/users/{id}/role     - Change role
//! GET/PUT        /api/admin/info                - Store contact info
//! ```

pub mod admin;
pub mod auth;
pub mod info;
pub mod menu;
pub mod orders;
pub mod products;
pub mod themes;
pub mod users;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, patch, post, put},
};
use tower_http::services::ServeDir;

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
}

/// Create the account self-service routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(users::me))
        .route("/profile", get(users::profile))
        .route("/phone", patch(users::update_phone))
        .route("/password", patch(users::change_password))
        .route("/addresses", post(users::add_address))
        .route(
            "/addresses/{id}",
            put(users::update_address).delete(users::delete_address),
        )
        .route("/orders/{id}/cancel", patch(users::cancel_order))
}

/// Create the public catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/menu", get(menu::menu))
        .route("/menu/themes", get(menu::menu_themes))
        .route("/menu/categories", get(menu::menu_categories))
        .route("/themes", get(themes::showcase))
        .route("/products/{id}", get(products::detail))
        .route("/info/footer", get(info::footer))
}

/// Create the admin console routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/themes",
            get(admin::themes::list).post(admin::themes::create),
        )
        .route(
            "/themes/{id}",
            put(admin::themes::update).delete(admin::themes::delete),
        )
        .route(
            "/categories",
            get(admin::categories::list).post(admin::categories::create),
        )
        .route(
            "/categories/{id}",
            put(admin::categories::update).delete(admin::categories::delete),
        )
        .route(
            "/products",
            get(admin::products::list).post(admin::products::create),
        )
        .route(
            "/products/{id}",
            put(admin::products::update).delete(admin::products::delete),
        )
        .route(
            "/products/{id}/images/{filename}",
            delete(admin::products::remove_image),
        )
        .route("/orders", get(admin::orders::list))
        .route("/orders/{id}", delete(admin::orders::delete))
        .route("/orders/{id}/status", patch(admin::orders::set_status))
        .route("/users", get(admin::users::list))
        .route("/users/{id}", delete(admin::users::delete))
        .route("/users/{id}/role", patch(admin::users::set_role))
        .route("/info", get(admin::info::get).put(admin::info::update))
}

/// Assemble the full application router.
pub fn routes(state: &AppState) -> Router<AppState> {
    let api = Router::new()
        .nest("/auth", auth_routes())
        .nest("/users", user_routes())
        .nest("/admin", admin_routes())
        .route("/orders", post(orders::place))
        .merge(catalog_routes());

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api", api)
        .nest_service("/uploads", ServeDir::new(state.assets().root()))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
