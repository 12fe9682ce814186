//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::assets::AssetStore;
use crate::config::ApiConfig;
use crate::services::TokenService;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; provides access to the database pool,
/// configuration, token service and asset store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: PgPool,
    tokens: TokenService,
    assets: AssetStore,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ApiConfig, pool: PgPool) -> Self {
        let tokens = TokenService::new(&config.jwt_secret);
        let assets = AssetStore::new(config.upload_root.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                tokens,
                assets,
            }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the token service.
    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }

    /// Get a reference to the asset store.
    #[must_use]
    pub fn assets(&self) -> &AssetStore {
        &self.inner.assets
    }
}
