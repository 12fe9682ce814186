//! Storefront menu: paginated, filterable product listing plus slim theme
//! and category lists for navigation.

use axum::{
    Json,
    extract::{Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use heartwood_core::{CategoryId, ProductId, ThemeId};

use crate::db::{
    CatalogRepository,
    catalog::{MenuCategory, MenuFilter, MenuTheme},
};
use crate::error::Result;
use crate::middleware::OptionalUser;
use crate::models::{Category, Theme};
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 12;
const MAX_PAGE_SIZE: i64 = 100;

/// Page window derived from raw query values. Both inputs are
/// client-controlled, so they are bounded before any arithmetic: `per_page`
/// is clamped to 1..=100 and the offset saturates instead of overflowing.
fn page_window(page: Option<i64>, limit: Option<i64>) -> (i64, i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let per_page = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = (page - 1).saturating_mul(per_page);
    (page, per_page, offset)
}

/// Ceiling division for the page count; `per_page` is already clamped ≥ 1.
fn total_pages(total: i64, per_page: i64) -> i64 {
    (total + per_page - 1) / per_page
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuQuery {
    pub theme_id: Option<ThemeId>,
    pub category_id: Option<CategoryId>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Slim product card for listing pages.
#[derive(Debug, Serialize)]
pub struct MenuProduct {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub description: String,
    /// First image, or null for a product that somehow has none.
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total_products: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub per_page: i64,
}

#[derive(Debug, Serialize)]
pub struct MenuResponse {
    pub products: Vec<MenuProduct>,
    pub pagination: Pagination,
    /// Full detail of the selected theme, null when unfiltered.
    pub theme: Option<Theme>,
    /// Full detail of the selected category, null when unfiltered.
    pub category: Option<Category>,
}

/// GET /api/menu
///
/// # Errors
///
/// 500 on database failure.
pub async fn menu(
    State(state): State<AppState>,
    OptionalUser(viewer): OptionalUser,
    Query(query): Query<MenuQuery>,
) -> Result<Json<MenuResponse>> {
    if let Some(viewer) = &viewer {
        tracing::debug!(user = viewer.id.as_i32(), "Menu request");
    }
    let (page, per_page, offset) = page_window(query.page, query.limit);

    let filter = MenuFilter {
        theme_id: query.theme_id,
        category_id: query.category_id,
        search: query
            .search
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty()),
    };

    let catalog = CatalogRepository::new(state.pool());
    let result = catalog.menu(&filter, per_page, offset).await?;

    // Unknown filter ids simply come back as null, matching an empty page.
    let theme = match filter.theme_id {
        Some(id) => catalog.theme(id).await?,
        None => None,
    };
    let category = match filter.category_id {
        Some(id) => catalog.category(id).await?,
        None => None,
    };

    let products = result
        .products
        .into_iter()
        .map(|p| MenuProduct {
            id: p.id,
            name: p.name,
            price: p.price,
            description: p.description,
            image: p.images.first().cloned(),
        })
        .collect();

    Ok(Json(MenuResponse {
        products,
        pagination: Pagination {
            total_products: result.total,
            total_pages: total_pages(result.total, per_page),
            current_page: page,
            per_page,
        },
        theme,
        category,
    }))
}

/// GET /api/menu/themes
///
/// # Errors
///
/// 500 on database failure.
pub async fn menu_themes(State(state): State<AppState>) -> Result<Json<Vec<MenuTheme>>> {
    let themes = CatalogRepository::new(state.pool()).menu_themes().await?;
    Ok(Json(themes))
}

/// GET /api/menu/categories
///
/// # Errors
///
/// 500 on database failure.
pub async fn menu_categories(State(state): State<AppState>) -> Result<Json<Vec<MenuCategory>>> {
    let categories = CatalogRepository::new(state.pool())
        .menu_categories()
        .await?;
    Ok(Json(categories))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_window_defaults() {
        assert_eq!(page_window(None, None), (1, DEFAULT_PAGE_SIZE, 0));
        assert_eq!(page_window(Some(3), Some(20)), (3, 20, 40));
    }

    #[test]
    fn test_page_window_clamps_nonsense() {
        // Zero and negative values fall back to the minimums.
        assert_eq!(page_window(Some(0), Some(0)), (1, 1, 0));
        assert_eq!(page_window(Some(-5), Some(-5)), (1, 1, 0));
        // Oversized limits are capped.
        let (_, per_page, _) = page_window(Some(1), Some(100_000));
        assert_eq!(per_page, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_page_window_huge_page_does_not_overflow() {
        let (page, per_page, offset) = page_window(Some(i64::MAX), None);
        assert_eq!(page, i64::MAX);
        assert_eq!(per_page, DEFAULT_PAGE_SIZE);
        // Saturates instead of wrapping to a negative OFFSET.
        assert_eq!(offset, i64::MAX);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(0, 12), 0);
        assert_eq!(total_pages(12, 12), 1);
        assert_eq!(total_pages(13, 12), 2);
        assert_eq!(total_pages(1, 100), 1);
    }
}
