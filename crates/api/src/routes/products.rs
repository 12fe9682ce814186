//! Public product detail.

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::Serialize;

use heartwood_core::{CategoryId, ProductId, ThemeId};

use crate::db::CatalogRepository;
use crate::error::{AppError, Result};
use crate::models::Dimensions;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ThemeDetail {
    pub id: ThemeId,
    pub name: String,
    pub description: String,
    pub image: String,
    pub color: String,
}

#[derive(Debug, Serialize)]
pub struct CategoryDetail {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Serialize)]
pub struct ProductDetail {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub brand: Option<String>,
    pub color: Option<String>,
    pub dimensions: Dimensions,
    pub weight: Option<f64>,
    pub images: Vec<String>,
    pub theme: ThemeDetail,
    pub category: CategoryDetail,
}

/// GET /api/products/{id} — full detail with its theme and category.
///
/// # Errors
///
/// 404 when the product, or either of its references, is missing.
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductDetail>> {
    let catalog = CatalogRepository::new(state.pool());
    let product = catalog
        .product(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;
    let theme = catalog
        .theme(product.theme_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;
    let category = catalog
        .category(product.category_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;

    Ok(Json(ProductDetail {
        id: product.id,
        name: product.name,
        description: product.description,
        price: product.price,
        brand: product.brand,
        color: product.color,
        dimensions: product.dimensions,
        weight: product.weight,
        images: product.images,
        theme: ThemeDetail {
            id: theme.id,
            name: theme.name,
            description: theme.description,
            image: theme.image,
            color: theme.color,
        },
        category: CategoryDetail {
            id: category.id,
            name: category.name,
            description: category.description,
            icon: category.icon,
        },
    }))
}
