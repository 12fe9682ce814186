//! Theme showcase: every theme with a random sample of its products.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::Serialize;

use heartwood_core::{ProductId, ThemeId};

use crate::db::CatalogRepository;
use crate::error::Result;
use crate::state::AppState;

const SAMPLE_SIZE: i64 = 4;

#[derive(Debug, Serialize)]
pub struct SampleProduct {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ThemeShowcase {
    pub id: ThemeId,
    pub name: String,
    pub description: String,
    pub image: String,
    pub color: String,
    pub products: Vec<SampleProduct>,
}

/// GET /api/themes — all themes, each with up to four random products.
///
/// # Errors
///
/// 500 on database failure.
pub async fn showcase(State(state): State<AppState>) -> Result<Json<Vec<ThemeShowcase>>> {
    let catalog = CatalogRepository::new(state.pool());
    let themes = catalog.themes().await?;

    let mut showcases = Vec::with_capacity(themes.len());
    for theme in themes {
        let products = catalog
            .random_products_for_theme(theme.id, SAMPLE_SIZE)
            .await?
            .into_iter()
            .map(|p| SampleProduct {
                id: p.id,
                name: p.name,
                price: p.price,
                image: p.images.first().cloned(),
            })
            .collect();
        showcases.push(ThemeShowcase {
            id: theme.id,
            name: theme.name,
            description: theme.description,
            image: theme.image,
            color: theme.color,
            products,
        });
    }
    Ok(Json(showcases))
}
