//! Catalog models: themes, categories, products.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use heartwood_core::{CategoryId, ProductId, ThemeId};

/// A visual theme grouping products (e.g. "Scandinavian", "Industrial").
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub id: ThemeId,
    pub name: String,
    pub description: String,
    /// Web-relative asset path, e.g. `uploads/theme/171...-42.jpg`.
    pub image: String,
    /// Accent color for the storefront, e.g. a hex code.
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A furniture category (e.g. "Sofas", "Dining Tables").
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
    /// Web-relative asset path for the category icon.
    pub icon: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Physical dimensions in centimeters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

/// A catalog product.
///
/// Invariant: `images` is never empty. Creation requires at least one image
/// and removal of the last image is rejected.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    /// Ordered list of web-relative asset paths; the first is the cover.
    pub images: Vec<String>,
    pub category_id: CategoryId,
    pub theme_id: ThemeId,
    pub brand: Option<String>,
    pub color: Option<String>,
    pub dimensions: Dimensions,
    pub weight: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// The cover image, i.e. the first entry of the ordered image list.
    ///
    /// The list is never empty for a persisted product, but this stays
    /// `Option` so callers degrade instead of panicking on bad data.
    #[must_use]
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}
