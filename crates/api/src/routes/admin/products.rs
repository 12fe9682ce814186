//! Admin product CRUD.
//!
//! Create and update are `multipart/form-data`: text fields, a JSON-encoded
//! `dimensions` field, and up to five image files under `images`. Product
//! update additionally accepts a JSON `images` field holding the retained
//! asset paths; newly uploaded files are appended after it.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use heartwood_core::{CategoryId, ProductId, ThemeId};

use crate::assets::{AssetKind, AssetStore};
use crate::db::{
    CatalogRepository,
    catalog::{NewProduct, ProductPatch},
};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{Category, Dimensions, Product, Theme};
use crate::routes::products::{CategoryDetail, ThemeDetail};
use crate::routes::users::MessageResponse;
use crate::services::cleanup;
use crate::state::AppState;

use super::{UploadedFile, collect_multipart};

const MAX_IMAGES_PER_UPLOAD: usize = 5;

/// Admin product view with its category and theme joined in.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProduct {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub images: Vec<String>,
    pub category: CategoryDetail,
    pub theme: ThemeDetail,
    pub brand: Option<String>,
    pub color: Option<String>,
    pub dimensions: Dimensions,
    pub weight: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn join_product(
    product: Product,
    themes: &HashMap<ThemeId, Theme>,
    categories: &HashMap<CategoryId, Category>,
) -> Result<AdminProduct> {
    let theme = themes
        .get(&product.theme_id)
        .ok_or_else(|| AppError::NotFound("Theme not found".to_owned()))?;
    let category = categories
        .get(&product.category_id)
        .ok_or_else(|| AppError::NotFound("Category not found".to_owned()))?;
    Ok(AdminProduct {
        id: product.id,
        name: product.name,
        description: product.description,
        price: product.price,
        images: product.images,
        category: CategoryDetail {
            id: category.id,
            name: category.name.clone(),
            description: category.description.clone(),
            icon: category.icon.clone(),
        },
        theme: ThemeDetail {
            id: theme.id,
            name: theme.name.clone(),
            description: theme.description.clone(),
            image: theme.image.clone(),
            color: theme.color.clone(),
        },
        brand: product.brand,
        color: product.color,
        dimensions: product.dimensions,
        weight: product.weight,
        created_at: product.created_at,
        updated_at: product.updated_at,
    })
}

async fn load_joined(state: &AppState, product: Product) -> Result<AdminProduct> {
    let catalog = CatalogRepository::new(state.pool());
    let themes: HashMap<_, _> = catalog
        .themes()
        .await?
        .into_iter()
        .map(|t| (t.id, t))
        .collect();
    let categories: HashMap<_, _> = catalog
        .categories()
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();
    join_product(product, &themes, &categories)
}

/// GET /api/admin/products — every product with category and theme detail.
///
/// # Errors
///
/// 500 on database failure.
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<AdminProduct>>> {
    let catalog = CatalogRepository::new(state.pool());
    let themes: HashMap<_, _> = catalog
        .themes()
        .await?
        .into_iter()
        .map(|t| (t.id, t))
        .collect();
    let categories: HashMap<_, _> = catalog
        .categories()
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    catalog
        .products()
        .await?
        .into_iter()
        .map(|p| join_product(p, &themes, &categories))
        .collect::<Result<Vec<_>>>()
        .map(Json)
}

fn image_files(files: Vec<UploadedFile>) -> Result<Vec<UploadedFile>> {
    let images: Vec<UploadedFile> = files.into_iter().filter(|f| f.field == "images").collect();
    if images.len() > MAX_IMAGES_PER_UPLOAD {
        return Err(AppError::Validation(format!(
            "At most {MAX_IMAGES_PER_UPLOAD} images are allowed"
        )));
    }
    Ok(images)
}

async fn store_images(state: &AppState, files: Vec<UploadedFile>) -> Result<Vec<String>> {
    let mut paths = Vec::with_capacity(files.len());
    for file in files {
        let filename = AssetStore::generate_filename(&file.filename, file.content_type.as_deref());
        paths.push(
            state
                .assets()
                .store(AssetKind::Products, &filename, &file.bytes)
                .await?,
        );
    }
    Ok(paths)
}

fn parse_dimensions(raw: &str) -> Result<Dimensions> {
    serde_json::from_str(raw).map_err(|_| AppError::Validation("Invalid dimensions".to_owned()))
}

fn parse_price(raw: &str) -> Result<Decimal> {
    raw.parse()
        .map_err(|_| AppError::Validation("Invalid price".to_owned()))
}

/// POST /api/admin/products
///
/// Fields: `name`, `description`, `price`, `category`, `theme`, optional
/// `brand`/`color`/`weight`, `dimensions` as a JSON object string, and at
/// least one file under `images`.
///
/// # Errors
///
/// 400 on missing required fields or when no image was uploaded.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    multipart: Multipart,
) -> Result<(StatusCode, Json<AdminProduct>)> {
    let (mut fields, files) = collect_multipart(multipart).await?;

    let required = ["name", "description", "price", "category", "theme", "dimensions"];
    if required
        .iter()
        .any(|f| fields.get(*f).is_none_or(|v| v.trim().is_empty()))
    {
        return Err(AppError::Validation("Missing required fields".to_owned()));
    }
    let files = image_files(files)?;
    if files.is_empty() {
        return Err(AppError::Validation(
            "At least one image is required".to_owned(),
        ));
    }

    let price = parse_price(&fields["price"])?;
    let dimensions = parse_dimensions(&fields["dimensions"])?;
    let category_id = parse_id::<CategoryId>(&fields["category"], "category")?;
    let theme_id = parse_id::<ThemeId>(&fields["theme"], "theme")?;
    let weight = match fields.get("weight").filter(|s| !s.trim().is_empty()) {
        Some(raw) => Some(
            raw.parse::<f64>()
                .map_err(|_| AppError::Validation("Invalid weight".to_owned()))?,
        ),
        None => None,
    };

    let images = store_images(&state, files).await?;
    let product = CatalogRepository::new(state.pool())
        .create_product(&NewProduct {
            name: fields.remove("name").unwrap_or_default(),
            description: fields.remove("description").unwrap_or_default(),
            price,
            images,
            category_id,
            theme_id,
            brand: fields.remove("brand").filter(|s| !s.is_empty()),
            color: fields.remove("color").filter(|s| !s.is_empty()),
            dimensions,
            weight,
        })
        .await?;

    let joined = load_joined(&state, product).await?;
    Ok((StatusCode::CREATED, Json(joined)))
}

/// PUT /api/admin/products/{id}
///
/// Patches any provided text fields. When an `images` field is present it
/// must be a JSON array of the asset paths to retain; omitted means keep
/// the current list. Uploaded files are appended in both cases.
///
/// # Errors
///
/// 404 when the product does not exist, 400 on malformed fields.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ProductId>,
    multipart: Multipart,
) -> Result<Json<AdminProduct>> {
    let catalog = CatalogRepository::new(state.pool());
    let existing = catalog
        .product(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;

    let (mut fields, files) = collect_multipart(multipart).await?;
    let files = image_files(files)?;

    let price = match fields.get("price").filter(|s| !s.trim().is_empty()) {
        Some(raw) => Some(parse_price(raw)?),
        None => None,
    };
    let dimensions = match fields.get("dimensions").filter(|s| !s.trim().is_empty()) {
        Some(raw) => Some(parse_dimensions(raw)?),
        None => None,
    };
    let weight = match fields.get("weight").filter(|s| !s.trim().is_empty()) {
        Some(raw) => Some(
            raw.parse::<f64>()
                .map_err(|_| AppError::Validation("Invalid weight".to_owned()))?,
        ),
        None => None,
    };
    let category_id = match fields.get("category").filter(|s| !s.trim().is_empty()) {
        Some(raw) => Some(parse_id::<CategoryId>(raw, "category")?),
        None => None,
    };
    let theme_id = match fields.get("theme").filter(|s| !s.trim().is_empty()) {
        Some(raw) => Some(parse_id::<ThemeId>(raw, "theme")?),
        None => None,
    };

    // Retained list from the client, or the current list when absent.
    let mut images = match fields.get("images") {
        Some(raw) => serde_json::from_str::<Vec<String>>(raw)
            .map_err(|_| AppError::Validation("Invalid images list".to_owned()))?,
        None => existing.images.clone(),
    };
    images.extend(store_images(&state, files).await?);
    if images.is_empty() {
        return Err(AppError::Validation(
            "At least one image is required".to_owned(),
        ));
    }

    let product = catalog
        .update_product(
            id,
            &ProductPatch {
                name: fields.remove("name"),
                description: fields.remove("description"),
                price,
                images: Some(images),
                category_id,
                theme_id,
                brand: fields.remove("brand"),
                color: fields.remove("color"),
                dimensions,
                weight,
            },
        )
        .await?;

    let joined = load_joined(&state, product).await?;
    Ok(Json(joined))
}

/// DELETE /api/admin/products/{id} — removes the record and its assets.
///
/// # Errors
///
/// 404 when the product does not exist.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<Json<MessageResponse>> {
    cleanup::delete_product(&state, id).await?;
    Ok(Json(MessageResponse {
        message: "Product and its images deleted".to_owned(),
    }))
}

#[derive(Debug, Serialize)]
pub struct ImagesResponse {
    pub images: Vec<String>,
}

/// DELETE /api/admin/products/{id}/images/{filename} — remove one image.
///
/// # Errors
///
/// 400 when it is the last image, 404 for an unknown product or filename.
pub async fn remove_image(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path((id, filename)): Path<(ProductId, String)>,
) -> Result<Json<ImagesResponse>> {
    let images = cleanup::remove_product_image(&state, id, &filename).await?;
    Ok(Json(ImagesResponse { images }))
}

fn parse_id<T: From<i32>>(raw: &str, field: &str) -> Result<T> {
    raw.trim()
        .parse::<i32>()
        .map(T::from)
        .map_err(|_| AppError::Validation(format!("Invalid {field} id")))
}
