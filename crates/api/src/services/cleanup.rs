//! Cascading deletes: ordered best-effort cleanup sequences.
//!
//! Each delete is an explicit ordered list of steps. Asset deletions are
//! logged and swallowed on failure and never block the record deletion, so
//! a failed unlink can orphan a file on disk while the database row is
//! already gone. Records themselves are removed unconditionally once the
//! parent entity is confirmed to exist.

use heartwood_core::{CategoryId, ProductId, ThemeId, UserId};

use crate::assets::{AssetKind, AssetStore};
use crate::db::{CatalogRepository, OrderRepository, RepositoryError, UserRepository};
use crate::error::{AppError, Result};
use crate::models::Product;
use crate::state::AppState;

/// Delete a category, all products referencing it and every involved asset.
///
/// Steps: category icon, product images, product records, category record.
///
/// # Errors
///
/// Returns `AppError::NotFound` when the category does not exist.
pub async fn delete_category(state: &AppState, id: CategoryId) -> Result<()> {
    let catalog = CatalogRepository::new(state.pool());
    let category = catalog
        .category(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_owned()))?;

    state
        .assets()
        .delete(AssetKind::Category, &category.icon)
        .await;
    let products = catalog.products_by_category(id).await?;
    delete_product_assets(state, &products).await;
    catalog
        .delete_products(&product_ids(&products))
        .await?;
    catalog.delete_category(id).await?;

    tracing::info!(
        category = %category.name,
        products = products.len(),
        "Deleted category with cascade"
    );
    Ok(())
}

/// Delete a theme, all products referencing it and every involved asset.
///
/// # Errors
///
/// Returns `AppError::NotFound` when the theme does not exist.
pub async fn delete_theme(state: &AppState, id: ThemeId) -> Result<()> {
    let catalog = CatalogRepository::new(state.pool());
    let theme = catalog
        .theme(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Theme not found".to_owned()))?;

    state.assets().delete(AssetKind::Theme, &theme.image).await;
    let products = catalog.products_by_theme(id).await?;
    delete_product_assets(state, &products).await;
    catalog
        .delete_products(&product_ids(&products))
        .await?;
    catalog.delete_theme(id).await?;

    tracing::info!(
        theme = %theme.name,
        products = products.len(),
        "Deleted theme with cascade"
    );
    Ok(())
}

/// Delete a user, all their orders and every copied order-item image.
/// The self-delete guard lives in the admin route.
///
/// # Errors
///
/// Returns `AppError::NotFound` when the user does not exist.
pub async fn delete_user(state: &AppState, id: UserId) -> Result<()> {
    let orders = OrderRepository::new(state.pool()).list_by_user(id).await?;
    for order in &orders {
        for item in &order.items {
            if let Some(image) = &item.image {
                state.assets().delete(AssetKind::Orders, image).await;
            }
        }
    }
    OrderRepository::new(state.pool()).delete_by_user(id).await?;

    UserRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("User not found".to_owned()),
            other => AppError::Database(other),
        })?;

    tracing::info!(user = id.as_i32(), orders = orders.len(), "Deleted user with cascade");
    Ok(())
}

/// Delete one product and its image assets.
///
/// # Errors
///
/// Returns `AppError::NotFound` when the product does not exist.
pub async fn delete_product(state: &AppState, id: ProductId) -> Result<()> {
    let catalog = CatalogRepository::new(state.pool());
    let product = catalog
        .product(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;

    for image in &product.images {
        state.assets().delete(AssetKind::Products, image).await;
    }
    catalog.delete_product(id).await?;
    Ok(())
}

/// Remove a single image from a product's ordered list and delete the
/// underlying asset. Returns the surviving image list.
///
/// # Errors
///
/// Returns `AppError::Validation` when the image is the product's last one
/// (the list must never become empty), `AppError::NotFound` for an unknown
/// product or a filename not present in the list.
pub async fn remove_product_image(
    state: &AppState,
    id: ProductId,
    filename: &str,
) -> Result<Vec<String>> {
    let catalog = CatalogRepository::new(state.pool());
    let product = catalog
        .product(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;

    if product.images.len() <= 1 {
        return Err(AppError::Validation(
            "Cannot remove the last image".to_owned(),
        ));
    }
    let index = image_position(&product.images, filename)
        .ok_or_else(|| AppError::NotFound("Image not found in product".to_owned()))?;

    let mut images = product.images;
    let removed = images.remove(index);
    catalog.set_product_images(id, &images).await?;
    state.assets().delete(AssetKind::Products, &removed).await;
    Ok(images)
}

/// Position of the stored path whose bare filename equals `filename`.
/// Compares whole path segments, so a filename that happens to be a string
/// suffix of another never matches the wrong entry.
fn image_position(images: &[String], filename: &str) -> Option<usize> {
    images
        .iter()
        .position(|path| AssetStore::filename_of(path) == filename)
}

async fn delete_product_assets(state: &AppState, products: &[Product]) {
    for product in products {
        for image in &product.images {
            state.assets().delete(AssetKind::Products, image).await;
        }
    }
}

fn product_ids(products: &[Product]) -> Vec<ProductId> {
    products.iter().map(|p| p.id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(names: &[&str]) -> Vec<String> {
        names
            .iter()
            .map(|n| format!("uploads/products/{n}"))
            .collect()
    }

    #[test]
    fn test_image_position_matches_exact_filename() {
        let images = paths(&["a.jpg", "b.jpg", "c.jpg"]);
        assert_eq!(image_position(&images, "b.jpg"), Some(1));
        assert_eq!(image_position(&images, "missing.jpg"), None);
    }

    #[test]
    fn test_image_position_ignores_suffix_collisions() {
        // "chair.jpg" is a string suffix of "1-chair.jpg"; only the exact
        // filename may match.
        let images = paths(&["1-chair.jpg", "chair.jpg"]);
        assert_eq!(image_position(&images, "chair.jpg"), Some(1));
        let images = paths(&["1-chair.jpg"]);
        assert_eq!(image_position(&images, "chair.jpg"), None);
    }
}
