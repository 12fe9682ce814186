//! Catalog repository: themes, categories, products.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use heartwood_core::{CategoryId, ProductId, ThemeId};

use super::RepositoryError;
use crate::models::{Category, Dimensions, Product, Theme};

#[derive(FromRow)]
struct ThemeRow {
    id: i32,
    name: String,
    description: String,
    image: String,
    color: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ThemeRow> for Theme {
    fn from(row: ThemeRow) -> Self {
        Self {
            id: ThemeId::new(row.id),
            name: row.name,
            description: row.description,
            image: row.image,
            color: row.color,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct CategoryRow {
    id: i32,
    name: String,
    description: String,
    icon: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(row.id),
            name: row.name,
            description: row.description,
            icon: row.icon,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    description: String,
    price: Decimal,
    images: Vec<String>,
    category_id: i32,
    theme_id: i32,
    brand: Option<String>,
    color: Option<String>,
    width: f64,
    height: f64,
    depth: f64,
    weight: Option<f64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            price: row.price,
            images: row.images,
            category_id: CategoryId::new(row.category_id),
            theme_id: ThemeId::new(row.theme_id),
            brand: row.brand,
            color: row.color,
            dimensions: Dimensions {
                width: row.width,
                height: row.height,
                depth: row.depth,
            },
            weight: row.weight,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const THEME_COLUMNS: &str = "id, name, description, image, color, created_at, updated_at";
const CATEGORY_COLUMNS: &str = "id, name, description, icon, created_at, updated_at";
const PRODUCT_COLUMNS: &str = "id, name, description, price, images, category_id, theme_id, \
     brand, color, width, height, depth, weight, created_at, updated_at";

/// Slim theme shape for the storefront navigation menu.
#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MenuTheme {
    pub id: ThemeId,
    pub name: String,
    pub color: String,
}

/// Slim category shape for the storefront navigation menu.
#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MenuCategory {
    pub id: CategoryId,
    pub name: String,
    pub icon: String,
}

/// Filters for the paginated menu listing. `None` fields match everything.
#[derive(Debug, Default)]
pub struct MenuFilter {
    pub theme_id: Option<ThemeId>,
    pub category_id: Option<CategoryId>,
    pub search: Option<String>,
}

/// One page of menu results plus the total match count.
#[derive(Debug)]
pub struct MenuPage {
    pub products: Vec<Product>,
    pub total: i64,
}

/// New theme values; `image` is the stored web-relative asset path.
#[derive(Debug)]
pub struct NewTheme {
    pub name: String,
    pub description: String,
    pub image: String,
    pub color: String,
}

/// Partial theme update; `None` fields are left untouched.
#[derive(Debug, Default)]
pub struct ThemePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug)]
pub struct NewCategory {
    pub name: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
}

/// New product values; `images` already holds stored asset paths.
#[derive(Debug)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub images: Vec<String>,
    pub category_id: CategoryId,
    pub theme_id: ThemeId,
    pub brand: Option<String>,
    pub color: Option<String>,
    pub dimensions: Dimensions,
    pub weight: Option<f64>,
}

/// Partial product update. `images` replaces the whole ordered list when set.
#[derive(Debug, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub images: Option<Vec<String>>,
    pub category_id: Option<CategoryId>,
    pub theme_id: Option<ThemeId>,
    pub brand: Option<String>,
    pub color: Option<String>,
    pub dimensions: Option<Dimensions>,
    pub weight: Option<f64>,
}

/// Repository for catalog database operations.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Themes
    // =========================================================================

    /// List all themes, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn themes(&self) -> Result<Vec<Theme>, RepositoryError> {
        let rows: Vec<ThemeRow> =
            sqlx::query_as(&format!("SELECT {THEME_COLUMNS} FROM themes ORDER BY id ASC"))
                .fetch_all(self.pool)
                .await?;
        Ok(rows.into_iter().map(Theme::from).collect())
    }

    /// Slim theme list for the navigation menu.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn menu_themes(&self) -> Result<Vec<MenuTheme>, RepositoryError> {
        let rows = sqlx::query_as("SELECT id, name, color FROM themes ORDER BY id ASC")
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    /// Get a theme by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn theme(&self, id: ThemeId) -> Result<Option<Theme>, RepositoryError> {
        let row: Option<ThemeRow> =
            sqlx::query_as(&format!("SELECT {THEME_COLUMNS} FROM themes WHERE id = $1"))
                .bind(id.as_i32())
                .fetch_optional(self.pool)
                .await?;
        Ok(row.map(Theme::from))
    }

    /// Create a theme.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` when the name is taken.
    pub async fn create_theme(&self, theme: &NewTheme) -> Result<Theme, RepositoryError> {
        let row: ThemeRow = sqlx::query_as(&format!(
            "INSERT INTO themes (name, description, image, color)
             VALUES ($1, $2, $3, $4)
             RETURNING {THEME_COLUMNS}"
        ))
        .bind(&theme.name)
        .bind(&theme.description)
        .bind(&theme.image)
        .bind(&theme.color)
        .fetch_one(self.pool)
        .await
        .map_err(map_name_conflict)?;
        Ok(row.into())
    }

    /// Partially update a theme.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the theme does not exist.
    pub async fn update_theme(
        &self,
        id: ThemeId,
        patch: &ThemePatch,
    ) -> Result<Theme, RepositoryError> {
        let row: Option<ThemeRow> = sqlx::query_as(&format!(
            "UPDATE themes SET
                name = COALESCE($1, name),
                description = COALESCE($2, description),
                image = COALESCE($3, image),
                color = COALESCE($4, color),
                updated_at = NOW()
             WHERE id = $5
             RETURNING {THEME_COLUMNS}"
        ))
        .bind(patch.name.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.image.as_deref())
        .bind(patch.color.as_deref())
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await
        .map_err(map_name_conflict)?;
        row.map(Theme::from).ok_or(RepositoryError::NotFound)
    }

    /// Delete a theme record (cascade cleanup happens in the service layer).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the theme does not exist.
    pub async fn delete_theme(&self, id: ThemeId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM themes WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Up to `limit` random products belonging to a theme, for the theme
    /// showcase listing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn random_products_for_theme(
        &self,
        theme_id: ThemeId,
        limit: i64,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products
             WHERE theme_id = $1 ORDER BY random() LIMIT $2"
        ))
        .bind(theme_id.as_i32())
        .bind(limit)
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// List all categories, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows: Vec<CategoryRow> = sqlx::query_as(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY id ASC"
        ))
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    /// Slim category list for the navigation menu.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn menu_categories(&self) -> Result<Vec<MenuCategory>, RepositoryError> {
        let rows = sqlx::query_as("SELECT id, name, icon FROM categories ORDER BY id ASC")
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    /// Get a category by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn category(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        let row: Option<CategoryRow> = sqlx::query_as(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;
        Ok(row.map(Category::from))
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` when the name is taken.
    pub async fn create_category(
        &self,
        category: &NewCategory,
    ) -> Result<Category, RepositoryError> {
        let row: CategoryRow = sqlx::query_as(&format!(
            "INSERT INTO categories (name, description, icon)
             VALUES ($1, $2, $3)
             RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(&category.name)
        .bind(&category.description)
        .bind(&category.icon)
        .fetch_one(self.pool)
        .await
        .map_err(map_name_conflict)?;
        Ok(row.into())
    }

    /// Partially update a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category does not exist.
    pub async fn update_category(
        &self,
        id: CategoryId,
        patch: &CategoryPatch,
    ) -> Result<Category, RepositoryError> {
        let row: Option<CategoryRow> = sqlx::query_as(&format!(
            "UPDATE categories SET
                name = COALESCE($1, name),
                description = COALESCE($2, description),
                icon = COALESCE($3, icon),
                updated_at = NOW()
             WHERE id = $4
             RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(patch.name.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.icon.as_deref())
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await
        .map_err(map_name_conflict)?;
        row.map(Category::from).ok_or(RepositoryError::NotFound)
    }

    /// Delete a category record (cascade cleanup happens in the service layer).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category does not exist.
    pub async fn delete_category(&self, id: CategoryId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// List all products, oldest first (admin view).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn products(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id ASC"
        ))
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;
        Ok(row.map(Product::from))
    }

    /// Batch-load products by id. The caller compares the result length
    /// against the number of distinct requested ids.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn products_by_ids(
        &self,
        ids: &[ProductId],
    ) -> Result<Vec<Product>, RepositoryError> {
        let raw: Vec<i32> = ids.iter().map(|id| id.as_i32()).collect();
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)"
        ))
        .bind(&raw)
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// All products referencing a category (for cascade cleanup).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn products_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE category_id = $1"
        ))
        .bind(category_id.as_i32())
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// All products referencing a theme (for cascade cleanup).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn products_by_theme(
        &self,
        theme_id: ThemeId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE theme_id = $1"
        ))
        .bind(theme_id.as_i32())
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Paginated, filterable product listing for the storefront menu.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn menu(
        &self,
        filter: &MenuFilter,
        limit: i64,
        offset: i64,
    ) -> Result<MenuPage, RepositoryError> {
        let theme_id = filter.theme_id.map(|id| id.as_i32());
        let category_id = filter.category_id.map(|id| id.as_i32());
        let search = filter.search.as_deref();

        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products
             WHERE ($1::int IS NULL OR theme_id = $1)
               AND ($2::int IS NULL OR category_id = $2)
               AND ($3::text IS NULL
                    OR name ILIKE '%' || $3 || '%'
                    OR description ILIKE '%' || $3 || '%')
             ORDER BY id ASC
             LIMIT $4 OFFSET $5"
        ))
        .bind(theme_id)
        .bind(category_id)
        .bind(search)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        let (total,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM products
             WHERE ($1::int IS NULL OR theme_id = $1)
               AND ($2::int IS NULL OR category_id = $2)
               AND ($3::text IS NULL
                    OR name ILIKE '%' || $3 || '%'
                    OR description ILIKE '%' || $3 || '%')",
        )
        .bind(theme_id)
        .bind(category_id)
        .bind(search)
        .fetch_one(self.pool)
        .await?;

        Ok(MenuPage {
            products: rows.into_iter().map(Product::from).collect(),
            total,
        })
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create_product(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let row: ProductRow = sqlx::query_as(&format!(
            "INSERT INTO products
                (name, description, price, images, category_id, theme_id,
                 brand, color, width, height, depth, weight)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.images)
        .bind(product.category_id.as_i32())
        .bind(product.theme_id.as_i32())
        .bind(product.brand.as_deref())
        .bind(product.color.as_deref())
        .bind(product.dimensions.width)
        .bind(product.dimensions.height)
        .bind(product.dimensions.depth)
        .bind(product.weight)
        .fetch_one(self.pool)
        .await?;
        Ok(row.into())
    }

    /// Partially update a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn update_product(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, RepositoryError> {
        let (width, height, depth) = match patch.dimensions {
            Some(d) => (Some(d.width), Some(d.height), Some(d.depth)),
            None => (None, None, None),
        };
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "UPDATE products SET
                name = COALESCE($1, name),
                description = COALESCE($2, description),
                price = COALESCE($3, price),
                images = COALESCE($4, images),
                category_id = COALESCE($5, category_id),
                theme_id = COALESCE($6, theme_id),
                brand = COALESCE($7, brand),
                color = COALESCE($8, color),
                width = COALESCE($9, width),
                height = COALESCE($10, height),
                depth = COALESCE($11, depth),
                weight = COALESCE($12, weight),
                updated_at = NOW()
             WHERE id = $13
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(patch.name.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.price)
        .bind(patch.images.as_deref())
        .bind(patch.category_id.map(|id| id.as_i32()))
        .bind(patch.theme_id.map(|id| id.as_i32()))
        .bind(patch.brand.as_deref())
        .bind(patch.color.as_deref())
        .bind(width)
        .bind(height)
        .bind(depth)
        .bind(patch.weight)
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;
        row.map(Product::from).ok_or(RepositoryError::NotFound)
    }

    /// Replace a product's ordered image list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn set_product_images(
        &self,
        id: ProductId,
        images: &[String],
    ) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE products SET images = $1, updated_at = NOW() WHERE id = $2")
                .bind(images)
                .bind(id.as_i32())
                .execute(self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete a single product record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn delete_product(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Bulk-delete products (cascade step for category/theme deletion).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_products(&self, ids: &[ProductId]) -> Result<u64, RepositoryError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let raw: Vec<i32> = ids.iter().map(|id| id.as_i32()).collect();
        let result = sqlx::query("DELETE FROM products WHERE id = ANY($1)")
            .bind(&raw)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

fn map_name_conflict(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict("Name already in use".to_owned());
    }
    RepositoryError::Database(e)
}
