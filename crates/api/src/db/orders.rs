//! Order repository: order records and their item snapshots.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use heartwood_core::{OrderId, OrderStatus, PaymentMethod, ProductId, UserId};

use super::RepositoryError;
use crate::models::{Order, OrderItem, ShippingAddress};

#[derive(FromRow)]
struct OrderRow {
    id: i32,
    user_id: i32,
    shipping_title: Option<String>,
    shipping_street: String,
    shipping_city: String,
    shipping_state: Option<String>,
    shipping_zip: Option<String>,
    shipping_country: String,
    payment_method: String,
    status: String,
    total_price: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Result<Order, RepositoryError> {
        let payment_method = self
            .payment_method
            .parse::<PaymentMethod>()
            .map_err(RepositoryError::DataCorruption)?;
        let status = self
            .status
            .parse::<OrderStatus>()
            .map_err(RepositoryError::DataCorruption)?;
        Ok(Order {
            id: OrderId::new(self.id),
            user: UserId::new(self.user_id),
            items,
            shipping_address: ShippingAddress {
                title: self.shipping_title,
                street: self.shipping_street,
                city: self.shipping_city,
                state: self.shipping_state,
                zip: self.shipping_zip,
                country: self.shipping_country,
            },
            payment_method,
            status,
            total_price: self.total_price,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(FromRow)]
struct OrderItemRow {
    order_id: i32,
    product_id: i32,
    name: String,
    image: Option<String>,
    quantity: i32,
    price: Decimal,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            product: ProductId::new(row.product_id),
            name: row.name,
            image: row.image,
            quantity: row.quantity,
            price: row.price,
        }
    }
}

const ORDER_COLUMNS: &str = "id, user_id, shipping_title, shipping_street, shipping_city, \
     shipping_state, shipping_zip, shipping_country, payment_method, status, total_price, \
     created_at, updated_at";

/// Owner identity joined onto an order for the admin listing.
#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderCustomer {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

/// An order together with its owner, for the admin console. The `user`
/// field replaces the plain owner id with the joined identity.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOrder {
    pub id: OrderId,
    pub user: OrderCustomer,
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values for a new order; items carry already-computed snapshots.
#[derive(Debug)]
pub struct NewOrder {
    pub user: UserId,
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub total_price: Decimal,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist an order and its item snapshots in one transaction and return
    /// the created order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; the
    /// transaction rolls back and nothing is persisted.
    pub async fn create(&self, order: &NewOrder) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row: OrderRow = sqlx::query_as(&format!(
            "INSERT INTO orders
                (user_id, shipping_title, shipping_street, shipping_city,
                 shipping_state, shipping_zip, shipping_country,
                 payment_method, total_price)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(order.user.as_i32())
        .bind(order.shipping_address.title.as_deref())
        .bind(&order.shipping_address.street)
        .bind(&order.shipping_address.city)
        .bind(order.shipping_address.state.as_deref())
        .bind(order.shipping_address.zip.as_deref())
        .bind(&order.shipping_address.country)
        .bind(order.payment_method.to_string())
        .bind(order.total_price)
        .fetch_one(&mut *tx)
        .await?;

        for (position, item) in order.items.iter().enumerate() {
            sqlx::query(
                "INSERT INTO order_items
                    (order_id, position, product_id, name, image, quantity, price)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(row.id)
            .bind(i32::try_from(position).unwrap_or(i32::MAX))
            .bind(item.product.as_i32())
            .bind(&item.name)
            .bind(item.image.as_deref())
            .bind(item.quantity)
            .bind(item.price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        row.into_order(order.items.clone())
    }

    /// Get one order with its items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row: Option<OrderRow> =
            sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
                .bind(id.as_i32())
                .fetch_optional(self.pool)
                .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut items = self.items_for(&[row.id]).await?;
        let items = items.remove(&row.id).unwrap_or_default();
        Ok(Some(row.into_order(items)?))
    }

    /// All orders placed by a user, newest first, with items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_by_user(&self, user: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user.as_i32())
        .fetch_all(self.pool)
        .await?;

        self.assemble(rows).await
    }

    /// Every order with its owner's identity, newest first (admin view).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_all(&self) -> Result<Vec<AdminOrder>, RepositoryError> {
        #[derive(FromRow)]
        struct JoinedRow {
            #[sqlx(flatten)]
            order: OrderRow,
            username: String,
            email: String,
        }

        let rows: Vec<JoinedRow> = sqlx::query_as(&format!(
            "SELECT o.{}, u.username, u.email
             FROM orders o JOIN users u ON u.id = o.user_id
             ORDER BY o.created_at DESC",
            ORDER_COLUMNS.replace(", ", ", o.")
        ))
        .fetch_all(self.pool)
        .await?;

        let ids: Vec<i32> = rows.iter().map(|r| r.order.id).collect();
        let mut items = self.items_for(&ids).await?;

        rows.into_iter()
            .map(|r| {
                let customer = OrderCustomer {
                    id: UserId::new(r.order.user_id),
                    username: r.username,
                    email: r.email,
                };
                let order_items = items.remove(&r.order.id).unwrap_or_default();
                let order = r.order.into_order(order_items)?;
                Ok(AdminOrder {
                    id: order.id,
                    user: customer,
                    items: order.items,
                    shipping_address: order.shipping_address,
                    payment_method: order.payment_method,
                    status: order.status,
                    total_price: order.total_price,
                    created_at: order.created_at,
                    updated_at: order.updated_at,
                })
            })
            .collect()
    }

    /// User-side cancellation: one conditional UPDATE matching id, owner and
    /// the `pending` status. Returns `false` when no row matched — the caller
    /// cannot tell ownership mismatch apart from a non-pending status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn cancel_pending(
        &self,
        user: UserId,
        order: OrderId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE orders SET status = 'cancelled', updated_at = NOW()
             WHERE id = $1 AND user_id = $2 AND status = 'pending'",
        )
        .bind(order.as_i32())
        .bind(user.as_i32())
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Admin status transition; any status may move to any other.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn set_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "UPDATE orders SET status = $1, updated_at = NOW() WHERE id = $2
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(status.to_string())
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Err(RepositoryError::NotFound);
        };
        let mut items = self.items_for(&[row.id]).await?;
        let items = items.remove(&row.id).unwrap_or_default();
        row.into_order(items)
    }

    /// Delete an order and its items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn delete(&self, id: OrderId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM order_items WHERE order_id = $1")
            .bind(id.as_i32())
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id.as_i32())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Bulk-delete every order belonging to a user (cascade step for user
    /// deletion). Returns the number of orders removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_by_user(&self, user: UserId) -> Result<u64, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "DELETE FROM order_items
             WHERE order_id IN (SELECT id FROM orders WHERE user_id = $1)",
        )
        .bind(user.as_i32())
        .execute(&mut *tx)
        .await?;
        let result = sqlx::query("DELETE FROM orders WHERE user_id = $1")
            .bind(user.as_i32())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected())
    }

    async fn assemble(&self, rows: Vec<OrderRow>) -> Result<Vec<Order>, RepositoryError> {
        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let mut items = self.items_for(&ids).await?;
        rows.into_iter()
            .map(|row| {
                let order_items = items.remove(&row.id).unwrap_or_default();
                row.into_order(order_items)
            })
            .collect()
    }

    async fn items_for(
        &self,
        order_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<OrderItem>>, RepositoryError> {
        if order_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<OrderItemRow> = sqlx::query_as(
            "SELECT order_id, product_id, name, image, quantity, price
             FROM order_items WHERE order_id = ANY($1)
             ORDER BY order_id, position",
        )
        .bind(order_ids)
        .fetch_all(self.pool)
        .await?;

        let mut grouped: HashMap<i32, Vec<OrderItem>> = HashMap::new();
        for row in rows {
            grouped.entry(row.order_id).or_default().push(row.into());
        }
        Ok(grouped)
    }
}
