//! Order placement and status transitions.
//!
//! Pricing is authoritative: client-supplied prices are never read. Item
//! snapshots are computed from the live catalog at checkout and frozen
//! into `order_items`, so later product edits never rewrite history.

use rust_decimal::Decimal;
use serde::Deserialize;

use heartwood_core::{OrderId, OrderStatus, PaymentMethod, ProductId, UserId};

use crate::db::{CatalogRepository, OrderRepository, orders::NewOrder};
use crate::error::{AppError, Result};
use crate::models::{Order, OrderItem, Product, ShippingAddress};
use crate::state::AppState;

/// One cart line as submitted by the client. Price is deliberately absent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// Shipping address payload; all fields optional until validated.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    pub title: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
}

impl AddressInput {
    /// Street, city and country are the required minimum.
    fn into_shipping(self) -> Option<ShippingAddress> {
        let street = self.street.filter(|s| !s.trim().is_empty())?;
        let city = self.city.filter(|s| !s.trim().is_empty())?;
        let country = self.country.filter(|s| !s.trim().is_empty())?;
        Some(ShippingAddress {
            title: self.title,
            street,
            city,
            state: self.state,
            zip: self.zip,
            country,
        })
    }
}

/// Checkout request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    #[serde(default)]
    pub items: Vec<CartItem>,
    pub address: Option<AddressInput>,
    pub payment_method: Option<PaymentMethod>,
}

/// Validate the cart, price it against the live catalog and persist the
/// order with item snapshots. Asset copies for item images are best-effort;
/// a failed copy records a null image and never aborts the order.
///
/// # Errors
///
/// Returns `AppError::Validation` for an empty cart, incomplete address,
/// missing payment method or unknown product ids (all-or-nothing: one
/// unknown id fails the whole order).
pub async fn place_order(
    state: &AppState,
    user: UserId,
    request: PlaceOrderRequest,
) -> Result<Order> {
    if request.items.is_empty() {
        return Err(AppError::Validation(
            "Order must contain at least one item".to_owned(),
        ));
    }
    let Some(shipping_address) = request.address.and_then(AddressInput::into_shipping) else {
        return Err(AppError::Validation(
            "Shipping address (street, city, country at minimum) is required".to_owned(),
        ));
    };
    let Some(payment_method) = request.payment_method else {
        return Err(AppError::Validation(
            "Payment method is required".to_owned(),
        ));
    };

    let catalog = CatalogRepository::new(state.pool());
    let ids = distinct_product_ids(&request.items);
    let products = catalog.products_by_ids(&ids).await?;
    let (mut items, total_price) = snapshot_items(&request.items, &products)?;

    // Copy each snapshot image into the order asset area; the database
    // write below is not rolled back when a copy fails.
    for item in &mut items {
        item.image = match item.image.take() {
            Some(source) => state.assets().copy_product_image_to_order(&source).await,
            None => None,
        };
    }

    let order = OrderRepository::new(state.pool())
        .create(&NewOrder {
            user,
            items,
            shipping_address,
            payment_method,
            total_price,
        })
        .await?;
    Ok(order)
}

/// User-side cancellation: only the owner, only while `pending`. Ownership
/// mismatch and wrong status produce the same error on purpose.
///
/// # Errors
///
/// Returns `AppError::Validation` with "Order not found or cannot be
/// cancelled" when no matching pending order exists.
pub async fn cancel_order(state: &AppState, user: UserId, order: OrderId) -> Result<()> {
    let cancelled = OrderRepository::new(state.pool())
        .cancel_pending(user, order)
        .await?;
    if !cancelled {
        return Err(AppError::Validation(
            "Order not found or cannot be cancelled".to_owned(),
        ));
    }
    Ok(())
}

/// Admin status transition: any status to any status.
///
/// # Errors
///
/// Returns `AppError::Database(NotFound)` for an unknown order.
pub async fn set_status(state: &AppState, order: OrderId, status: OrderStatus) -> Result<Order> {
    let order = OrderRepository::new(state.pool())
        .set_status(order, status)
        .await?;
    Ok(order)
}

fn distinct_product_ids(items: &[CartItem]) -> Vec<ProductId> {
    let mut ids: Vec<ProductId> = items.iter().map(|i| i.product_id).collect();
    ids.sort_unstable_by_key(ProductId::as_i32);
    ids.dedup();
    ids
}

/// Build item snapshots and the authoritative total. `image` holds the
/// product's cover-image source path; the caller swaps it for the copied
/// order-scoped path.
fn snapshot_items(
    items: &[CartItem],
    products: &[Product],
) -> Result<(Vec<OrderItem>, Decimal)> {
    let distinct = distinct_product_ids(items);
    if products.len() != distinct.len() {
        return Err(AppError::Validation(
            "Some products were not found".to_owned(),
        ));
    }

    let mut snapshots = Vec::with_capacity(items.len());
    let mut total = Decimal::ZERO;
    for item in items {
        if item.quantity < 1 {
            return Err(AppError::Validation(
                "Item quantity must be at least 1".to_owned(),
            ));
        }
        let product = products
            .iter()
            .find(|p| p.id == item.product_id)
            .ok_or_else(|| AppError::Validation("Some products were not found".to_owned()))?;

        total += product.price * Decimal::from(item.quantity);
        snapshots.push(OrderItem {
            product: product.id,
            name: product.name.clone(),
            image: product.cover_image().map(ToOwned::to_owned),
            quantity: item.quantity,
            price: product.price,
        });
    }
    Ok((snapshots, total))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use heartwood_core::{CategoryId, ThemeId};

    use super::*;
    use crate::models::Dimensions;

    fn product(id: i32, price: Decimal, images: &[&str]) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("product-{id}"),
            description: String::new(),
            price,
            images: images.iter().map(ToString::to_string).collect(),
            category_id: CategoryId::new(1),
            theme_id: ThemeId::new(1),
            brand: None,
            color: None,
            dimensions: Dimensions {
                width: 1.0,
                height: 1.0,
                depth: 1.0,
            },
            weight: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn d(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn cart(entries: &[(i32, i32)]) -> Vec<CartItem> {
        entries
            .iter()
            .map(|&(id, quantity)| CartItem {
                product_id: ProductId::new(id),
                quantity,
            })
            .collect()
    }

    #[test]
    fn test_total_uses_server_side_prices() {
        let products = vec![
            product(1, d("10.00"), &["uploads/products/a.jpg"]),
            product(2, d("4.50"), &["uploads/products/b.jpg"]),
        ];
        let (items, total) = snapshot_items(&cart(&[(1, 2), (2, 3)]), &products).unwrap();

        assert_eq!(total, d("33.50"));
        assert_eq!(items[0].price, d("10.00"));
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[1].price, d("4.50"));
    }

    #[test]
    fn test_unknown_product_fails_whole_order() {
        let products = vec![product(1, d("10.00"), &["uploads/products/a.jpg"])];
        let err = snapshot_items(&cart(&[(1, 1), (999, 1)]), &products).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "Some products were not found"));
    }

    #[test]
    fn test_duplicate_product_ids_are_counted_once() {
        // Two cart lines for the same product need only one loaded product.
        let products = vec![product(1, d("5.00"), &["uploads/products/a.jpg"])];
        let (items, total) = snapshot_items(&cart(&[(1, 1), (1, 2)]), &products).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(total, d("15.00"));
    }

    #[test]
    fn test_snapshot_records_cover_image_source() {
        let products = vec![product(
            1,
            d("1.00"),
            &["uploads/products/first.jpg", "uploads/products/second.jpg"],
        )];
        let (items, _) = snapshot_items(&cart(&[(1, 1)]), &products).unwrap();
        assert_eq!(items[0].image.as_deref(), Some("uploads/products/first.jpg"));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let products = vec![product(1, d("1.00"), &["uploads/products/a.jpg"])];
        let err = snapshot_items(&cart(&[(1, 0)]), &products).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_address_requires_street_city_country() {
        let complete = AddressInput {
            street: Some("1 Main St".into()),
            city: Some("Portland".into()),
            country: Some("USA".into()),
            ..AddressInput::default()
        };
        assert!(complete.into_shipping().is_some());

        let missing_country = AddressInput {
            street: Some("1 Main St".into()),
            city: Some("Portland".into()),
            ..AddressInput::default()
        };
        assert!(missing_country.into_shipping().is_none());

        let blank_city = AddressInput {
            street: Some("1 Main St".into()),
            city: Some("   ".into()),
            country: Some("USA".into()),
            ..AddressInput::default()
        };
        assert!(blank_city.into_shipping().is_none());
    }
}
