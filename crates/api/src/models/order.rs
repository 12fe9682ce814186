//! Order models: orders, item snapshots, shipping addresses.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use heartwood_core::{OrderId, OrderStatus, PaymentMethod, ProductId, UserId};

/// The shipping address copied onto an order at checkout.
///
/// A copy, not a reference: edits to the user's address book never touch
/// placed orders. Street, city and country are the required minimum.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    #[serde(default)]
    pub title: Option<String>,
    pub street: String,
    pub city: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    pub country: String,
}

/// A line-item snapshot captured at order time.
///
/// Name, image and price are frozen copies; later product edits (or even
/// product deletion) never retroactively alter historical orders. `image`
/// is `None` when the best-effort asset copy failed at checkout.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product: ProductId,
    pub name: String,
    pub image: Option<String>,
    pub quantity: i32,
    pub price: Decimal,
}

/// A placed order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user: UserId,
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    /// Server-computed sum of snapshot price x quantity.
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
