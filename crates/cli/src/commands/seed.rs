//! Demo data seeding command.
//!
//! # Usage
//!
//! ```bash
//! hw-cli seed
//! ```
//!
//! # Environment Variables
//!
//! - `HEARTWOOD_DATABASE_URL` - `PostgreSQL` connection string
//!   (`DATABASE_URL` is accepted as a fallback)
//!
//! Wipes every table and loads a demo storefront: four themes, five
//! categories, twenty products, five accounts (one admin) and a handful of
//! orders in various states. Intended for local development and demos only.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Password hashing failed.
    #[error("Password hashing error: {0}")]
    Hash(String),

    /// A hard-coded price failed to parse.
    #[error("Invalid price literal: {0}")]
    Price(String),

    /// The demo dataset is internally inconsistent.
    #[error("Inconsistent seed data: {0}")]
    Data(String),
}

struct ThemeRow {
    name: &'static str,
    description: &'static str,
    image: &'static str,
    color: &'static str,
}

struct CategoryRow {
    name: &'static str,
    description: &'static str,
    icon: &'static str,
}

struct ProductRow {
    name: &'static str,
    description: &'static str,
    price: &'static str,
    images: &'static [&'static str],
    category: &'static str,
    theme: &'static str,
    brand: &'static str,
    color: &'static str,
    dims: (f64, f64, f64),
    weight: f64,
}

struct UserRow {
    username: &'static str,
    email: &'static str,
    password: &'static str,
    phone: &'static str,
    role: &'static str,
    address: AddressRow,
}

struct AddressRow {
    title: &'static str,
    street: &'static str,
    city: &'static str,
    state: &'static str,
    zip: &'static str,
    country: &'static str,
}

struct OrderRow {
    user: &'static str,
    payment_method: &'static str,
    status: &'static str,
    items: &'static [OrderItemRow],
}

struct OrderItemRow {
    product: &'static str,
    quantity: i32,
    price: &'static str,
}

const THEMES: &[ThemeRow] = &[
    ThemeRow {
        name: "Modern",
        description: "Clean lines and minimalist silhouettes for contemporary homes.",
        image: "uploads/theme/modern-theme.jpg",
        color: "#8d8f8d",
    },
    ThemeRow {
        name: "Wooden",
        description: "Warm natural timber pieces with visible grain.",
        image: "uploads/theme/wooden-theme.jpg",
        color: "#8B4513",
    },
    ThemeRow {
        name: "Industrial",
        description: "Raw metal frames and reclaimed materials.",
        image: "uploads/theme/industrial-theme.jpg",
        color: "#4B4B4B",
    },
    ThemeRow {
        name: "Scandinavian",
        description: "Light woods and soft fabrics in muted tones.",
        image: "uploads/theme/scandinavian-theme.jpg",
        color: "#538787",
    },
];

const CATEGORIES: &[CategoryRow] = &[
    CategoryRow {
        name: "Lightings",
        description: "Pendant lamps, floor lamps and wall lights.",
        icon: "uploads/category/lightings-icon.png",
    },
    CategoryRow {
        name: "Chairs",
        description: "Dining chairs, armchairs and lounge seating.",
        icon: "uploads/category/chairs-icon.png",
    },
    CategoryRow {
        name: "Coffee Tables",
        description: "Low tables for living rooms.",
        icon: "uploads/category/coffee-tables-icon.png",
    },
    CategoryRow {
        name: "Tables",
        description: "Dining and work tables.",
        icon: "uploads/category/tables-icon.png",
    },
    CategoryRow {
        name: "Sofas",
        description: "Two-seaters, sectionals and loveseats.",
        icon: "uploads/category/sofas-icon.png",
    },
];

const PRODUCTS: &[ProductRow] = &[
    ProductRow {
        name: "Modern Pendant Lamp",
        description: "A sleek pendant lamp with a matte black shade.",
        price: "89.99",
        images: &["uploads/products/p1.png"],
        category: "Lightings",
        theme: "Modern",
        brand: "Luminosity",
        color: "#000000",
        dims: (30.0, 40.0, 30.0),
        weight: 1500.0,
    },
    ProductRow {
        name: "Wooden Floor Lamp",
        description: "Tripod floor lamp with an oak frame and linen shade.",
        price: "129.99",
        images: &["uploads/products/p2.png"],
        category: "Lightings",
        theme: "Wooden",
        brand: "Luminosity",
        color: "#DEB887",
        dims: (45.0, 150.0, 45.0),
        weight: 3200.0,
    },
    ProductRow {
        name: "Industrial Wall Light",
        description: "Exposed-bulb wall sconce on a raw steel mount.",
        price: "59.99",
        images: &["uploads/products/p3.png"],
        category: "Lightings",
        theme: "Industrial",
        brand: "Forge & Co",
        color: "#4B4B4B",
        dims: (15.0, 25.0, 20.0),
        weight: 900.0,
    },
    ProductRow {
        name: "Scandinavian Table Lamp",
        description: "Soft-glow table lamp with a ceramic base.",
        price: "74.99",
        images: &["uploads/products/p4.png"],
        category: "Lightings",
        theme: "Scandinavian",
        brand: "Nordlys",
        color: "#F5F5DC",
        dims: (22.0, 38.0, 22.0),
        weight: 1100.0,
    },
    ProductRow {
        name: "Modern Dining Chair",
        description: "Molded seat on slim powder-coated legs.",
        price: "119.99",
        images: &["uploads/products/p5.png"],
        category: "Chairs",
        theme: "Modern",
        brand: "Formline",
        color: "#FFFFFF",
        dims: (45.0, 82.0, 50.0),
        weight: 4200.0,
    },
    ProductRow {
        name: "Wooden Rocking Chair",
        description: "Hand-finished walnut rocker with a woven seat.",
        price: "199.99",
        images: &["uploads/products/p6.png", "uploads/products/p6b.png"],
        category: "Chairs",
        theme: "Wooden",
        brand: "Grainworks",
        color: "#8B4513",
        dims: (60.0, 95.0, 80.0),
        weight: 8500.0,
    },
    ProductRow {
        name: "Industrial Bar Stool",
        description: "Height-adjustable stool with a steel footrest.",
        price: "89.99",
        images: &["uploads/products/p7.png"],
        category: "Chairs",
        theme: "Industrial",
        brand: "Forge & Co",
        color: "#2F2F2F",
        dims: (38.0, 75.0, 38.0),
        weight: 5600.0,
    },
    ProductRow {
        name: "Scandinavian Armchair",
        description: "Curved beech frame with a wool-blend cushion.",
        price: "249.99",
        images: &["uploads/products/p8.png"],
        category: "Chairs",
        theme: "Scandinavian",
        brand: "Nordlys",
        color: "#D3D3D3",
        dims: (70.0, 85.0, 75.0),
        weight: 9800.0,
    },
    ProductRow {
        name: "Modern Glass Coffee Table",
        description: "Tempered glass top on a chrome cross base.",
        price: "179.99",
        images: &["uploads/products/p9.png"],
        category: "Coffee Tables",
        theme: "Modern",
        brand: "Formline",
        color: "#C0C0C0",
        dims: (100.0, 42.0, 60.0),
        weight: 14000.0,
    },
    ProductRow {
        name: "Wooden Slab Coffee Table",
        description: "Live-edge acacia slab on hairpin legs.",
        price: "229.99",
        images: &["uploads/products/p10.png"],
        category: "Coffee Tables",
        theme: "Wooden",
        brand: "Grainworks",
        color: "#A0522D",
        dims: (110.0, 45.0, 55.0),
        weight: 18000.0,
    },
    ProductRow {
        name: "Industrial Crate Coffee Table",
        description: "Reclaimed crate boards on locking casters.",
        price: "149.99",
        images: &["uploads/products/p11.png"],
        category: "Coffee Tables",
        theme: "Industrial",
        brand: "Forge & Co",
        color: "#5C4033",
        dims: (90.0, 40.0, 60.0),
        weight: 16000.0,
    },
    ProductRow {
        name: "Scandinavian Oval Coffee Table",
        description: "Oval whitewashed top with tapered legs.",
        price: "189.99",
        images: &["uploads/products/p12.png"],
        category: "Coffee Tables",
        theme: "Scandinavian",
        brand: "Nordlys",
        color: "#FAF0E6",
        dims: (105.0, 44.0, 58.0),
        weight: 12000.0,
    },
    ProductRow {
        name: "Modern Dining Table",
        description: "Six-seat table with a sintered stone top.",
        price: "499.99",
        images: &["uploads/products/p13.png"],
        category: "Tables",
        theme: "Modern",
        brand: "Formline",
        color: "#1C1C1C",
        dims: (180.0, 75.0, 90.0),
        weight: 42000.0,
    },
    ProductRow {
        name: "Wooden Farmhouse Table",
        description: "Thick pine top with turned legs, seats eight.",
        price: "649.99",
        images: &["uploads/products/p14.png", "uploads/products/p14b.png"],
        category: "Tables",
        theme: "Wooden",
        brand: "Grainworks",
        color: "#DEB887",
        dims: (200.0, 76.0, 100.0),
        weight: 55000.0,
    },
    ProductRow {
        name: "Industrial Work Table",
        description: "Butcher-block top on a welded steel frame.",
        price: "399.99",
        images: &["uploads/products/p15.png"],
        category: "Tables",
        theme: "Industrial",
        brand: "Forge & Co",
        color: "#3B3B3B",
        dims: (160.0, 90.0, 80.0),
        weight: 38000.0,
    },
    ProductRow {
        name: "Scandinavian Extendable Table",
        description: "Drop-leaf birch table for four to six.",
        price: "449.99",
        images: &["uploads/products/p16.png"],
        category: "Tables",
        theme: "Scandinavian",
        brand: "Nordlys",
        color: "#F5DEB3",
        dims: (140.0, 74.0, 90.0),
        weight: 30000.0,
    },
    ProductRow {
        name: "Modern Sectional Sofa",
        description: "Low-profile modular sectional in charcoal fabric.",
        price: "1200.00",
        images: &["uploads/products/p17.png"],
        category: "Sofas",
        theme: "Modern",
        brand: "Formline",
        color: "#36454F",
        dims: (280.0, 80.0, 160.0),
        weight: 85000.0,
    },
    ProductRow {
        name: "Wooden Frame Sofa",
        description: "Exposed teak frame with loose cushions.",
        price: "899.99",
        images: &["uploads/products/p18.png"],
        category: "Sofas",
        theme: "Wooden",
        brand: "Grainworks",
        color: "#8B5A2B",
        dims: (210.0, 85.0, 90.0),
        weight: 60000.0,
    },
    ProductRow {
        name: "Industrial Leather Sofa",
        description: "Distressed leather two-seater with riveted arms.",
        price: "1050.00",
        images: &["uploads/products/p19.png"],
        category: "Sofas",
        theme: "Industrial",
        brand: "Forge & Co",
        color: "#6B4423",
        dims: (190.0, 82.0, 95.0),
        weight: 72000.0,
    },
    ProductRow {
        name: "Scandinavian Loveseat",
        description: "Compact two-seater in pale grey boucle.",
        price: "749.99",
        images: &["uploads/products/p20.png"],
        category: "Sofas",
        theme: "Scandinavian",
        brand: "Nordlys",
        color: "#DCDCDC",
        dims: (160.0, 80.0, 85.0),
        weight: 48000.0,
    },
];

const USERS: &[UserRow] = &[
    UserRow {
        username: "admin",
        email: "admin@admin.com",
        password: "pswd1",
        phone: "+1-555-0100",
        role: "admin",
        address: AddressRow {
            title: "Office",
            street: "10 Admin Way",
            city: "Central City",
            state: "CA",
            zip: "90210",
            country: "USA",
        },
    },
    UserRow {
        username: "johndoe",
        email: "john@example.com",
        password: "UserPass123",
        phone: "+1-555-0101",
        role: "user",
        address: AddressRow {
            title: "Home",
            street: "42 Elm Street",
            city: "Springfield",
            state: "IL",
            zip: "62704",
            country: "USA",
        },
    },
    UserRow {
        username: "janedoe",
        email: "jane@example.com",
        password: "UserPass123",
        phone: "+1-555-0102",
        role: "user",
        address: AddressRow {
            title: "Home",
            street: "7 Birch Lane",
            city: "Portland",
            state: "OR",
            zip: "97201",
            country: "USA",
        },
    },
    UserRow {
        username: "peterparker",
        email: "peter@example.com",
        password: "UserPass123",
        phone: "+1-555-0103",
        role: "user",
        address: AddressRow {
            title: "Home",
            street: "20 Ingram Street",
            city: "New York",
            state: "NY",
            zip: "11375",
            country: "USA",
        },
    },
    UserRow {
        username: "maryjane",
        email: "mary@example.com",
        password: "UserPass123",
        phone: "+1-555-0104",
        role: "user",
        address: AddressRow {
            title: "Home",
            street: "5 Queens Blvd",
            city: "New York",
            state: "NY",
            zip: "11101",
            country: "USA",
        },
    },
];

const ORDERS: &[OrderRow] = &[
    OrderRow {
        user: "johndoe",
        payment_method: "card",
        status: "delivered",
        items: &[
            OrderItemRow {
                product: "Modern Pendant Lamp",
                quantity: 2,
                price: "89.99",
            },
            OrderItemRow {
                product: "Wooden Rocking Chair",
                quantity: 1,
                price: "199.99",
            },
        ],
    },
    OrderRow {
        user: "janedoe",
        payment_method: "paypal",
        status: "shipped",
        items: &[OrderItemRow {
            product: "Scandinavian Table Lamp",
            quantity: 3,
            price: "74.99",
        }],
    },
    OrderRow {
        user: "peterparker",
        payment_method: "cod",
        status: "pending",
        items: &[
            OrderItemRow {
                product: "Modern Sectional Sofa",
                quantity: 1,
                price: "1200.00",
            },
            OrderItemRow {
                product: "Industrial Crate Coffee Table",
                quantity: 1,
                price: "149.99",
            },
        ],
    },
    OrderRow {
        user: "maryjane",
        payment_method: "card",
        status: "processing",
        items: &[
            OrderItemRow {
                product: "Modern Dining Chair",
                quantity: 1,
                price: "119.99",
            },
            OrderItemRow {
                product: "Scandinavian Armchair",
                quantity: 2,
                price: "249.99",
            },
        ],
    },
    OrderRow {
        user: "johndoe",
        payment_method: "paypal",
        status: "delivered",
        items: &[OrderItemRow {
            product: "Modern Glass Coffee Table",
            quantity: 1,
            price: "179.99",
        }],
    },
];

fn parse_price(literal: &str) -> Result<Decimal, SeedError> {
    literal
        .parse()
        .map_err(|_| SeedError::Price(literal.to_owned()))
}

fn lookup(ids: &HashMap<&str, i32>, name: &str) -> Result<i32, SeedError> {
    ids.get(name)
        .copied()
        .ok_or_else(|| SeedError::Data(format!("unknown name: {name}")))
}

/// Wipe the database and load the demo dataset.
pub async fn run() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url =
        super::database_url().ok_or(SeedError::MissingEnvVar("HEARTWOOD_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    let mut tx = pool.begin().await?;

    tracing::info!("Clearing existing data...");
    // Children before parents; order_items and addresses reference rows
    // deleted further down.
    for table in [
        "order_items",
        "orders",
        "addresses",
        "users",
        "products",
        "general_info",
        "categories",
        "themes",
    ] {
        sqlx::query(&format!("DELETE FROM {table}"))
            .execute(&mut *tx)
            .await?;
    }

    let mut theme_ids: HashMap<&str, i32> = HashMap::new();
    for theme in THEMES {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO themes (name, description, image, color)
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(theme.name)
        .bind(theme.description)
        .bind(theme.image)
        .bind(theme.color)
        .fetch_one(&mut *tx)
        .await?;
        theme_ids.insert(theme.name, id);
    }
    tracing::info!("Seeded {} themes", THEMES.len());

    let mut category_ids: HashMap<&str, i32> = HashMap::new();
    for category in CATEGORIES {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO categories (name, description, icon)
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(category.name)
        .bind(category.description)
        .bind(category.icon)
        .fetch_one(&mut *tx)
        .await?;
        category_ids.insert(category.name, id);
    }
    tracing::info!("Seeded {} categories", CATEGORIES.len());

    let mut product_ids: HashMap<&str, i32> = HashMap::new();
    for product in PRODUCTS {
        let images: Vec<String> = product.images.iter().map(ToString::to_string).collect();
        let (width, height, depth) = product.dims;
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO products
                 (name, description, price, images, category_id, theme_id,
                  brand, color, width, height, depth, weight)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING id",
        )
        .bind(product.name)
        .bind(product.description)
        .bind(parse_price(product.price)?)
        .bind(&images)
        .bind(lookup(&category_ids, product.category)?)
        .bind(lookup(&theme_ids, product.theme)?)
        .bind(product.brand)
        .bind(product.color)
        .bind(width)
        .bind(height)
        .bind(depth)
        .bind(product.weight)
        .fetch_one(&mut *tx)
        .await?;
        product_ids.insert(product.name, id);
    }
    tracing::info!("Seeded {} products", PRODUCTS.len());

    // Every non-admin account shares a password, so hash it once.
    let shared_hash = super::hash_password("UserPass123").map_err(SeedError::Hash)?;

    let mut user_ids: HashMap<&str, i32> = HashMap::new();
    for user in USERS {
        let password_hash = if user.password == "UserPass123" {
            shared_hash.clone()
        } else {
            super::hash_password(user.password).map_err(SeedError::Hash)?
        };
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO users (username, email, password_hash, phone, role)
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(user.username)
        .bind(user.email)
        .bind(&password_hash)
        .bind(user.phone)
        .bind(user.role)
        .fetch_one(&mut *tx)
        .await?;
        user_ids.insert(user.username, id);

        sqlx::query(
            "INSERT INTO addresses (user_id, title, street, city, state, zip, country)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(id)
        .bind(user.address.title)
        .bind(user.address.street)
        .bind(user.address.city)
        .bind(user.address.state)
        .bind(user.address.zip)
        .bind(user.address.country)
        .execute(&mut *tx)
        .await?;
    }
    tracing::info!("Seeded {} users", USERS.len());

    sqlx::query(
        "INSERT INTO general_info
             (id, contact_email, contact_phone, address_title, address_street,
              address_city, address_state, address_zip, address_country)
         VALUES (1, $1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind("support@example.com")
    .bind("+1-800-123-4567")
    .bind("Head Office")
    .bind("123 Main St")
    .bind("Metropolis")
    .bind("NY")
    .bind("10001")
    .bind("USA")
    .execute(&mut *tx)
    .await?;

    for order in ORDERS {
        let user = USERS
            .iter()
            .find(|u| u.username == order.user)
            .ok_or_else(|| SeedError::Data(format!("unknown user: {}", order.user)))?;

        let mut total = Decimal::ZERO;
        for item in order.items {
            total += parse_price(item.price)? * Decimal::from(item.quantity);
        }

        let order_id: i32 = sqlx::query_scalar(
            "INSERT INTO orders
                 (user_id, shipping_title, shipping_street, shipping_city,
                  shipping_state, shipping_zip, shipping_country,
                  payment_method, status, total_price)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING id",
        )
        .bind(lookup(&user_ids, order.user)?)
        .bind(user.address.title)
        .bind(user.address.street)
        .bind(user.address.city)
        .bind(user.address.state)
        .bind(user.address.zip)
        .bind(user.address.country)
        .bind(order.payment_method)
        .bind(order.status)
        .bind(total)
        .fetch_one(&mut *tx)
        .await?;

        for (position, item) in order.items.iter().enumerate() {
            let product = PRODUCTS
                .iter()
                .find(|p| p.name == item.product)
                .ok_or_else(|| SeedError::Data(format!("unknown product: {}", item.product)))?;
            sqlx::query(
                "INSERT INTO order_items
                     (order_id, position, product_id, name, image, quantity, price)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(order_id)
            .bind(i32::try_from(position).unwrap_or(i32::MAX))
            .bind(lookup(&product_ids, item.product)?)
            .bind(item.product)
            .bind(product.images.first().copied())
            .bind(item.quantity)
            .bind(parse_price(item.price)?)
            .execute(&mut *tx)
            .await?;
        }
    }
    tracing::info!("Seeded {} orders", ORDERS.len());

    tx.commit().await?;
    tracing::info!("Seed complete!");
    Ok(())
}
