//! Domain models for the Heartwood API.
//!
//! These structs mirror the database rows after enum parsing. Request and
//! response DTOs specific to a single endpoint live next to their handlers
//! in `routes/`.

pub mod catalog;
pub mod info;
pub mod order;
pub mod user;

pub use catalog::{Category, Dimensions, Product, Theme};
pub use info::GeneralInfo;
pub use order::{Order, OrderItem, ShippingAddress};
pub use user::{Address, AuthUser, User};
