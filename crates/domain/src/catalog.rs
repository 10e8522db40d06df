//! Catalog product record.

use chrono::{DateTime, Utc};
use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// A catalog product managed through the admin back-office.
///
/// Checkout never reads this record for pricing; the cart snapshot price
/// is authoritative for what the shopper is charged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Internal identifier.
    pub id: ProductId,

    /// Display name.
    pub name: String,

    /// URL slug, unique across all products.
    pub slug: String,

    /// Current catalog price.
    pub price: Money,

    /// Units in stock.
    pub stock: u32,

    /// Whether the product is visible in the storefront.
    pub active: bool,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
