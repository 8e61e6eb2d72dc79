//! Product catalog types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gift_grove_core::{Price, ProductId};

/// A catalog product.
///
/// `average_rating` and `rating_count` are derived fields kept consistent by
/// the store whenever the product's rating set changes. `average_rating` is
/// the mean of current ratings rounded half-up to one decimal, or `0.0` when
/// the product has no ratings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Longer-form description shown on the detail page.
    pub description: String,
    /// Price in integer cents.
    pub price: Price,
    /// Primary image URL.
    pub image_url: Option<String>,
    /// Outbound affiliate link.
    pub affiliate_link: String,
    /// Category slug (e.g., "for-her", "tech", "under-25").
    pub category: String,
    /// Mean of current ratings, one decimal, `0.0` when unrated.
    pub average_rating: f64,
    /// Number of current ratings.
    pub rating_count: u32,
    /// When the product was added to the catalog.
    pub created_at: DateTime<Utc>,
}

/// Fields required to create a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub image_url: Option<String>,
    pub affiliate_link: String,
    pub category: String,
}

/// Partial update applied to an existing product.
///
/// `None` fields are left unchanged. Derived rating fields cannot be set
/// through an update; they are owned by the rating aggregator.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub image_url: Option<String>,
    pub affiliate_link: Option<String>,
    pub category: Option<String>,
}
