//! Star-rating types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gift_grove_core::{ProductId, RatingId, UserId};

/// A single star rating.
///
/// At most one rating exists per (user, product) pair; re-rating overwrites
/// the value and timestamp in place rather than appending a duplicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    /// Unique rating ID.
    pub id: RatingId,
    /// User who submitted the rating.
    pub user_id: UserId,
    /// Product being rated.
    pub product_id: ProductId,
    /// Star value, 1 through 5.
    pub rating: u8,
    /// When the rating was submitted or last changed.
    pub created_at: DateTime<Utc>,
}
