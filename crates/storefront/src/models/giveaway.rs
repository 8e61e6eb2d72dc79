//! Giveaway lead-capture types.

use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gift_grove_core::{Email, GiveawayEntryId};

/// Proof of purchase attached to a giveaway entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum OrderReference {
    /// An order number typed by the entrant.
    OrderId(String),
    /// File name of an uploaded order screenshot, relative to the data
    /// directory's `screenshots/` folder.
    Screenshot(String),
}

/// A giveaway funnel entry.
///
/// Entries are never deleted by the normal flow; `email_sent` is the only
/// field mutated after creation, flipped once the confirmation email attempt
/// succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiveawayEntry {
    /// Unique entry ID.
    pub id: GiveawayEntryId,
    /// Entrant's email address.
    pub email: Email,
    /// Proof of purchase.
    pub reference: OrderReference,
    /// The product page the entrant purchased through.
    pub product_link: String,
    /// Client IP the entry was submitted from, used for window counting.
    pub ip_address: IpAddr,
    /// When the entry was submitted.
    pub created_at: DateTime<Utc>,
    /// Whether the confirmation email went out.
    pub email_sent: bool,
}

/// Fields required to create a giveaway entry.
#[derive(Debug, Clone)]
pub struct NewGiveawayEntry {
    pub email: Email,
    pub reference: OrderReference,
    pub product_link: String,
    pub ip_address: IpAddr,
}
