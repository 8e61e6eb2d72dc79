//! Giveaway entry operations.
//!
//! The store only provides the rolling-window counting query; the 5-per-IP
//! limit itself is enforced by the giveaway route before calling
//! [`Store::create_giveaway_entry`].

use std::net::IpAddr;

use chrono::{DateTime, Utc};

use gift_grove_core::GiveawayEntryId;

use crate::models::{GiveawayEntry, NewGiveawayEntry};

use super::{Store, StoreError};

impl Store {
    /// Record a giveaway entry. The confirmation-email flag starts false.
    pub fn create_giveaway_entry(&self, new: NewGiveawayEntry) -> GiveawayEntry {
        let mut guard = self.write();
        let inner = &mut *guard;

        let entry = inner
            .giveaways
            .insert_with(|id| GiveawayEntry {
                id,
                email: new.email,
                reference: new.reference,
                product_link: new.product_link,
                ip_address: new.ip_address,
                created_at: Utc::now(),
                email_sent: false,
            })
            .clone();

        self.persist_giveaways(inner);
        entry
    }

    /// All giveaway entries in submission order.
    #[must_use]
    pub fn giveaway_entries(&self) -> Vec<GiveawayEntry> {
        self.read().giveaways.values().cloned().collect()
    }

    /// Count entries submitted from an IP at or after `since`.
    ///
    /// This is the query behind the rolling-window rate limit.
    #[must_use]
    pub fn giveaway_entries_from_ip_since(&self, ip: IpAddr, since: DateTime<Utc>) -> usize {
        self.read()
            .giveaways
            .values()
            .filter(|e| e.ip_address == ip && e.created_at >= since)
            .count()
    }

    /// Flip the confirmation-email flag after a successful send.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the entry does not exist.
    pub fn mark_giveaway_email_sent(&self, id: GiveawayEntryId) -> Result<(), StoreError> {
        let mut guard = self.write();
        let inner = &mut *guard;

        let entry = inner.giveaways.get_mut(id).ok_or(StoreError::NotFound)?;
        entry.email_sent = true;

        self.persist_giveaways(inner);
        Ok(())
    }
}
